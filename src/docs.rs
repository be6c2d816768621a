use utoipa::OpenApi;

use crate::modules::student_imports::model::CsvImportResponse;
use rosterly_core::ErrorResponse;
use rosterly_models::{ImportResult, ImportRow, ImportStudentsDto, ValidationOutcome};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::student_imports::controller::validate_import,
        crate::modules::student_imports::controller::import_students,
        crate::modules::student_imports::controller::import_students_csv,
    ),
    components(
        schemas(
            ImportRow,
            ImportStudentsDto,
            ValidationOutcome,
            ImportResult,
            CsvImportResponse,
            ErrorResponse,
        )
    ),
    tags(
        (name = "Student Imports", description = "Dry-run validation and transactional import of student batches")
    ),
    info(
        title = "Rosterly API",
        version = "0.1.0",
        description = "Batch student import for school rosters, built with Rust, Axum, and PostgreSQL.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;
