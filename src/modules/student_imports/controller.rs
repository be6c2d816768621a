use crate::modules::student_imports::model::{CsvImportParams, CsvImportResponse};
use crate::modules::student_imports::service::StudentImportService;
use crate::modules::student_imports::tabular::read_import_rows;
use crate::state::AppState;
use crate::validator::ValidatedJson;
use anyhow::anyhow;
use axum::{
    Json,
    extract::{Query, State},
};
use rosterly_config::ImportConfig;
use rosterly_core::{AppError, ErrorResponse};
use rosterly_models::{ImportResult, ImportRow, ImportStudentsDto, ValidationOutcome};
use tracing::instrument;

fn ensure_within_limit(rows: &[ImportRow], config: &ImportConfig) -> Result<(), AppError> {
    if rows.len() > config.max_rows {
        return Err(AppError::payload_too_large(anyhow!(
            "Import contains {} rows; the limit is {}",
            rows.len(),
            config.max_rows
        )));
    }
    Ok(())
}

#[utoipa::path(
    post,
    path = "/api/students/import/validate",
    request_body = ImportStudentsDto,
    responses(
        (status = 200, description = "Dry-run report for the batch", body = ValidationOutcome),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 413, description = "Too many rows", body = ErrorResponse),
        (status = 422, description = "Empty batch", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Student Imports"
)]
#[instrument(skip(state, dto), fields(rows = dto.rows.len()))]
pub async fn validate_import(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<ImportStudentsDto>,
) -> Result<Json<ValidationOutcome>, AppError> {
    ensure_within_limit(&dto.rows, &state.import_config)?;

    let outcome = StudentImportService::validate_import_data(&state.store, &dto.rows).await?;
    Ok(Json(outcome))
}

#[utoipa::path(
    post,
    path = "/api/students/import",
    request_body = ImportStudentsDto,
    responses(
        (status = 200, description = "Batch committed; skipped rows are listed in errors", body = ImportResult),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 413, description = "Too many rows", body = ErrorResponse),
        (status = 422, description = "Empty batch", body = ErrorResponse),
        (status = 500, description = "Import rolled back", body = ErrorResponse)
    ),
    tag = "Student Imports"
)]
#[instrument(skip(state, dto), fields(rows = dto.rows.len()))]
pub async fn import_students(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<ImportStudentsDto>,
) -> Result<Json<ImportResult>, AppError> {
    ensure_within_limit(&dto.rows, &state.import_config)?;

    let result = StudentImportService::import_students(&state.store, &dto.rows).await?;
    Ok(Json(result))
}

#[utoipa::path(
    post,
    path = "/api/students/import/csv",
    params(CsvImportParams),
    request_body(content = String, content_type = "text/csv", description = "Sheet with a header row"),
    responses(
        (status = 200, description = "Dry-run report or import summary", body = CsvImportResponse),
        (status = 400, description = "Malformed or empty CSV", body = ErrorResponse),
        (status = 413, description = "Too many rows", body = ErrorResponse),
        (status = 500, description = "Import rolled back", body = ErrorResponse)
    ),
    tag = "Student Imports"
)]
#[instrument(skip(state, body))]
pub async fn import_students_csv(
    State(state): State<AppState>,
    Query(params): Query<CsvImportParams>,
    body: String,
) -> Result<Json<CsvImportResponse>, AppError> {
    let rows = read_import_rows(body.as_bytes(), state.import_config.csv_delimiter)
        .map_err(AppError::bad_request)?;

    if rows.is_empty() {
        return Err(AppError::bad_request(anyhow!("CSV contains no student rows")));
    }
    ensure_within_limit(&rows, &state.import_config)?;

    let response = if params.dry_run {
        CsvImportResponse::Validation(
            StudentImportService::validate_import_data(&state.store, &rows).await?,
        )
    } else {
        CsvImportResponse::Import(StudentImportService::import_students(&state.store, &rows).await?)
    };

    Ok(Json(response))
}
