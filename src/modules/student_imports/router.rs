use crate::modules::student_imports::controller::{
    import_students, import_students_csv, validate_import,
};
use crate::state::AppState;
use axum::{Router, extract::DefaultBodyLimit, routing::post};

/// Request bodies may carry a few thousand rows.
const IMPORT_BODY_LIMIT: usize = 16 * 1024 * 1024;

pub fn init_student_imports_router() -> Router<AppState> {
    Router::new()
        .route("/", post(import_students))
        .route("/validate", post(validate_import))
        .route("/csv", post(import_students_csv))
        .layer(DefaultBodyLimit::max(IMPORT_BODY_LIMIT))
}
