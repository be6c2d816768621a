use rosterly_models::{ImportResult, ValidationOutcome};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct CsvImportParams {
    /// Only validate the sheet; nothing is written.
    #[serde(default)]
    pub dry_run: bool,
}

/// Response of the CSV endpoint: a dry-run report or an import summary.
#[derive(Debug, Serialize, ToSchema)]
#[serde(untagged)]
pub enum CsvImportResponse {
    Validation(ValidationOutcome),
    Import(ImportResult),
}
