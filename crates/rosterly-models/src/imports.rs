//! Batch import request and report models.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::students::ImportRow;

/// Request body carrying a batch of spreadsheet rows.
#[derive(Clone, Debug, Deserialize, ToSchema, Validate)]
pub struct ImportStudentsDto {
    #[validate(length(min = 1, message = "rows must contain at least one row"))]
    pub rows: Vec<ImportRow>,
}

/// Result of a dry run over a whole batch.
///
/// `valid` is true iff `errors` is empty; warnings never affect it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ValidationOutcome {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub valid: bool,
}

impl ValidationOutcome {
    pub fn new(errors: Vec<String>, warnings: Vec<String>) -> Self {
        let valid = errors.is_empty();
        Self {
            errors,
            warnings,
            valid,
        }
    }
}

/// Result of committing a batch.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ImportResult {
    pub imported: usize,
    pub skipped: usize,
    pub errors: Vec<String>,
}

impl ImportResult {
    pub fn total(&self) -> usize {
        self.imported + self.skipped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_valid_ignores_warnings() {
        let outcome = ValidationOutcome::new(vec![], vec!["Row 1: Class VIII-A is full".into()]);
        assert!(outcome.valid);

        let outcome = ValidationOutcome::new(vec!["Row 1: Name is required".into()], vec![]);
        assert!(!outcome.valid);
    }

    #[test]
    fn test_import_students_dto_deserializes() {
        let dto: ImportStudentsDto = serde_json::from_str(
            r#"{"rows": [{"name": "Budi", "student_id": "S001"}, {}]}"#,
        )
        .unwrap();
        assert_eq!(dto.rows.len(), 2);
        assert!(dto.rows[1].is_blank());
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_import_students_dto_rejects_empty_batch() {
        let dto: ImportStudentsDto = serde_json::from_str(r#"{"rows": []}"#).unwrap();
        assert!(dto.validate().is_err());
    }
}
