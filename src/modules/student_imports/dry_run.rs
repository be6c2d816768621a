//! Read-only validation of a whole batch.

use std::collections::{HashMap, HashSet};

use rosterly_db::{RosterReader, StoreError};
use rosterly_models::{ImportRow, UniqueField, ValidationOutcome};

use super::class_capacity::resolve_class;
use super::rules::{RowViolation, academic_year_of, check_required_fields, class_violation};
use super::uniqueness;

/// Identifier values already seen earlier in the batch.
#[derive(Debug, Default)]
pub struct BatchContext {
    seen: HashMap<UniqueField, HashSet<String>>,
}

impl BatchContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `value` and returns `false` if it was already recorded.
    pub fn record(&mut self, field: UniqueField, value: &str) -> bool {
        self.seen.entry(field).or_default().insert(value.to_string())
    }

    pub fn contains(&self, field: UniqueField, value: &str) -> bool {
        self.seen.get(&field).is_some_and(|values| values.contains(value))
    }
}

/// Everything the dry run found wrong with one row.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct RowReport {
    pub errors: Vec<RowViolation>,
    pub warnings: Vec<RowViolation>,
}

impl RowReport {
    fn push(&mut self, violation: RowViolation) {
        if violation.is_advisory_in_dry_run() {
            self.warnings.push(violation);
        } else {
            self.errors.push(violation);
        }
    }
}

/// Checks one row against the store and the rows seen before it.
///
/// Required-field, duplicate and class checks all run, so a row can collect
/// several violations. The class check needs a numeric academic year and is
/// skipped without one.
pub async fn check_row<R>(
    reader: &mut R,
    ctx: &mut BatchContext,
    row: &ImportRow,
) -> Result<RowReport, StoreError>
where
    R: RosterReader + ?Sized,
{
    let mut report = RowReport::default();

    if let Err(violations) = check_required_fields(row) {
        violations.into_iter().for_each(|v| report.push(v));
    }

    for field in UniqueField::ALL {
        let Some(value) = field.value_in(row) else {
            continue;
        };

        if !ctx.record(field, value) {
            report.push(RowViolation::DuplicateInBatch {
                field,
                value: value.to_string(),
            });
        } else if uniqueness::exists(reader, field, value).await? {
            report.push(RowViolation::AlreadyExists {
                field,
                value: value.to_string(),
            });
        }
    }

    if let Some(class_name) = row.class_name.as_deref().map(str::trim).filter(|n| !n.is_empty())
        && let Some(academic_year) = academic_year_of(row)
    {
        let resolution = resolve_class(reader, class_name, academic_year).await?;
        if let Some(violation) = class_violation(&resolution, class_name, academic_year) {
            report.push(violation);
        }
    }

    Ok(report)
}

/// Validates every row in order without touching persisted data.
pub async fn validate_rows<R>(reader: &mut R, rows: &[ImportRow]) -> Result<ValidationOutcome, StoreError>
where
    R: RosterReader + ?Sized,
{
    let mut ctx = BatchContext::new();
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    for (index, row) in rows.iter().enumerate() {
        let row_number = index + 1;
        let report = check_row(reader, &mut ctx, row).await?;
        errors.extend(report.errors.iter().map(|v| v.for_row(row_number)));
        warnings.extend(report.warnings.iter().map(|v| v.for_row(row_number)));
    }

    Ok(ValidationOutcome::new(errors, warnings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::student_imports::test_support::{new_student, row};
    use rosterly_db::{MemoryRosterStore, RosterStore};

    #[test]
    fn test_batch_context_records_per_field() {
        let mut ctx = BatchContext::new();
        assert!(ctx.record(UniqueField::Nis, "100"));
        assert!(ctx.record(UniqueField::Nisn, "100"));
        assert!(!ctx.record(UniqueField::Nis, "100"));
        assert!(ctx.contains(UniqueField::Nis, "100"));
        assert!(!ctx.contains(UniqueField::Email, "100"));
    }

    #[tokio::test]
    async fn test_check_row_is_isolated_by_context() {
        let store = MemoryRosterStore::new();
        let mut reader = store.reader();

        let mut first = BatchContext::new();
        check_row(&mut reader, &mut first, &row("S001")).await.unwrap();
        let report = check_row(&mut reader, &mut first, &row("S001")).await.unwrap();
        assert_eq!(report.errors.len(), 1);

        let mut fresh = BatchContext::new();
        let report = check_row(&mut reader, &mut fresh, &row("S001")).await.unwrap();
        assert_eq!(report, RowReport::default());
    }

    #[tokio::test]
    async fn test_in_batch_duplicate_skips_store_lookup() {
        let store = MemoryRosterStore::new();
        store.add_student(new_student("S001")).unwrap();
        let mut reader = store.reader();

        let outcome = validate_rows(&mut reader, &[row("S001"), row("S001")])
            .await
            .unwrap();

        assert_eq!(outcome.errors, vec!["Row 2: Duplicate Student ID S001 in import"]);
        assert_eq!(outcome.warnings, vec!["Row 1: Student ID S001 already exists"]);
        assert!(!outcome.valid);
    }

    #[tokio::test]
    async fn test_reports_every_violation_of_a_row() {
        let store = MemoryRosterStore::new();
        let mut reader = store.reader();
        let mut bad = row("S001");
        bad.name = None;
        bad.gender = Some("unknown".to_string());
        bad.class_name = Some("VIII-A".to_string());

        let outcome = validate_rows(&mut reader, &[bad]).await.unwrap();

        assert_eq!(
            outcome.errors,
            vec![
                "Row 1: Name is required",
                "Row 1: Gender must be male or female",
                "Row 1: Class VIII-A not found for academic year 2025",
            ]
        );
    }

    #[tokio::test]
    async fn test_class_check_needs_numeric_year() {
        let store = MemoryRosterStore::new();
        let mut reader = store.reader();
        let mut bad = row("S001");
        bad.academic_year = Some("soon".to_string());
        bad.class_name = Some("VIII-A".to_string());

        let outcome = validate_rows(&mut reader, &[bad]).await.unwrap();
        assert_eq!(outcome.errors, vec!["Row 1: Academic year must be numeric"]);
    }

    #[tokio::test]
    async fn test_empty_batch_is_valid() {
        let store = MemoryRosterStore::new();
        let outcome = validate_rows(&mut store.reader(), &[]).await.unwrap();
        assert_eq!(outcome, ValidationOutcome::new(vec![], vec![]));
        assert!(outcome.valid);
    }
}
