use std::time::Instant;

use chrono::{NaiveDate, Utc};
use rosterly_core::AppError;
use rosterly_db::{RosterStore, RosterTransaction, StoreError};
use rosterly_models::{ImportResult, ImportRow, ValidationOutcome};
use tracing::{debug, error, info, instrument, warn};

use super::dry_run::validate_rows;
use super::rules::{RowOutcome, admit_row};
use crate::metrics::{track_import_aborted, track_import_rows, track_import_duration, track_validation};

pub struct StudentImportService;

impl StudentImportService {
    /// Dry run over the whole batch. Never writes to the store.
    #[instrument(skip(store, rows), fields(rows = rows.len()))]
    pub async fn validate_import_data<S>(store: &S, rows: &[ImportRow]) -> Result<ValidationOutcome, AppError>
    where
        S: RosterStore,
    {
        let mut reader = store.reader();
        let outcome = validate_rows(&mut reader, rows)
            .await
            .map_err(|e| AppError::database(anyhow::Error::from(e)))?;

        info!(
            errors = outcome.errors.len(),
            warnings = outcome.warnings.len(),
            valid = outcome.valid,
            "Validated student import"
        );
        track_validation(outcome.valid);

        Ok(outcome)
    }

    /// Imports the batch with today's date as the enrollment date.
    pub async fn import_students<S>(store: &S, rows: &[ImportRow]) -> Result<ImportResult, AppError>
    where
        S: RosterStore,
    {
        Self::import_students_on(store, rows, Utc::now().date_naive()).await
    }

    /// Imports the batch in one transaction.
    ///
    /// Rejected or failed rows are skipped and the transaction is committed
    /// whatever the mix of outcomes. Only a failure outside a row's own
    /// processing rolls the whole batch back.
    #[instrument(skip(store, rows), fields(rows = rows.len()))]
    pub async fn import_students_on<S>(
        store: &S,
        rows: &[ImportRow],
        enrollment_date: NaiveDate,
    ) -> Result<ImportResult, AppError>
    where
        S: RosterStore,
    {
        let start = Instant::now();
        let mut tx = store
            .begin()
            .await
            .map_err(|e| AppError::database(anyhow::Error::from(e)))?;

        let mut result = ImportResult::default();
        if let Err(e) = process_rows(&mut tx, rows, enrollment_date, &mut result).await {
            error!(error = %e, "Student import aborted, rolling back");
            track_import_aborted();
            if let Err(rollback_err) = tx.rollback().await {
                warn!(error = %rollback_err, "Rollback after aborted import failed");
            }
            return Err(AppError::database(anyhow::Error::from(e)));
        }

        if let Err(e) = tx.commit().await {
            error!(error = %e, "Failed to commit student import");
            track_import_aborted();
            return Err(AppError::database(anyhow::Error::from(e)));
        }

        info!(
            imported = result.imported,
            skipped = result.skipped,
            "Student import committed"
        );
        track_import_rows(result.imported, result.skipped);
        track_import_duration(rows.len(), start.elapsed().as_secs_f64());

        Ok(result)
    }
}

/// Runs every row inside its own savepoint.
///
/// Returns an error only when a savepoint itself fails; the transaction can
/// no longer be trusted at that point.
async fn process_rows<T>(
    tx: &mut T,
    rows: &[ImportRow],
    enrollment_date: NaiveDate,
    result: &mut ImportResult,
) -> Result<(), StoreError>
where
    T: RosterTransaction,
{
    for (index, row) in rows.iter().enumerate() {
        let row_number = index + 1;
        tx.begin_row().await?;

        match admit_row(tx, row, enrollment_date).await {
            RowOutcome::Admitted(student) => {
                tx.release_row().await?;
                debug!(row = row_number, student_id = %student.student_id, "Imported student");
                result.imported += 1;
            }
            RowOutcome::Rejected(violation) => {
                tx.rollback_row().await?;
                debug!(row = row_number, reason = %violation, "Skipped row");
                result.skipped += 1;
                result.errors.push(violation.for_row(row_number));
            }
            RowOutcome::Failed(e) => {
                tx.rollback_row().await?;
                let student_id = row.student_id.as_deref().map(str::trim).unwrap_or_default();
                error!(
                    row = row_number,
                    student_id,
                    raw_row = ?row,
                    error = %e,
                    "Failed to import student row"
                );
                result.skipped += 1;
                result
                    .errors
                    .push(format!("Row {row_number}: Failed to import student {student_id}"));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::student_imports::test_support::{enrollment_date, row};
    use axum::http::StatusCode;
    use rosterly_db::MemoryRosterStore;

    #[tokio::test]
    async fn test_import_counts_every_row() {
        let store = MemoryRosterStore::new();
        let mut no_gender = row("S002");
        no_gender.gender = None;

        let result = StudentImportService::import_students_on(
            &store,
            &[row("S001"), no_gender, row("S003")],
            enrollment_date(),
        )
        .await
        .unwrap();

        assert_eq!(result.imported, 2);
        assert_eq!(result.skipped, 1);
        assert_eq!(result.errors, vec!["Row 2: Gender must be male or female"]);
        assert_eq!(result.total(), 3);
        assert!(store.students().iter().all(|s| s.enrollment_date == enrollment_date()));
    }

    #[tokio::test]
    async fn test_failed_row_does_not_abort_batch() {
        let store = MemoryRosterStore::new();
        store.fail_inserts_for("S002");

        let result = StudentImportService::import_students_on(
            &store,
            &[row("S001"), row("S002"), row("S003")],
            enrollment_date(),
        )
        .await
        .unwrap();

        assert_eq!(result.imported, 2);
        assert_eq!(result.errors, vec!["Row 2: Failed to import student S002"]);
        assert_eq!(store.students().len(), 2);
    }

    #[tokio::test]
    async fn test_savepoint_failure_rolls_back_everything() {
        let store = MemoryRosterStore::new();
        store.fail_row_savepoint_at(3);

        let err = StudentImportService::import_students_on(
            &store,
            &[row("S001"), row("S002"), row("S003")],
            enrollment_date(),
        )
        .await
        .unwrap_err();

        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(store.students().is_empty());
    }

    #[tokio::test]
    async fn test_commit_failure_is_reported() {
        let store = MemoryRosterStore::new();
        store.fail_commit();

        let err = StudentImportService::import_students_on(&store, &[row("S001")], enrollment_date())
            .await
            .unwrap_err();

        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(store.students().is_empty());
    }

    #[tokio::test]
    async fn test_padded_identifier_matches_trimmed_duplicate() {
        let store = MemoryRosterStore::new();
        let rows = [row("S001"), row(" S001 ")];

        let outcome = StudentImportService::validate_import_data(&store, &rows)
            .await
            .unwrap();
        assert!(!outcome.valid);
        assert_eq!(outcome.errors, vec!["Row 2: Duplicate Student ID S001 in import"]);

        let result = StudentImportService::import_students_on(&store, &rows, enrollment_date())
            .await
            .unwrap();
        assert_eq!(result.imported, 1);
        assert_eq!(result.errors, vec!["Row 2: Student ID S001 already exists"]);
        assert_eq!(store.students().len(), 1);
    }

    #[tokio::test]
    async fn test_validate_does_not_write() {
        let store = MemoryRosterStore::new();
        store.add_class("VIII-A", 2025, 1);
        let mut enrolled = row("S001");
        enrolled.class_name = Some("VIII-A".to_string());

        let outcome = StudentImportService::validate_import_data(&store, &[enrolled])
            .await
            .unwrap();

        assert!(outcome.valid);
        assert!(store.students().is_empty());
        assert_eq!(store.class("VIII-A", 2025).unwrap().current_enrollment, 0);
    }
}
