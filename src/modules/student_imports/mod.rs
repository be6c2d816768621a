//! Batch student import.
//!
//! A batch goes through two passes. [`service::StudentImportService::validate_import_data`]
//! is a read-only dry run that reports blocking errors and advisory warnings.
//! [`service::StudentImportService::import_students`] commits admissible rows in a
//! single transaction and reports the rest as skipped.
//!
//! Two imports running at the same time are not coordinated. Both can pass the
//! existence check for the same identifier before either commits; the
//! database unique index then rejects one insert and that row is reported as
//! failed.

pub mod class_capacity;
pub mod controller;
pub mod dry_run;
pub mod model;
pub mod normalizer;
pub mod router;
pub mod rules;
pub mod service;
pub mod tabular;
pub mod uniqueness;

#[cfg(test)]
mod test_support;
