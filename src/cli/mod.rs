use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::Context;
use rosterly_models::{ImportResult, ImportRow, ValidationOutcome};

use crate::modules::student_imports::tabular::read_import_rows;

/// Reads a CSV sheet from disk into import rows.
pub fn read_rows_from_file(path: &Path, delimiter: u8) -> anyhow::Result<Vec<ImportRow>> {
    let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    read_import_rows(BufReader::new(file), delimiter)
        .with_context(|| format!("read {}", path.display()))
}

pub fn render_validation(outcome: &ValidationOutcome) -> String {
    let mut out = String::new();
    for error in &outcome.errors {
        out.push_str(&format!("  ✗ {error}\n"));
    }
    for warning in &outcome.warnings {
        out.push_str(&format!("  ! {warning}\n"));
    }
    out.push_str(&format!(
        "{} error(s), {} warning(s): batch is {}",
        outcome.errors.len(),
        outcome.warnings.len(),
        if outcome.valid { "valid" } else { "invalid" }
    ));
    out
}

pub fn render_import_result(result: &ImportResult) -> String {
    let mut out = format!(
        "Imported {} of {} row(s), skipped {}",
        result.imported,
        result.total(),
        result.skipped
    );
    for error in &result.errors {
        out.push_str(&format!("\n  ✗ {error}"));
    }
    out
}
