//! Reads a CSV sheet with a header row into [`ImportRow`]s.

use std::io::Read;

use csv::ReaderBuilder;
use rosterly_core::serde::clean_cell;
use rosterly_models::ImportRow;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TabularError {
    #[error("invalid CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("header row has no recognised columns (expected some of: {})", ImportRow::FIELDS.join(", "))]
    NoKnownColumns,
}

/// Alternative header spellings seen in exported sheets.
const ALIASES: &[(&str, &str)] = &[
    ("class", "class_name"),
    ("year", "academic_year"),
    ("sex", "gender"),
    ("date_of_birth", "birth_date"),
    ("place_of_birth", "birth_place"),
    ("phone_number", "phone"),
];

/// Lowercases a header and joins its words with `_`.
pub fn normalize_header(raw: &str) -> String {
    let key = raw
        .trim_matches('\u{feff}')
        .trim()
        .to_lowercase()
        .split(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_");

    ALIASES
        .iter()
        .find(|(alias, _)| *alias == key)
        .map(|(_, field)| field.to_string())
        .unwrap_or(key)
}

/// Parses every non-blank data row. Unknown columns are ignored.
pub fn read_import_rows<R: Read>(source: R, delimiter: u8) -> Result<Vec<ImportRow>, TabularError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(source);

    let columns: Vec<Option<String>> = reader
        .headers()?
        .iter()
        .map(normalize_header)
        .map(|key| ImportRow::FIELDS.contains(&key.as_str()).then_some(key))
        .collect();

    if columns.iter().all(Option::is_none) {
        return Err(TabularError::NoKnownColumns);
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let mut row = ImportRow::default();
        for (column, value) in columns.iter().zip(record.iter()) {
            if let Some(field) = column {
                row.set_field(field, clean_cell(value));
            }
        }

        if !row.is_blank() {
            rows.push(row);
        }
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_header() {
        assert_eq!(normalize_header("\u{feff}Student ID"), "student_id");
        assert_eq!(normalize_header(" Parent-Phone "), "parent_phone");
        assert_eq!(normalize_header("Class"), "class_name");
        assert_eq!(normalize_header("NISN"), "nisn");
        assert_eq!(normalize_header("Favourite Colour"), "favourite_colour");
    }

    #[test]
    fn test_read_import_rows() {
        let csv = "Name,Student ID,Gender,Academic Year,Email,Notes\n\
                   Budi Santoso,S001,Male,2025,budi@school.id,ignored\n\
                   ,,,,,\n\
                   Siti Aminah, S002 ,female,2025,,\n";

        let rows = read_import_rows(csv.as_bytes(), b',').unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name.as_deref(), Some("Budi Santoso"));
        assert_eq!(rows[0].email.as_deref(), Some("budi@school.id"));
        assert_eq!(rows[1].student_id.as_deref(), Some("S002"));
        assert_eq!(rows[1].email, None);
    }

    #[test]
    fn test_short_records_leave_fields_empty() {
        let csv = "name;student_id;gender;academic_year;class\nBudi;S001\n";

        let rows = read_import_rows(csv.as_bytes(), b';').unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].student_id.as_deref(), Some("S001"));
        assert_eq!(rows[0].gender, None);
        assert_eq!(rows[0].class_name, None);
    }

    #[test]
    fn test_rejects_sheet_without_known_columns() {
        let err = read_import_rows("foo,bar\n1,2\n".as_bytes(), b',').unwrap_err();
        assert!(matches!(err, TabularError::NoKnownColumns));
    }
}
