use serde::{Deserialize, Deserializer};

/// A single spreadsheet cell as it arrives over JSON.
#[derive(Deserialize)]
#[serde(untagged)]
enum Cell {
    Text(String),
    Integer(i64),
    Unsigned(u64),
    Float(f64),
    Bool(bool),
}

impl Cell {
    fn into_text(self) -> String {
        match self {
            Cell::Text(s) => s,
            Cell::Integer(n) => n.to_string(),
            Cell::Unsigned(n) => n.to_string(),
            Cell::Float(f) => format_float(f),
            Cell::Bool(b) => b.to_string(),
        }
    }
}

/// Renders spreadsheet floats without a trailing `.0` when they are integral,
/// so `2025.0` reads back as `2025`.
pub fn format_float(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 {
        format!("{}", f as i64)
    } else {
        f.to_string()
    }
}

/// Trims a cell and maps blank values to `None`.
pub fn clean_cell(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Accepts a string, number, boolean or null and yields a trimmed string.
/// Blank strings become `None`.
pub fn deserialize_optional_cell<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt: Option<Cell> = Option::deserialize(deserializer)?;
    Ok(opt.and_then(|cell| clean_cell(&cell.into_text())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Row {
        #[serde(default, deserialize_with = "deserialize_optional_cell")]
        value: Option<String>,
    }

    fn parse(json: &str) -> Option<String> {
        serde_json::from_str::<Row>(json).unwrap().value
    }

    #[test]
    fn test_cell_accepts_strings_and_numbers() {
        assert_eq!(parse(r#"{"value": " S001 "}"#), Some("S001".to_string()));
        assert_eq!(parse(r#"{"value": 2025}"#), Some("2025".to_string()));
        assert_eq!(parse(r#"{"value": 2025.0}"#), Some("2025".to_string()));
        assert_eq!(parse(r#"{"value": 12.5}"#), Some("12.5".to_string()));
        assert_eq!(parse(r#"{"value": true}"#), Some("true".to_string()));
    }

    #[test]
    fn test_blank_and_missing_cells_are_none() {
        assert_eq!(parse(r#"{"value": "   "}"#), None);
        assert_eq!(parse(r#"{"value": null}"#), None);
        assert_eq!(parse(r#"{}"#), None);
    }

    #[test]
    fn test_format_float_large_values() {
        assert_eq!(format_float(6281234567890.0), "6281234567890");
        assert_eq!(format_float(f64::NAN), "NaN");
    }
}
