/// Limits and parsing options for student batch imports.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImportConfig {
    /// Largest batch accepted by a single validate or import call
    pub max_rows: usize,
    /// Field delimiter used when reading uploaded CSV files
    pub csv_delimiter: u8,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            max_rows: 5000,
            csv_delimiter: b',',
        }
    }
}

impl ImportConfig {
    pub fn from_env() -> Self {
        Self::from_vars(
            std::env::var("STUDENT_IMPORT_MAX_ROWS").ok(),
            std::env::var("STUDENT_IMPORT_CSV_DELIMITER").ok(),
        )
    }

    fn from_vars(max_rows: Option<String>, delimiter: Option<String>) -> Self {
        let defaults = Self::default();

        Self {
            max_rows: max_rows
                .and_then(|v| v.trim().parse().ok())
                .filter(|n: &usize| *n > 0)
                .unwrap_or(defaults.max_rows),
            csv_delimiter: delimiter
                .as_deref()
                .and_then(parse_delimiter)
                .unwrap_or(defaults.csv_delimiter),
        }
    }
}

fn parse_delimiter(value: &str) -> Option<u8> {
    match value {
        "\\t" | "tab" => Some(b'\t'),
        v if v.len() == 1 && v.is_ascii() => v.bytes().next(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_unset() {
        assert_eq!(ImportConfig::from_vars(None, None), ImportConfig::default());
    }

    #[test]
    fn test_custom_values() {
        let config = ImportConfig::from_vars(Some("250".into()), Some(";".into()));
        assert_eq!(config.max_rows, 250);
        assert_eq!(config.csv_delimiter, b';');
    }

    #[test]
    fn test_tab_delimiter() {
        let config = ImportConfig::from_vars(None, Some("tab".into()));
        assert_eq!(config.csv_delimiter, b'\t');
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = ImportConfig::from_vars(Some("0".into()), Some(";;".into()));
        assert_eq!(config, ImportConfig::default());

        let config = ImportConfig::from_vars(Some("lots".into()), None);
        assert_eq!(config.max_rows, 5000);
    }
}
