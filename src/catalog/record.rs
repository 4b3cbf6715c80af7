//! Catalog row types and field sanitization.
//!
//! `CatalogRecord` mirrors one row of the cleaned catalog CSV as-is.
//! `Assessment` is the strongly-typed candidate the pipeline works with:
//! every field is sanitized once during materialization and read-only
//! afterwards. Data-quality problems never raise errors here, they degrade
//! to empty strings or zero.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// One raw row of the catalog table. Column headers are fixed by the
/// upstream cleaning step.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogRecord {
    #[serde(rename = "Name", default)]
    pub name: Option<String>,

    #[serde(rename = "URL", default)]
    pub url: Option<String>,

    #[serde(rename = "Description", default)]
    pub description: Option<String>,

    #[serde(rename = "Test Type", default)]
    pub test_type: Option<String>,

    #[serde(rename = "Duration", default)]
    pub duration: Option<String>,

    #[serde(rename = "Remote Testing", default)]
    pub remote_support: Option<String>,

    #[serde(rename = "Adaptive/IRT Support", default)]
    pub adaptive_support: Option<String>,
}

/// Sanitized, typed candidate derived from a `CatalogRecord`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Assessment {
    pub name: String,
    pub url: String,
    pub description: String,
    pub test_type: String,
    pub duration_minutes: u32,
    pub remote_support: String,
    pub adaptive_support: String,
}

impl Assessment {
    /// Materializes a candidate from a raw record, applying the
    /// sanitization rules field-by-field.
    #[must_use]
    pub fn from_record(record: &CatalogRecord) -> Self {
        Self {
            name: safe_str(record.name.as_deref()),
            url: safe_str(record.url.as_deref()),
            description: safe_str(record.description.as_deref()),
            test_type: safe_str(record.test_type.as_deref()),
            duration_minutes: parse_duration_minutes(record.duration.as_deref().unwrap_or("")),
            remote_support: safe_str(record.remote_support.as_deref()),
            adaptive_support: safe_str(record.adaptive_support.as_deref()),
        }
    }
}

/// Missing field -> empty string.
fn safe_str(value: Option<&str>) -> String {
    value.unwrap_or("").to_string()
}

fn duration_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\d+").expect("digit pattern is valid"))
}

/// Extracts the first contiguous run of digits anywhere in `value` and
/// parses it as a minute count. No digits, or a run too large for u32,
/// yields 0.
#[must_use]
pub fn parse_duration_minutes(value: &str) -> u32 {
    duration_pattern()
        .find(value)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(duration: Option<&str>) -> CatalogRecord {
        CatalogRecord {
            name: Some("Java Test".to_string()),
            url: Some("https://example.com/java".to_string()),
            description: None,
            test_type: Some("Knowledge & Skills".to_string()),
            duration: duration.map(str::to_string),
            remote_support: Some("Yes".to_string()),
            adaptive_support: None,
        }
    }

    #[test]
    fn test_parse_duration_extracts_first_digit_run() {
        assert_eq!(parse_duration_minutes("45 minutes"), 45);
        assert_eq!(parse_duration_minutes("approx. 30"), 30);
        assert_eq!(parse_duration_minutes("15-20 minutes"), 15);
        assert_eq!(parse_duration_minutes("max 60"), 60);
    }

    #[test]
    fn test_parse_duration_no_digits_yields_zero() {
        assert_eq!(parse_duration_minutes(""), 0);
        assert_eq!(parse_duration_minutes("Untimed"), 0);
        assert_eq!(parse_duration_minutes("variable"), 0);
    }

    #[test]
    fn test_parse_duration_overflow_yields_zero() {
        assert_eq!(parse_duration_minutes("99999999999999999999 minutes"), 0);
    }

    #[test]
    fn test_missing_fields_degrade_to_defaults() {
        let candidate = Assessment::from_record(&record(None));
        assert_eq!(candidate.description, "");
        assert_eq!(candidate.adaptive_support, "");
        assert_eq!(candidate.duration_minutes, 0);
        assert_eq!(candidate.name, "Java Test");
    }

    #[test]
    fn test_duration_field_is_parsed() {
        let candidate = Assessment::from_record(&record(Some("about 25 min")));
        assert_eq!(candidate.duration_minutes, 25);
    }
}
