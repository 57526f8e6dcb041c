//! Advisory validation of field values against their declared type.

pub mod field_type;
pub mod patterns;

pub use field_type::infer_field_type;

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::field::FieldType;
use patterns::{DATE_ISO, DATE_US};

/// A value that does not fit its field type. Shown to the reviewer, never enforced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationWarning {
    /// Type the value was checked against.
    pub field_type: FieldType,
    /// Human-readable explanation.
    pub message: String,
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// Check a value against a field type.
///
/// Empty values are always valid: a missing value is not a format error.
pub fn validate(value: &str, field_type: FieldType) -> Option<ValidationWarning> {
    if value.is_empty() {
        return None;
    }

    let message = match field_type {
        FieldType::Date if !is_valid_date(value) => {
            "Invalid date format (e.g., YYYY-MM-DD or MM/DD/YYYY)"
        }
        FieldType::Number if !is_numeric(value) => "Must be a number",
        _ => return None,
    };

    Some(ValidationWarning {
        field_type,
        message: message.to_string(),
    })
}

/// `YYYY-MM-DD` or `MM/DD/YYYY` naming a real calendar day.
pub fn is_valid_date(value: &str) -> bool {
    if DATE_ISO.is_match(value) {
        NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
    } else if DATE_US.is_match(value) {
        NaiveDate::parse_from_str(value, "%m/%d/%Y").is_ok()
    } else {
        false
    }
}

/// Parses to a finite number. Surrounding whitespace is ignored.
pub fn is_numeric(value: &str) -> bool {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return true;
    }
    trimmed.parse::<f64>().map(f64::is_finite).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_is_always_valid() {
        assert_eq!(validate("", FieldType::Date), None);
        assert_eq!(validate("", FieldType::Number), None);
        assert_eq!(validate("", FieldType::Text), None);
    }

    #[test]
    fn test_dates() {
        assert!(is_valid_date("2024-01-31"));
        assert!(is_valid_date("01/31/2024"));
        assert!(is_valid_date("2024-02-29"));
        assert!(!is_valid_date("2023-02-29"));
        assert!(!is_valid_date("2024-13-01"));
        assert!(!is_valid_date("02/30/2024"));
        assert!(!is_valid_date("31.01.2024"));
        assert!(!is_valid_date("2024-1-31"));
        assert!(!is_valid_date("Jan 31 2024"));
    }

    #[test]
    fn test_numbers() {
        assert!(is_numeric("42"));
        assert!(is_numeric("-3.5"));
        assert!(is_numeric(" 1200.00 "));
        assert!(is_numeric("1e3"));
        assert!(!is_numeric("1,200.00"));
        assert!(!is_numeric("$12"));
        assert!(!is_numeric("inf"));
        assert!(!is_numeric("NaN"));
    }

    #[test]
    fn test_warning_messages() {
        let warning = validate("yesterday", FieldType::Date).unwrap();
        assert_eq!(warning.field_type, FieldType::Date);
        assert!(warning.message.starts_with("Invalid date format"));

        let warning = validate("ten", FieldType::Number).unwrap();
        assert_eq!(warning.to_string(), "Must be a number");

        assert_eq!(validate("anything at all", FieldType::Text), None);
    }
}
