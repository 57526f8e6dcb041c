//! Field type inference from display labels.

use crate::models::field::FieldType;

use super::patterns::LABEL_TYPES;

/// Infer the value type of a field from its label.
///
/// Case-insensitive substring match against [`LABEL_TYPES`]; unmatched labels are text.
pub fn infer_field_type(label: &str) -> FieldType {
    let label = label.to_lowercase();
    LABEL_TYPES
        .iter()
        .find(|(fragment, _)| label.contains(fragment))
        .map(|(_, field_type)| *field_type)
        .unwrap_or(FieldType::Text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_labels() {
        assert_eq!(infer_field_type("Date"), FieldType::Date);
        assert_eq!(infer_field_type("Pickup Date"), FieldType::Date);
        assert_eq!(infer_field_type("INVOICE DATE"), FieldType::Date);
    }

    #[test]
    fn test_number_labels() {
        assert_eq!(infer_field_type("Amount"), FieldType::Number);
        assert_eq!(infer_field_type("Grand Total"), FieldType::Number);
        assert_eq!(infer_field_type("Sales Tax"), FieldType::Number);
        assert_eq!(infer_field_type("Freight Rate"), FieldType::Number);
        assert_eq!(infer_field_type("Gross Weight"), FieldType::Number);
    }

    #[test]
    fn test_identifier_labels_are_text() {
        assert_eq!(infer_field_type("Invoice #"), FieldType::Text);
        assert_eq!(infer_field_type("PO #"), FieldType::Text);
        assert_eq!(infer_field_type("Load #"), FieldType::Text);
    }

    #[test]
    fn test_unmatched_labels_default_to_text() {
        assert_eq!(infer_field_type("Shipping Method"), FieldType::Text);
        assert_eq!(infer_field_type(""), FieldType::Text);
    }

    #[test]
    fn test_first_match_wins() {
        // "date" is checked before "amount"
        assert_eq!(infer_field_type("Amount Date"), FieldType::Date);
        // "tax" is checked before "rate"
        assert_eq!(infer_field_type("Tax Rate"), FieldType::Number);
    }
}
