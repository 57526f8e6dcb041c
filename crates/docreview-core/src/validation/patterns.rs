//! Common patterns for field typing and value validation.

use lazy_static::lazy_static;
use regex::Regex;

use crate::models::field::FieldType;

lazy_static! {
    // ISO calendar date: 2024-01-31
    pub static ref DATE_ISO: Regex = Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap();

    // US calendar date: 01/31/2024
    pub static ref DATE_US: Regex = Regex::new(r"^\d{2}/\d{2}/\d{4}$").unwrap();
}

/// Label fragments mapped to value types, checked in order.
///
/// The first fragment contained in a lowercased label wins.
pub static LABEL_TYPES: &[(&str, FieldType)] = &[
    ("date", FieldType::Date),
    ("due date", FieldType::Date),
    ("pickup date", FieldType::Date),
    ("delivery date", FieldType::Date),
    ("amount", FieldType::Number),
    ("total", FieldType::Number),
    ("tax", FieldType::Number),
    ("rate", FieldType::Number),
    ("weight", FieldType::Number),
    // Identifiers look numeric but carry prefixes, dashes and leading zeros.
    ("invoice #", FieldType::Text),
    ("po #", FieldType::Text),
    ("load #", FieldType::Text),
    ("category", FieldType::Text),
    ("description", FieldType::Text),
    ("vendor", FieldType::Text),
    ("shipper", FieldType::Text),
    ("consignee", FieldType::Text),
];
