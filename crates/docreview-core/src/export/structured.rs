//! Structured (JSON) export.

use serde::Serialize;
use serde_json::{Map, Value};

use super::{iso_instant, Result};
use crate::models::document::{DocStatus, DocType, DocumentData};

/// One exported document.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportEntry {
    pub id: String,
    pub file_name: String,
    pub doc_type: DocType,
    pub uploaded_at: String,
    pub status: DocStatus,
    /// Field name to effective value.
    pub extracted_data: Map<String, Value>,
}

impl ExportEntry {
    /// Build an entry, folding fields in sequence order.
    ///
    /// Fields sharing a `fieldName` collapse to one key holding the value of
    /// the last such field; the key keeps its first position.
    pub fn from_document(doc: &DocumentData) -> Self {
        let mut extracted_data = Map::new();
        for field in doc.fields() {
            extracted_data.insert(
                field.field_name().to_string(),
                Value::String(field.effective_value().to_string()),
            );
        }

        Self {
            id: doc.id().to_string(),
            file_name: doc.file_name().to_string(),
            doc_type: doc.doc_type(),
            uploaded_at: iso_instant(doc.uploaded_at()),
            status: doc.status(),
            extracted_data,
        }
    }
}

/// Render documents as a pretty-printed JSON array (2-space indent).
pub fn to_structured(docs: &[&DocumentData]) -> Result<String> {
    let entries: Vec<ExportEntry> = docs.iter().map(|d| ExportEntry::from_document(d)).collect();
    Ok(serde_json::to_string_pretty(&entries)?)
}
