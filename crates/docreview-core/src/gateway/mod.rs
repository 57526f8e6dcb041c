//! Boundary to the external extraction service.
//!
//! The service is opaque: it receives a source file and answers with typed
//! field extractions, or fails. Responses are checked against the expected
//! shape here, so malformed answers surface as [`GatewayError::Malformed`]
//! and never reach the document model.

mod fixture;
#[cfg(feature = "http")]
mod http;

pub use fixture::FixtureGateway;
#[cfg(feature = "http")]
pub use http::HttpGateway;

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::error::GatewayError;
use crate::models::config::ConfidenceThresholds;
use crate::models::document::{DocType, SourceFile};
use crate::models::field::{ExtractedField, Vertex};

/// Result type for gateway calls.
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Trait for extraction services.
pub trait ExtractionGateway {
    /// Classify a document and extract all its fields.
    fn extract_document(
        &self,
        source: &SourceFile,
    ) -> impl Future<Output = Result<DocumentExtractionResponse>> + Send;

    /// Look up one named field. An empty `extracted_value` means "not found".
    fn extract_field(
        &self,
        source: &SourceFile,
        field_name: &str,
    ) -> impl Future<Output = Result<FieldExtraction>> + Send;
}

/// Whole-document response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentExtractionResponse {
    /// Classified type; unrecognized values become `UNKNOWN`.
    #[serde(default)]
    pub doc_type: String,
    pub extracted_fields: Vec<FieldExtraction>,
}

/// One field as returned by the service. Also the single-field response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldExtraction {
    pub field_name: String,
    pub label: String,
    #[serde(default)]
    pub extracted_value: String,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounding_box: Option<Vec<Vertex>>,
}

/// A validated document extraction, ready to be applied to a placeholder.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub doc_type: DocType,
    pub fields: Vec<ExtractedField>,
}

impl FieldExtraction {
    /// Whether the service found nothing for this field.
    pub fn is_empty(&self) -> bool {
        self.extracted_value.is_empty()
    }

    /// Check the response shape.
    pub fn check(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.confidence) {
            return Err(GatewayError::Malformed(format!(
                "confidence {} for {} is outside [0, 1]",
                self.confidence, self.field_name
            )));
        }
        if let Some(vertices) = &self.bounding_box {
            if let Some(v) = vertices.iter().find(|v| !v.is_normalized()) {
                return Err(GatewayError::Malformed(format!(
                    "vertex ({}, {}) for {} is not normalized",
                    v.x, v.y, self.field_name
                )));
            }
        }
        Ok(())
    }

    /// Convert into a domain field with the given id.
    pub fn into_field(self, id: String, thresholds: &ConfidenceThresholds) -> Result<ExtractedField> {
        self.check()?;
        let field = ExtractedField::new(
            id,
            self.field_name,
            self.label,
            self.extracted_value,
            self.confidence,
            thresholds,
        );
        Ok(match self.bounding_box {
            Some(vertices) => field.with_bounding_box(vertices),
            None => field,
        })
    }
}

impl DocumentExtractionResponse {
    /// Validate every field and build the domain extraction.
    ///
    /// Field ids are `<fieldName>-<index>` in arrival order.
    pub fn into_extraction(self, thresholds: &ConfidenceThresholds) -> Result<Extraction> {
        let fields = self
            .extracted_fields
            .into_iter()
            .enumerate()
            .map(|(index, f)| {
                let id = format!("{}-{}", f.field_name, index);
                f.into_field(id, thresholds)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Extraction {
            doc_type: DocType::from_label(&self.doc_type),
            fields,
        })
    }
}
