//! Document lifecycle: status derivation, corrections, and approval.
//!
//! ```text
//! Processing ──► Extracted ⇄ ReviewNeeded ──► Approved
//!      └───────► Failed
//! ```
//!
//! `Processing` is left exactly once, when the gateway answers for the
//! placeholder. `Failed` and `Approved` are terminal.

use tracing::{debug, info, warn};

use crate::error::{GatewayError, SmartAddError};
use crate::gateway::{DocumentExtractionResponse, FieldExtraction};
use crate::models::config::ConfidenceThresholds;
use crate::models::document::{DocStatus, DocType, DocumentData};
use crate::models::field::ExtractedField;

/// Status implied by a field set: `ReviewNeeded` while any low-confidence
/// field is uncorrected, `Extracted` otherwise.
pub fn derive_status(fields: &[ExtractedField]) -> DocStatus {
    if fields.iter().any(ExtractedField::needs_review) {
        DocStatus::ReviewNeeded
    } else {
        DocStatus::Extracted
    }
}

/// Applies lifecycle transitions to documents.
#[derive(Debug, Clone, Default)]
pub struct LifecycleEngine {
    thresholds: ConfidenceThresholds,
}

impl LifecycleEngine {
    /// Create an engine with the given confidence tiers.
    pub fn new(thresholds: ConfidenceThresholds) -> Self {
        Self { thresholds }
    }

    /// Resolve a placeholder with the gateway's answer.
    ///
    /// Gateway errors, including malformed responses, make the document
    /// `Failed`. Returns `false` if the document had already left `Processing`.
    pub fn complete_extraction(
        &self,
        doc: &mut DocumentData,
        result: Result<DocumentExtractionResponse, GatewayError>,
    ) -> bool {
        if doc.status != DocStatus::Processing {
            debug!("Ignoring extraction result for {} in state {}", doc.id, doc.status);
            return false;
        }

        doc.image_url = doc.source.url();
        match result.and_then(|response| response.into_extraction(&self.thresholds)) {
            Ok(extraction) => {
                doc.doc_type = extraction.doc_type;
                doc.extracted_fields = extraction.fields;
                doc.status = derive_status(&doc.extracted_fields);
                info!(
                    "Extracted {} fields from {} ({}): {}",
                    doc.extracted_fields.len(),
                    doc.file_name,
                    doc.doc_type,
                    doc.status
                );
            }
            Err(e) => {
                warn!("Extraction failed for {}: {}", doc.file_name, e);
                doc.doc_type = DocType::Unknown;
                doc.extracted_fields.clear();
                doc.status = DocStatus::Failed;
            }
        }
        true
    }

    /// Correct a field, or every field sharing its label when `propagate` is set.
    ///
    /// Returns the number of fields touched; 0 if the field does not exist.
    pub fn update_field(
        &self,
        doc: &mut DocumentData,
        field_id: &str,
        value: &str,
        propagate: bool,
    ) -> usize {
        let Some(label) = doc.field(field_id).map(|f| f.label.clone()) else {
            debug!("No field {} in {}", field_id, doc.id);
            return 0;
        };

        let mut touched = 0;
        for field in doc.extracted_fields.iter_mut() {
            let matches = if propagate {
                field.label == label
            } else {
                field.id == field_id
            };
            if matches {
                field.apply_correction(value);
                touched += 1;
            }
        }

        self.rederive(doc);
        info!(
            "Corrected {} field(s) labelled {:?} in {} (propagate: {})",
            touched, label, doc.id, propagate
        );
        touched
    }

    /// Reclassify a document. Fields and status are left alone.
    pub fn update_doc_type(&self, doc: &mut DocumentData, doc_type: DocType) {
        debug!("Reclassifying {} from {} to {}", doc.id, doc.doc_type, doc_type);
        doc.doc_type = doc_type;
    }

    /// Approve a reviewable document. Returns whether the status changed.
    pub fn approve(&self, doc: &mut DocumentData) -> bool {
        if !doc.status.is_approvable() {
            return false;
        }
        doc.status = DocStatus::Approved;
        info!("Approved {}", doc.id);
        true
    }

    /// Append a looked-up field unless its label is already present.
    ///
    /// An empty lookup result is reported as not found.
    pub fn add_field(
        &self,
        doc: &mut DocumentData,
        requested: &str,
        lookup: FieldExtraction,
    ) -> Result<ExtractedField, SmartAddError> {
        if lookup.is_empty() {
            return Err(SmartAddError::FieldNotFound(requested.to_string()));
        }
        if doc.has_label(&lookup.label) {
            return Err(SmartAddError::AlreadyExists(lookup.label));
        }

        let id = format!("{}-{}", lookup.field_name, doc.extracted_fields.len());
        let field = lookup.into_field(id, &self.thresholds)?;
        doc.extracted_fields.push(field.clone());
        self.rederive(doc);

        info!("Added field {:?} to {}", field.label, doc.id);
        Ok(field)
    }

    /// Re-derive status after a field change. Only the two review states move.
    fn rederive(&self, doc: &mut DocumentData) {
        if matches!(doc.status, DocStatus::Extracted | DocStatus::ReviewNeeded) {
            doc.status = derive_status(&doc.extracted_fields);
        }
    }
}
