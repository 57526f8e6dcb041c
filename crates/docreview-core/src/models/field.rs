//! Extracted field model.

use serde::{Deserialize, Serialize};

use super::config::ConfidenceThresholds;
use crate::validation::{infer_field_type, validate, ValidationWarning};

/// Tiered confidence of a field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceLevel {
    /// Score at or above the high threshold.
    High,
    /// Score at or above the medium threshold.
    Medium,
    /// Score below the medium threshold; blocks the document until corrected.
    Low,
    /// Value was entered by a reviewer.
    Manual,
}

impl ConfidenceLevel {
    /// Short display name.
    pub fn display(&self) -> &'static str {
        match self {
            ConfidenceLevel::High => "High",
            ConfidenceLevel::Medium => "Medium",
            ConfidenceLevel::Low => "Low",
            ConfidenceLevel::Manual => "Manual",
        }
    }
}

/// Declared value type of a field, used for advisory validation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FieldType {
    #[default]
    Text,
    Number,
    Date,
}

/// A normalized polygon vertex, both coordinates in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    pub x: f64,
    pub y: f64,
}

impl Vertex {
    /// Check that both coordinates are finite and inside the unit square.
    pub fn is_normalized(&self) -> bool {
        (0.0..=1.0).contains(&self.x) && (0.0..=1.0).contains(&self.y)
    }
}

/// One recognized datum on a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedField {
    pub(crate) id: String,
    pub(crate) field_name: String,
    pub(crate) label: String,
    pub(crate) extracted_value: String,
    pub(crate) user_correction: Option<String>,
    pub(crate) confidence: f64,
    pub(crate) confidence_level: ConfidenceLevel,
    pub(crate) field_type: FieldType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) bounding_box: Option<Vec<Vertex>>,
}

impl ExtractedField {
    /// Create a field as it arrives from extraction.
    ///
    /// The field type is inferred from the label here and never changes.
    pub fn new(
        id: impl Into<String>,
        field_name: impl Into<String>,
        label: impl Into<String>,
        extracted_value: impl Into<String>,
        confidence: f64,
        thresholds: &ConfidenceThresholds,
    ) -> Self {
        let label = label.into();
        Self {
            id: id.into(),
            field_name: field_name.into(),
            field_type: infer_field_type(&label),
            label,
            extracted_value: extracted_value.into(),
            user_correction: None,
            confidence,
            confidence_level: thresholds.level(confidence),
            bounding_box: None,
        }
    }

    /// Attach a bounding polygon. An empty polygon means "not localized".
    pub fn with_bounding_box(mut self, vertices: Vec<Vertex>) -> Self {
        self.bounding_box = if vertices.is_empty() { None } else { Some(vertices) };
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn extracted_value(&self) -> &str {
        &self.extracted_value
    }

    pub fn user_correction(&self) -> Option<&str> {
        self.user_correction.as_deref()
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub fn confidence_level(&self) -> ConfidenceLevel {
        self.confidence_level
    }

    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    pub fn bounding_box(&self) -> Option<&[Vertex]> {
        self.bounding_box.as_deref()
    }

    /// The reviewer's correction if present, else the extracted value.
    pub fn effective_value(&self) -> &str {
        self.user_correction.as_deref().unwrap_or(&self.extracted_value)
    }

    /// Low confidence and not yet corrected.
    pub fn needs_review(&self) -> bool {
        self.confidence_level == ConfidenceLevel::Low && self.user_correction.is_none()
    }

    /// Record a manual correction. Manual values are fully trusted.
    pub(crate) fn apply_correction(&mut self, value: &str) {
        self.user_correction = Some(value.to_string());
        self.confidence_level = ConfidenceLevel::Manual;
        self.confidence = 1.0;
    }

    /// Confidence as a whole percentage; manual values always show 100.
    pub fn confidence_percent(&self) -> u32 {
        if self.confidence_level == ConfidenceLevel::Manual {
            100
        } else {
            (self.confidence * 100.0).round() as u32
        }
    }

    /// Advisory type check of the effective value.
    pub fn validation_warning(&self) -> Option<ValidationWarning> {
        validate(self.effective_value(), self.field_type)
    }
}
