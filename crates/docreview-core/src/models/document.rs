//! Document model and its lifecycle states.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::field::ExtractedField;
use crate::error::IntakeError;

/// Review status of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocStatus {
    /// Waiting for the extraction gateway.
    #[serde(rename = "Processing")]
    Processing,
    /// Extracted, nothing blocks approval.
    #[serde(rename = "Extracted")]
    Extracted,
    /// At least one uncorrected low-confidence field.
    #[serde(rename = "Review Needed")]
    ReviewNeeded,
    /// Approved by a reviewer.
    #[serde(rename = "Approved")]
    Approved,
    /// Extraction failed. Terminal.
    #[serde(rename = "Failed")]
    Failed,
}

impl DocStatus {
    /// Display name, matching the serialized form.
    pub fn display(&self) -> &'static str {
        match self {
            DocStatus::Processing => "Processing",
            DocStatus::Extracted => "Extracted",
            DocStatus::ReviewNeeded => "Review Needed",
            DocStatus::Approved => "Approved",
            DocStatus::Failed => "Failed",
        }
    }

    /// Whether `approve` may move the document to `Approved`.
    pub fn is_approvable(&self) -> bool {
        matches!(self, DocStatus::Extracted | DocStatus::ReviewNeeded)
    }
}

impl fmt::Display for DocStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display())
    }
}

/// Classified document type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DocType {
    Invoice,
    /// Bill of lading.
    Bol,
    Receipt,
    #[default]
    Unknown,
}

impl DocType {
    /// All types in display precedence order.
    pub const ALL: [DocType; 4] = [DocType::Invoice, DocType::Bol, DocType::Receipt, DocType::Unknown];

    pub fn as_str(&self) -> &'static str {
        match self {
            DocType::Invoice => "INVOICE",
            DocType::Bol => "BOL",
            DocType::Receipt => "RECEIPT",
            DocType::Unknown => "UNKNOWN",
        }
    }

    /// Lenient parse used for gateway output: anything unrecognized is `Unknown`.
    pub fn from_label(s: &str) -> Self {
        s.parse().unwrap_or(DocType::Unknown)
    }

    /// Title of the standard field template for this type.
    pub fn template_title(&self) -> &'static str {
        match self {
            DocType::Invoice => "Standard Invoice Fields",
            DocType::Bol => "Standard Bill of Lading Fields",
            DocType::Receipt => "Standard Receipt Fields",
            DocType::Unknown => "Unknown Document Type",
        }
    }

    /// Labels a reviewer should expect on this type of document.
    pub fn standard_fields(&self) -> &'static [&'static str] {
        match self {
            DocType::Invoice => &["Vendor", "Invoice #", "Date", "Amount", "PO #", "Tax", "Total"],
            DocType::Bol => &[
                "Shipper",
                "Consignee",
                "Load #",
                "Weight",
                "Rate",
                "Pickup Date",
                "Delivery Date",
            ],
            DocType::Receipt => &["Vendor", "Date", "Amount", "Category", "Tax", "Description"],
            DocType::Unknown => &[],
        }
    }
}

impl fmt::Display for DocType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "INVOICE" => Ok(DocType::Invoice),
            "BOL" => Ok(DocType::Bol),
            "RECEIPT" => Ok(DocType::Receipt),
            "UNKNOWN" => Ok(DocType::Unknown),
            other => Err(format!("unknown document type: {}", other)),
        }
    }
}

/// Media type of an uploaded source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaType {
    Pdf,
    Png,
    Jpeg,
    Tiff,
}

impl MediaType {
    /// Map a file extension (case-insensitive) to a media type.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "pdf" => Some(MediaType::Pdf),
            "png" => Some(MediaType::Png),
            "jpg" | "jpeg" => Some(MediaType::Jpeg),
            "tif" | "tiff" => Some(MediaType::Tiff),
            _ => None,
        }
    }

    /// MIME type string.
    pub fn mime(&self) -> &'static str {
        match self {
            MediaType::Pdf => "application/pdf",
            MediaType::Png => "image/png",
            MediaType::Jpeg => "image/jpeg",
            MediaType::Tiff => "image/tiff",
        }
    }
}

/// An uploaded file: where its bytes live and what they are.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceFile {
    pub path: PathBuf,
    pub file_name: String,
    pub media_type: MediaType,
}

impl SourceFile {
    /// Describe a file on disk, rejecting unsupported extensions.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, IntakeError> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| IntakeError::InvalidPath(path.display().to_string()))?
            .to_string();

        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        let media_type = MediaType::from_extension(extension)
            .ok_or_else(|| IntakeError::UnsupportedFile(file_name.clone()))?;

        Ok(Self {
            path: path.to_path_buf(),
            file_name,
            media_type,
        })
    }

    /// Renderable reference to the source bytes.
    pub fn url(&self) -> String {
        format!("file://{}", self.path.display())
    }
}

/// One uploaded file and its extraction state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentData {
    pub(crate) id: String,
    pub(crate) file_name: String,
    pub(crate) uploaded_at: DateTime<Utc>,
    pub(crate) status: DocStatus,
    pub(crate) doc_type: DocType,
    pub(crate) image_url: String,
    pub(crate) source: SourceFile,
    pub(crate) extracted_fields: Vec<ExtractedField>,
}

impl DocumentData {
    /// Create the placeholder inserted at upload time.
    pub fn placeholder(id: impl Into<String>, source: SourceFile, uploaded_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            file_name: source.file_name.clone(),
            uploaded_at,
            status: DocStatus::Processing,
            doc_type: DocType::Unknown,
            image_url: String::new(),
            source,
            extracted_fields: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn uploaded_at(&self) -> DateTime<Utc> {
        self.uploaded_at
    }

    pub fn status(&self) -> DocStatus {
        self.status
    }

    pub fn doc_type(&self) -> DocType {
        self.doc_type
    }

    pub fn image_url(&self) -> &str {
        &self.image_url
    }

    pub fn source(&self) -> &SourceFile {
        &self.source
    }

    pub fn fields(&self) -> &[ExtractedField] {
        &self.extracted_fields
    }

    pub fn field(&self, field_id: &str) -> Option<&ExtractedField> {
        self.extracted_fields.iter().find(|f| f.id == field_id)
    }

    /// Whether any other field shares this field's label.
    pub fn has_repeated_label(&self, field_id: &str) -> bool {
        self.field(field_id)
            .map(|target| {
                self.extracted_fields
                    .iter()
                    .filter(|f| f.label == target.label)
                    .count()
                    > 1
            })
            .unwrap_or(false)
    }

    /// Case-insensitive label lookup.
    pub fn has_label(&self, label: &str) -> bool {
        let label = label.to_lowercase();
        self.extracted_fields.iter().any(|f| f.label.to_lowercase() == label)
    }

    /// Template labels for the current type that no field carries yet.
    pub fn missing_standard_fields(&self) -> Vec<&'static str> {
        self.doc_type
            .standard_fields()
            .iter()
            .copied()
            .filter(|label| !self.has_label(label))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::config::ConfidenceThresholds;

    fn source(name: &str) -> SourceFile {
        SourceFile::from_path(format!("/tmp/{}", name)).unwrap()
    }

    #[test]
    fn test_source_file_accepts_document_types() {
        assert_eq!(source("a.PDF").media_type, MediaType::Pdf);
        assert_eq!(source("a.jpg").media_type, MediaType::Jpeg);
        assert_eq!(source("a.tif").media_type, MediaType::Tiff);
        assert!(matches!(
            SourceFile::from_path("/tmp/notes.txt"),
            Err(IntakeError::UnsupportedFile(_))
        ));
    }

    #[test]
    fn test_placeholder_state() {
        let doc = DocumentData::placeholder("doc-1", source("scan.png"), Utc::now());
        assert_eq!(doc.status(), DocStatus::Processing);
        assert_eq!(doc.doc_type(), DocType::Unknown);
        assert_eq!(doc.file_name(), "scan.png");
        assert!(doc.fields().is_empty());
    }

    #[test]
    fn test_doc_type_parsing() {
        assert_eq!("invoice".parse::<DocType>(), Ok(DocType::Invoice));
        assert_eq!(DocType::from_label("BOL"), DocType::Bol);
        assert_eq!(DocType::from_label("PASSPORT"), DocType::Unknown);
        assert!("passport".parse::<DocType>().is_err());
    }

    #[test]
    fn test_status_serialized_names() {
        assert_eq!(
            serde_json::to_string(&DocStatus::ReviewNeeded).unwrap(),
            "\"Review Needed\""
        );
        assert_eq!(serde_json::to_string(&DocType::Bol).unwrap(), "\"BOL\"");
    }

    #[test]
    fn test_missing_standard_fields() {
        let t = ConfidenceThresholds::default();
        let mut doc = DocumentData::placeholder("doc-1", source("r.png"), Utc::now());
        doc.doc_type = DocType::Receipt;
        doc.extracted_fields = vec![
            ExtractedField::new("vendor-0", "vendor", "vendor", "Acme", 0.99, &t),
            ExtractedField::new("total-1", "total", "Amount", "9.99", 0.99, &t),
        ];

        assert_eq!(
            doc.missing_standard_fields(),
            vec!["Date", "Category", "Tax", "Description"]
        );
    }

    #[test]
    fn test_repeated_label() {
        let t = ConfidenceThresholds::default();
        let mut doc = DocumentData::placeholder("doc-1", source("i.pdf"), Utc::now());
        doc.extracted_fields = vec![
            ExtractedField::new("a-0", "a", "Amount", "1", 0.99, &t),
            ExtractedField::new("a-1", "a", "Amount", "2", 0.99, &t),
            ExtractedField::new("t-2", "t", "Tax", "3", 0.99, &t),
        ];
        assert!(doc.has_repeated_label("a-1"));
        assert!(!doc.has_repeated_label("t-2"));
        assert!(!doc.has_repeated_label("missing"));
    }
}
