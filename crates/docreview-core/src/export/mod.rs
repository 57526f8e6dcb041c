//! Export of approved documents.
//!
//! Only `Approved` documents are exported. Delimited text gets one row per
//! document and one column per distinct label; the structured form keeps
//! document metadata next to a field-name to value map. Spreadsheet output
//! is not supported.

mod delimited;
mod structured;

pub use delimited::to_delimited;
pub use structured::{to_structured, ExportEntry};

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use tracing::info;

use crate::error::ExportError;
use crate::models::document::{DocStatus, DocumentData};

/// Result type for export operations.
pub type Result<T> = std::result::Result<T, ExportError>;

/// Requested export format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Comma-separated values.
    Csv,
    /// Pretty-printed JSON.
    Json,
    /// Excel workbook. Not supported.
    Spreadsheet,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Spreadsheet => "xlsx",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ExportFormat::Csv => "CSV",
            ExportFormat::Json => "JSON",
            ExportFormat::Spreadsheet => "Excel",
        })
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            "xlsx" | "excel" | "spreadsheet" => Ok(ExportFormat::Spreadsheet),
            other => Err(format!("unknown export format: {}", other)),
        }
    }
}

/// A named, downloadable export file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    /// `export_<ISO-8601 instant>.<ext>`
    pub file_name: String,
    pub content: String,
    /// Number of documents exported.
    pub documents: usize,
}

impl ExportArtifact {
    /// Write the artifact into a directory and return its path.
    pub fn write_to(&self, dir: &Path) -> std::io::Result<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(&self.file_name);
        std::fs::write(&path, &self.content)?;
        Ok(path)
    }
}

/// Export the approved subset of `docs`.
pub fn export(docs: &[DocumentData], format: ExportFormat, created_at: DateTime<Utc>) -> Result<ExportArtifact> {
    let approved: Vec<&DocumentData> = docs
        .iter()
        .filter(|d| d.status == DocStatus::Approved)
        .collect();
    if approved.is_empty() {
        return Err(ExportError::EmptySet);
    }

    let content = match format {
        ExportFormat::Csv => to_delimited(&approved)?,
        ExportFormat::Json => to_structured(&approved)?,
        ExportFormat::Spreadsheet => {
            return Err(ExportError::UnsupportedFormat(format.to_string()));
        }
    };

    info!("Exported {} approved documents as {}", approved.len(), format);
    Ok(ExportArtifact {
        file_name: artifact_name(format, created_at),
        content,
        documents: approved.len(),
    })
}

/// ISO-8601 instant with millisecond precision and `Z` suffix.
pub(crate) fn iso_instant(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn artifact_name(format: ExportFormat, created_at: DateTime<Utc>) -> String {
    format!("export_{}.{}", iso_instant(created_at), format.extension())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::config::ConfidenceThresholds;
    use crate::models::document::{DocType, SourceFile};
    use crate::models::field::ExtractedField;
    use chrono::TimeZone;

    pub(crate) fn approved(id: &str, doc_type: DocType, fields: &[(&str, &str, &str)]) -> DocumentData {
        let t = ConfidenceThresholds::default();
        let source = SourceFile::from_path(format!("/scans/{}.pdf", id)).unwrap();
        let uploaded_at = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
        let mut doc = DocumentData::placeholder(id, source, uploaded_at);
        doc.status = DocStatus::Approved;
        doc.doc_type = doc_type;
        doc.extracted_fields = fields
            .iter()
            .enumerate()
            .map(|(i, (name, label, value))| {
                ExtractedField::new(format!("{}-{}", name, i), *name, *label, *value, 0.99, &t)
            })
            .collect();
        doc
    }

    fn created_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 2, 14, 5, 9).unwrap()
    }

    #[test]
    fn test_empty_set_yields_no_artifact() {
        let mut pending = approved("a", DocType::Invoice, &[("vendor", "Vendor", "Acme")]);
        pending.status = DocStatus::Extracted;
        let docs = vec![pending];

        for format in [ExportFormat::Csv, ExportFormat::Json] {
            assert!(matches!(export(&docs, format, created_at()), Err(ExportError::EmptySet)));
        }
        assert!(matches!(export(&[], ExportFormat::Csv, created_at()), Err(ExportError::EmptySet)));
    }

    #[test]
    fn test_spreadsheet_is_unsupported() {
        let docs = vec![approved("a", DocType::Invoice, &[("vendor", "Vendor", "Acme")])];
        assert!(matches!(
            export(&docs, ExportFormat::Spreadsheet, created_at()),
            Err(ExportError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_only_approved_documents_are_exported() {
        let mut pending = approved("b", DocType::Receipt, &[("total", "Total", "9")]);
        pending.status = DocStatus::ReviewNeeded;
        let docs = vec![approved("a", DocType::Invoice, &[("vendor", "Vendor", "Acme")]), pending];

        let artifact = export(&docs, ExportFormat::Csv, created_at()).unwrap();
        assert_eq!(artifact.documents, 1);
        assert!(!artifact.content.contains("b.pdf"));
    }

    #[test]
    fn test_artifact_naming() {
        let docs = vec![approved("a", DocType::Invoice, &[("vendor", "Vendor", "Acme")])];
        let artifact = export(&docs, ExportFormat::Json, created_at()).unwrap();
        assert_eq!(artifact.file_name, "export_2024-03-02T14:05:09.000Z.json");
    }

    #[test]
    fn test_write_to_directory() {
        let dir = tempfile::tempdir().unwrap();
        let docs = vec![approved("a", DocType::Invoice, &[("vendor", "Vendor", "Acme")])];
        let artifact = export(&docs, ExportFormat::Csv, created_at()).unwrap();

        let path = artifact.write_to(&dir.path().join("out")).unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), artifact.content);
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("CSV".parse::<ExportFormat>(), Ok(ExportFormat::Csv));
        assert_eq!("excel".parse::<ExportFormat>(), Ok(ExportFormat::Spreadsheet));
        assert!("pdf".parse::<ExportFormat>().is_err());
    }
}
