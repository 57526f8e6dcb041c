//! Gateway answering from canned JSON responses on disk.

use std::fs;
use std::path::PathBuf;

use serde::Deserialize;
use tracing::debug;

use super::{DocumentExtractionResponse, ExtractionGateway, FieldExtraction, Result};
use crate::error::GatewayError;
use crate::models::document::SourceFile;

/// Reads `<dir>/<fileName>.json` for every source file.
///
/// The file holds a document response, optionally with a `lookupFields`
/// array answering single-field lookups.
#[derive(Debug, Clone)]
pub struct FixtureGateway {
    dir: PathBuf,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Fixture {
    #[serde(flatten)]
    document: DocumentExtractionResponse,
    #[serde(default)]
    lookup_fields: Vec<FieldExtraction>,
}

impl FixtureGateway {
    /// Create a gateway over a fixture directory.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn load(&self, source: &SourceFile) -> Result<Fixture> {
        let path = self.dir.join(format!("{}.json", source.file_name));
        if !path.exists() {
            return Err(GatewayError::MissingFixture(source.file_name.clone()));
        }
        debug!("Reading fixture {}", path.display());
        let content = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

impl ExtractionGateway for FixtureGateway {
    async fn extract_document(&self, source: &SourceFile) -> Result<DocumentExtractionResponse> {
        Ok(self.load(source)?.document)
    }

    async fn extract_field(&self, source: &SourceFile, field_name: &str) -> Result<FieldExtraction> {
        let fixture = self.load(source)?;
        let wanted = field_name.to_lowercase();

        let found = fixture.lookup_fields.into_iter().find(|f| {
            f.field_name.to_lowercase() == wanted || f.label.to_lowercase() == wanted
        });

        Ok(found.unwrap_or_else(|| FieldExtraction {
            field_name: field_name.to_string(),
            label: field_name.to_string(),
            extracted_value: String::new(),
            confidence: 0.0,
            bounding_box: None,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn write_fixture(dir: &Path, name: &str, content: &str) -> SourceFile {
        fs::write(dir.join(format!("{}.json", name)), content).unwrap();
        SourceFile::from_path(dir.join(name)).unwrap()
    }

    #[tokio::test]
    async fn test_document_and_lookup() {
        let dir = tempfile::tempdir().unwrap();
        let source = write_fixture(
            dir.path(),
            "bol.png",
            r#"{
                "docType": "BOL",
                "extractedFields": [
                    {"fieldName": "shipper", "label": "Shipper", "extractedValue": "Northwind", "confidence": 0.99}
                ],
                "lookupFields": [
                    {"fieldName": "sealNumber", "label": "Seal #", "extractedValue": "S-991", "confidence": 0.88}
                ]
            }"#,
        );
        let gateway = FixtureGateway::new(dir.path());

        let document = gateway.extract_document(&source).await.unwrap();
        assert_eq!(document.doc_type, "BOL");
        assert_eq!(document.extracted_fields.len(), 1);

        let seal = gateway.extract_field(&source, "seal #").await.unwrap();
        assert_eq!(seal.extracted_value, "S-991");

        let missing = gateway.extract_field(&source, "Due Date").await.unwrap();
        assert!(missing.is_empty());
    }

    #[tokio::test]
    async fn test_missing_fixture() {
        let dir = tempfile::tempdir().unwrap();
        let source = SourceFile::from_path(dir.path().join("nothing.pdf")).unwrap();
        let gateway = FixtureGateway::new(dir.path());

        assert!(matches!(
            gateway.extract_document(&source).await,
            Err(GatewayError::MissingFixture(_))
        ));
    }

    #[tokio::test]
    async fn test_invalid_json_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let source = write_fixture(dir.path(), "bad.pdf", "{ not json");
        let gateway = FixtureGateway::new(dir.path());

        assert!(matches!(
            gateway.extract_document(&source).await,
            Err(GatewayError::Malformed(_))
        ));
    }
}
