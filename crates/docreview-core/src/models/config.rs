//! Configuration structures for the review workbench.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::field::ConfidenceLevel;
use crate::error::{ReviewError, Result};

/// Main configuration for docreview.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewConfig {
    /// Confidence tier boundaries.
    pub confidence: ConfidenceThresholds,

    /// File intake configuration.
    pub intake: IntakeConfig,

    /// Extraction gateway configuration.
    pub gateway: GatewayConfig,

    /// Export configuration.
    pub export: ExportConfig,
}

/// Boundaries between confidence tiers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfidenceThresholds {
    /// Scores at or above this are HIGH.
    pub high_threshold: f64,

    /// Scores at or above this (and below high) are MEDIUM; below is LOW.
    pub medium_threshold: f64,
}

impl Default for ConfidenceThresholds {
    fn default() -> Self {
        Self {
            high_threshold: 0.95,
            medium_threshold: 0.85,
        }
    }
}

impl ConfidenceThresholds {
    /// Both bounds must lie in `[0, 1]` with `medium <= high`.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("high_threshold", self.high_threshold),
            ("medium_threshold", self.medium_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ReviewError::Config(format!(
                    "confidence.{} must be between 0 and 1, got {}",
                    name, value
                )));
            }
        }
        if self.medium_threshold > self.high_threshold {
            return Err(ReviewError::Config(format!(
                "confidence.medium_threshold ({}) is above confidence.high_threshold ({})",
                self.medium_threshold, self.high_threshold
            )));
        }
        Ok(())
    }

    /// Classify a raw score.
    pub fn level(&self, confidence: f64) -> ConfidenceLevel {
        if confidence >= self.high_threshold {
            ConfidenceLevel::High
        } else if confidence >= self.medium_threshold {
            ConfidenceLevel::Medium
        } else {
            ConfidenceLevel::Low
        }
    }
}

/// File intake configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IntakeConfig {
    /// Number of extraction calls allowed in flight at once.
    pub max_concurrent_extractions: usize,

    /// File extensions accepted at intake (lowercase, no dot).
    pub accepted_extensions: Vec<String>,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            max_concurrent_extractions: 4,
            accepted_extensions: ["pdf", "png", "jpg", "jpeg", "tiff", "tif"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl IntakeConfig {
    /// Check an extension against the accepted list.
    pub fn accepts(&self, extension: &str) -> bool {
        let extension = extension.to_lowercase();
        self.accepted_extensions.iter().any(|e| *e == extension)
    }
}

/// Which gateway implementation to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GatewayKind {
    /// Remote extraction service over HTTP.
    #[default]
    Http,
    /// Canned responses from a local directory.
    Fixture,
}

/// Extraction gateway configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Gateway implementation.
    pub kind: GatewayKind,

    /// Base URL of the extraction service.
    pub endpoint: String,

    /// Environment variable holding the API key.
    pub api_key_env: String,

    /// Request timeout in seconds.
    pub timeout_secs: u64,

    /// Directory of canned responses for the fixture gateway.
    pub fixture_dir: PathBuf,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            kind: GatewayKind::Http,
            endpoint: "http://localhost:8080".to_string(),
            api_key_env: "DOCREVIEW_API_KEY".to_string(),
            timeout_secs: 120,
            fixture_dir: PathBuf::from("fixtures"),
        }
    }
}

/// Export configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Directory export artifacts are written to.
    pub output_dir: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
        }
    }
}

impl ReviewConfig {
    /// Load and validate configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| ReviewError::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings no document could be classified under.
    pub fn validate(&self) -> Result<()> {
        self.confidence.validate()
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| ReviewError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_tiers() {
        let t = ConfidenceThresholds::default();
        assert_eq!(t.level(0.95), ConfidenceLevel::High);
        assert_eq!(t.level(0.9499), ConfidenceLevel::Medium);
        assert_eq!(t.level(0.85), ConfidenceLevel::Medium);
        assert_eq!(t.level(0.84), ConfidenceLevel::Low);
        assert_eq!(t.level(0.0), ConfidenceLevel::Low);
    }

    #[test]
    fn test_tuned_thresholds() {
        let t = ConfidenceThresholds {
            high_threshold: 0.8,
            medium_threshold: 0.5,
        };
        assert_eq!(t.level(0.85), ConfidenceLevel::High);
        assert_eq!(t.level(0.6), ConfidenceLevel::Medium);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: ReviewConfig =
            serde_json::from_str(r#"{ "confidence": { "high_threshold": 0.99 } }"#).unwrap();
        assert_eq!(config.confidence.high_threshold, 0.99);
        assert_eq!(config.confidence.medium_threshold, 0.85);
        assert_eq!(config.intake.max_concurrent_extractions, 4);
        assert_eq!(config.gateway.kind, GatewayKind::Http);
    }

    #[test]
    fn test_config_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = ReviewConfig::default();
        config.gateway.kind = GatewayKind::Fixture;
        config.save(&path).unwrap();

        let loaded = ReviewConfig::from_file(&path).unwrap();
        assert_eq!(loaded.gateway.kind, GatewayKind::Fixture);
    }

    #[test]
    fn test_intake_accepts_case_insensitively() {
        let intake = IntakeConfig::default();
        assert!(intake.accepts("PDF"));
        assert!(intake.accepts("jpeg"));
        assert!(!intake.accepts("docx"));
    }

    #[test]
    fn test_inverted_thresholds_rejected() {
        let t = ConfidenceThresholds {
            high_threshold: 0.8,
            medium_threshold: 0.9,
        };
        assert!(matches!(t.validate(), Err(ReviewError::Config(_))));

        let t = ConfidenceThresholds {
            high_threshold: 1.5,
            medium_threshold: 0.5,
        };
        assert!(t.validate().is_err());

        let t = ConfidenceThresholds {
            high_threshold: 0.9,
            medium_threshold: 0.9,
        };
        assert!(t.validate().is_ok());
        assert!(ConfidenceThresholds::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_config_file_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        std::fs::write(&path, r#"{ "confidence": { "medium_threshold": 0.99 } }"#).unwrap();
        let err = ReviewConfig::from_file(&path).unwrap_err();
        assert!(err.to_string().contains("medium_threshold"));

        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(ReviewConfig::from_file(&path), Err(ReviewError::Config(_))));
    }
}
