//! CLI command implementations.

pub mod add_field;
pub mod approve;
pub mod config;
pub mod edit;
pub mod export;
pub mod ingest;
pub mod queue;
pub mod review;

use std::path::{Path, PathBuf};

use console::{style, StyledObject};
use tracing::debug;

use docreview_core::gateway::{DocumentExtractionResponse, ExtractionGateway, FieldExtraction};
use docreview_core::{
    DocStatus, FixtureGateway, GatewayError, GatewayKind, HttpGateway, ReviewConfig, ReviewSession,
    SourceFile,
};

/// Paths shared by every command.
pub struct Context {
    config_path: Option<PathBuf>,
    session_path: PathBuf,
}

impl Context {
    pub fn new(config_path: Option<PathBuf>, session_path: PathBuf) -> Self {
        Self {
            config_path,
            session_path,
        }
    }

    /// Explicit `--config` path, if one was given.
    pub fn config_override(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// Load the configuration: `--config` if given, else the default file
    /// if it exists, else defaults.
    pub fn config(&self) -> anyhow::Result<ReviewConfig> {
        if let Some(path) = &self.config_path {
            return Ok(ReviewConfig::from_file(path)?);
        }

        let default_path = config::default_config_path();
        if default_path.exists() {
            Ok(ReviewConfig::from_file(&default_path)?)
        } else {
            Ok(ReviewConfig::default())
        }
    }

    /// Load the session file, or start an empty session if there is none.
    pub fn open_session(&self, config: &ReviewConfig) -> anyhow::Result<ReviewSession> {
        if self.session_path.exists() {
            Ok(ReviewSession::load(&self.session_path, config)?)
        } else {
            debug!("No session at {}, starting a new one", self.session_path.display());
            Ok(ReviewSession::new(config))
        }
    }

    pub fn save_session(&self, session: &ReviewSession) -> anyhow::Result<()> {
        session.save(&self.session_path)?;
        debug!("Saved session to {}", self.session_path.display());
        Ok(())
    }
}

/// The configured extraction gateway.
pub enum Gateway {
    Http(HttpGateway),
    Fixture(FixtureGateway),
}

impl Gateway {
    pub fn from_config(config: &ReviewConfig) -> anyhow::Result<Self> {
        match config.gateway.kind {
            GatewayKind::Http => Ok(Gateway::Http(HttpGateway::from_config(&config.gateway)?)),
            GatewayKind::Fixture => Ok(Gateway::Fixture(FixtureGateway::new(
                config.gateway.fixture_dir.clone(),
            ))),
        }
    }
}

impl ExtractionGateway for Gateway {
    async fn extract_document(
        &self,
        source: &SourceFile,
    ) -> Result<DocumentExtractionResponse, GatewayError> {
        match self {
            Gateway::Http(gateway) => gateway.extract_document(source).await,
            Gateway::Fixture(gateway) => gateway.extract_document(source).await,
        }
    }

    async fn extract_field(
        &self,
        source: &SourceFile,
        field_name: &str,
    ) -> Result<FieldExtraction, GatewayError> {
        match self {
            Gateway::Http(gateway) => gateway.extract_field(source, field_name).await,
            Gateway::Fixture(gateway) => gateway.extract_field(source, field_name).await,
        }
    }
}

/// Colored status label.
pub fn status_badge(status: DocStatus) -> StyledObject<&'static str> {
    let label = style(status.display());
    match status {
        DocStatus::Processing => label.cyan(),
        DocStatus::Extracted => label.blue(),
        DocStatus::ReviewNeeded => label.yellow(),
        DocStatus::Approved => label.green(),
        DocStatus::Failed => label.red(),
    }
}
