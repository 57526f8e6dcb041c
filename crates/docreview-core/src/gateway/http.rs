//! HTTP client for a remote extraction service.

use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::{debug, info};

use super::{DocumentExtractionResponse, ExtractionGateway, FieldExtraction, Result};
use crate::error::GatewayError;
use crate::models::config::GatewayConfig;
use crate::models::document::SourceFile;

/// Posts raw file bytes to `<endpoint>/extract/document` and `<endpoint>/extract/field`.
pub struct HttpGateway {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpGateway {
    /// Create a gateway for the given endpoint.
    ///
    /// `endpoint` should be like `http://localhost:8080` (no trailing slash).
    pub fn new(endpoint: &str, api_key: Option<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("docreview/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    /// Build from configuration, reading the API key from the configured variable.
    pub fn from_config(config: &GatewayConfig) -> Result<Self> {
        if config.endpoint.trim().is_empty() {
            return Err(GatewayError::NotConfigured("endpoint is empty".to_string()));
        }
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty());
        Self::new(&config.endpoint, api_key, Duration::from_secs(config.timeout_secs))
    }

    async fn post<T: DeserializeOwned>(
        &self,
        url: &str,
        source: &SourceFile,
        query: &[(&str, &str)],
    ) -> Result<T> {
        let bytes = tokio::fs::read(&source.path).await?;
        debug!(url = %url, bytes = bytes.len(), file = %source.file_name, "posting document");

        let mut request = self
            .client
            .post(url)
            .query(query)
            .header("Content-Type", source.media_type.mime())
            .header("X-File-Name", source.file_name.as_str())
            .body(bytes);
        if let Some(key) = &self.api_key {
            request = request.header("X-Api-Key", key.as_str());
        }

        let response = request
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;
        if !status.is_success() {
            return Err(GatewayError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

impl ExtractionGateway for HttpGateway {
    async fn extract_document(&self, source: &SourceFile) -> Result<DocumentExtractionResponse> {
        let url = format!("{}/extract/document", self.endpoint);
        let response: DocumentExtractionResponse = self.post(&url, source, &[]).await?;
        info!(
            file = %source.file_name,
            fields = response.extracted_fields.len(),
            "document extracted"
        );
        Ok(response)
    }

    async fn extract_field(&self, source: &SourceFile, field_name: &str) -> Result<FieldExtraction> {
        let url = format!("{}/extract/field", self.endpoint);
        self.post(&url, source, &[("name", field_name)]).await
    }
}
