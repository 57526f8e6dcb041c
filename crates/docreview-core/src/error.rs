//! Error types for the docreview-core library.

use thiserror::Error;

/// Main error type for the docreview library.
///
/// Gateway, smart-add and intake errors are handled where they occur and
/// have no variant here.
#[derive(Error, Debug)]
pub enum ReviewError {
    /// Export error.
    #[error("export error: {0}")]
    Export(#[from] ExportError),

    /// Session (de)serialization error.
    #[error("session error: {0}")]
    Session(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised by an extraction gateway call.
///
/// These never escape intake: a failing document extraction turns the
/// placeholder into a terminal `Failed` document instead.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// The transport failed (connection, timeout, TLS).
    #[error("request failed: {0}")]
    Transport(String),

    /// The service answered with a non-success status.
    #[error("service returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The response did not match the expected shape.
    #[error("malformed response: {0}")]
    Malformed(String),

    /// The source file could not be read.
    #[error("could not read source file: {0}")]
    Source(#[from] std::io::Error),

    /// No canned response exists for the file.
    #[error("no fixture for {0}")]
    MissingFixture(String),

    /// Gateway is not configured (missing endpoint or key).
    #[error("gateway not configured: {0}")]
    NotConfigured(String),
}

impl From<serde_json::Error> for GatewayError {
    fn from(err: serde_json::Error) -> Self {
        GatewayError::Malformed(err.to_string())
    }
}

/// Errors from adding a single field on demand.
#[derive(Error, Debug)]
pub enum SmartAddError {
    /// The document id is not in the collection.
    #[error("document not found: {0}")]
    DocumentNotFound(String),

    /// The gateway found nothing for the requested field.
    #[error("could not find field \"{0}\" in the document")]
    FieldNotFound(String),

    /// A field with the same label is already present.
    #[error("field \"{0}\" already exists in this document")]
    AlreadyExists(String),

    /// Another lookup is still pending for this document.
    #[error("a field lookup is already in progress for {0}")]
    InFlight(String),

    /// The single-field lookup itself failed.
    #[error("field lookup failed: {0}")]
    Gateway(#[from] GatewayError),
}

/// Errors from exporting approved documents.
#[derive(Error, Debug)]
pub enum ExportError {
    /// No document is approved.
    #[error("no approved documents to export")]
    EmptySet,

    /// The requested format has no writer.
    #[error("{0} export is not supported")]
    UnsupportedFormat(String),

    /// Delimited-text writer failure.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Structured writer failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors related to file intake.
#[derive(Error, Debug)]
pub enum IntakeError {
    /// The file extension is not an accepted document type.
    #[error("unsupported file type: {0}")]
    UnsupportedFile(String),

    /// The path has no usable file name.
    #[error("invalid file path: {0}")]
    InvalidPath(String),
}

/// Result type for the docreview library.
pub type Result<T> = std::result::Result<T, ReviewError>;
