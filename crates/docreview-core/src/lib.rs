//! Core library for reviewing AI-extracted documents.
//!
//! This crate provides:
//! - Document and field models with confidence tiers
//! - Advisory value validation (dates, numbers)
//! - The document lifecycle engine (extraction, correction, approval, smart add)
//! - Collection views (type filter, grouping, selection, navigation)
//! - CSV and JSON export of approved documents
//! - The extraction gateway boundary with HTTP and fixture implementations

pub mod collection;
pub mod engine;
pub mod error;
pub mod export;
pub mod gateway;
pub mod models;
pub mod session;
pub mod validation;

pub use error::{ExportError, GatewayError, IntakeError, ReviewError, Result, SmartAddError};
pub use models::config::{ConfidenceThresholds, GatewayKind, ReviewConfig};
pub use models::document::{DocStatus, DocType, DocumentData, MediaType, SourceFile};
pub use models::field::{ConfidenceLevel, ExtractedField, FieldType, Vertex};
pub use collection::{Collection, Navigation, Progress, ReviewView, TypeCounts, TypeFilter};
pub use engine::LifecycleEngine;
pub use export::{ExportArtifact, ExportFormat};
pub use gateway::{ExtractionGateway, FixtureGateway};
pub use session::ReviewSession;

#[cfg(feature = "http")]
pub use gateway::HttpGateway;
