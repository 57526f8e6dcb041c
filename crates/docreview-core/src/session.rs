//! A persisted review session: the collection, the reviewer's view of it,
//! and every user-facing operation.
//!
//! All mutations run on one logical thread. Extraction calls for a batch
//! of uploads run concurrently, but each completion is applied by id as it
//! arrives, one at a time.
//!
//! The per-document lookup guard is not persisted. Two processes holding
//! the same session file do not see each other's lookups, and whichever
//! calls [`ReviewSession::save`] last overwrites the other.

use std::collections::HashSet;
use std::path::Path;

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::collection::{counts_by_type, Collection, Navigation, Progress, ReviewView, TypeCounts, TypeFilter};
use crate::engine::LifecycleEngine;
use crate::error::{GatewayError, SmartAddError};
use crate::export::{self, ExportArtifact, ExportFormat};
use crate::gateway::{ExtractionGateway, FieldExtraction};
use crate::models::config::ReviewConfig;
use crate::models::document::{DocStatus, DocType, DocumentData, SourceFile};
use crate::models::field::ExtractedField;
use crate::Result;

/// A pending single-field lookup. Holding one blocks further lookups on the
/// same document until it is passed to [`ReviewSession::finish_field_lookup`].
#[derive(Debug)]
pub struct FieldLookup {
    pub doc_id: String,
    pub field_name: String,
    pub source: SourceFile,
}

/// Collection plus view, with the engine that mutates them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReviewSession {
    collection: Collection,
    view: ReviewView,
    #[serde(skip)]
    engine: LifecycleEngine,
    #[serde(skip)]
    max_concurrent: usize,
    #[serde(skip)]
    pending_lookups: HashSet<String>,
}

impl ReviewSession {
    /// Create an empty session.
    pub fn new(config: &ReviewConfig) -> Self {
        Self::default().configured(config)
    }

    /// Load a session from a JSON file.
    pub fn load(path: &Path, config: &ReviewConfig) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let session: Self = serde_json::from_str(&content)?;
        debug!(
            "Loaded session with {} documents from {}",
            session.collection.len(),
            path.display()
        );
        Ok(session.configured(config))
    }

    /// Save the session as pretty JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    fn configured(mut self, config: &ReviewConfig) -> Self {
        self.engine = LifecycleEngine::new(config.confidence.clone());
        self.max_concurrent = config.intake.max_concurrent_extractions.max(1);
        self
    }

    pub fn collection(&self) -> &Collection {
        &self.collection
    }

    pub fn documents(&self) -> &[DocumentData] {
        self.collection.documents()
    }

    pub fn document(&self, id: &str) -> Option<&DocumentData> {
        self.collection.get(id)
    }

    pub fn view(&self) -> &ReviewView {
        &self.view
    }

    pub fn progress(&self) -> Progress {
        self.collection.progress()
    }

    pub fn counts(&self) -> TypeCounts {
        counts_by_type(self.collection.documents())
    }

    /// Documents in the current filtered view.
    pub fn visible(&self) -> Vec<&DocumentData> {
        self.view.visible(self.collection.documents())
    }

    pub fn selected(&self) -> Option<&DocumentData> {
        self.view.selected_document(self.collection.documents())
    }

    /// Upload files and extract them. See [`Self::ingest_with_progress`].
    pub async fn ingest<G: ExtractionGateway>(
        &mut self,
        sources: Vec<SourceFile>,
        gateway: &G,
    ) -> Vec<String> {
        self.ingest_with_progress(sources, gateway, |_| {}).await
    }

    /// Insert a placeholder per file, then run the extractions concurrently
    /// and apply each result to its placeholder as it completes.
    ///
    /// Gateway failures never escape: they leave the document `Failed`.
    /// `on_complete` sees each document right after its result is applied.
    pub async fn ingest_with_progress<G: ExtractionGateway>(
        &mut self,
        sources: Vec<SourceFile>,
        gateway: &G,
        mut on_complete: impl FnMut(&DocumentData),
    ) -> Vec<String> {
        let ids = self.collection.insert_placeholders(sources.clone(), Utc::now());
        self.view.resolve(self.collection.documents());
        info!("Queued {} documents for extraction", ids.len());

        {
            let engine = &self.engine;
            let collection = &mut self.collection;
            let mut completions = stream::iter(ids.iter().zip(sources.iter()))
                .map(move |(id, source)| async move { (id, gateway.extract_document(source).await) })
                .buffer_unordered(self.max_concurrent.max(1));

            while let Some((id, result)) = completions.next().await {
                collection.modify(id, |doc| {
                    engine.complete_extraction(doc, result);
                    on_complete(doc);
                });
            }
        }

        self.view.resolve(self.collection.documents());
        ids
    }

    /// Correct a field (and its label siblings when `propagate` is set).
    /// Returns the number of fields touched; 0 when nothing matched.
    pub fn update_field(&mut self, doc_id: &str, field_id: &str, value: &str, propagate: bool) -> usize {
        let engine = &self.engine;
        self.collection
            .modify(doc_id, |doc| engine.update_field(doc, field_id, value, propagate))
            .unwrap_or(0)
    }

    /// Reclassify a document. Returns `false` for an unknown id.
    pub fn update_doc_type(&mut self, doc_id: &str, doc_type: DocType) -> bool {
        let engine = &self.engine;
        let found = self
            .collection
            .modify(doc_id, |doc| engine.update_doc_type(doc, doc_type))
            .is_some();
        self.view.resolve(self.collection.documents());
        found
    }

    /// Approve one document. Returns whether its status changed.
    pub fn approve(&mut self, doc_id: &str) -> bool {
        let engine = &self.engine;
        self.collection
            .modify(doc_id, |doc| engine.approve(doc))
            .unwrap_or(false)
    }

    /// Approve every `Extracted` or `ReviewNeeded` document in one pass.
    pub fn approve_batch(&mut self) -> usize {
        let engine = &self.engine;
        let approved = self.collection.modify_each(|doc| engine.approve(doc));
        info!("Batch approved {} documents", approved);
        approved
    }

    pub fn set_filter(&mut self, filter: TypeFilter) {
        self.view.set_filter(filter, self.collection.documents());
    }

    /// Select a visible document. Returns `false` if it is filtered out or unknown.
    pub fn select(&mut self, doc_id: &str) -> bool {
        self.view.select(doc_id, self.collection.documents())
    }

    pub fn next(&mut self) -> Navigation {
        self.view.next(self.collection.documents())
    }

    /// Claim the per-document lookup slot.
    pub fn begin_field_lookup(&mut self, doc_id: &str, field_name: &str) -> std::result::Result<FieldLookup, SmartAddError> {
        let doc = self
            .collection
            .get(doc_id)
            .ok_or_else(|| SmartAddError::DocumentNotFound(doc_id.to_string()))?;
        if !self.pending_lookups.insert(doc_id.to_string()) {
            return Err(SmartAddError::InFlight(doc_id.to_string()));
        }

        Ok(FieldLookup {
            doc_id: doc_id.to_string(),
            field_name: field_name.to_string(),
            source: doc.source().clone(),
        })
    }

    /// Release the lookup slot and apply the gateway's answer.
    pub fn finish_field_lookup(
        &mut self,
        lookup: FieldLookup,
        result: std::result::Result<FieldExtraction, GatewayError>,
    ) -> std::result::Result<ExtractedField, SmartAddError> {
        self.pending_lookups.remove(&lookup.doc_id);
        let found = result?;

        let engine = &self.engine;
        self.collection
            .modify(&lookup.doc_id, |doc| engine.add_field(doc, &lookup.field_name, found))
            .unwrap_or_else(|| Err(SmartAddError::DocumentNotFound(lookup.doc_id.clone())))
    }

    /// Ask the gateway for one named field and append it to the document.
    pub async fn smart_add_field<G: ExtractionGateway>(
        &mut self,
        doc_id: &str,
        field_name: &str,
        gateway: &G,
    ) -> std::result::Result<ExtractedField, SmartAddError> {
        let lookup = self.begin_field_lookup(doc_id, field_name)?;
        let result = gateway.extract_field(&lookup.source, &lookup.field_name).await;
        self.finish_field_lookup(lookup, result)
    }

    /// Export the approved documents.
    pub fn export(&self, format: ExportFormat, created_at: DateTime<Utc>) -> Result<ExportArtifact> {
        Ok(export::export(self.collection.documents(), format, created_at)?)
    }

    /// Number of documents per status, in lifecycle order.
    pub fn status_summary(&self) -> Vec<(DocStatus, usize)> {
        [
            DocStatus::Processing,
            DocStatus::Extracted,
            DocStatus::ReviewNeeded,
            DocStatus::Approved,
            DocStatus::Failed,
        ]
        .into_iter()
        .map(|s| (s, self.collection.with_status(s).len()))
        .collect()
    }
}
