//! The owned working set of documents.
//!
//! Every mutation goes through [`Collection::modify`] or
//! [`Collection::modify_each`] and is keyed by document id, never by
//! position, so interleaved extraction completions cannot touch unrelated
//! entries.

mod view;

pub use view::{
    counts_by_type, filter_by_type, group_by_type, Navigation, ReviewView, TypeCounts, TypeFilter,
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::document::{DocStatus, DocumentData, SourceFile};

/// Processing progress across the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// Documents no longer in `Processing`.
    pub processed: usize,
    pub total: usize,
}

impl Progress {
    /// Completion percentage; 0 for an empty collection.
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.processed as f64 * 100.0 / self.total as f64
        }
    }

    pub fn pending(&self) -> usize {
        self.total - self.processed
    }
}

/// Ordered, versioned sequence of documents in arrival order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    documents: Vec<DocumentData>,
    next_seq: u64,
    version: u64,
}

impl Collection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one `Processing` placeholder per source file.
    ///
    /// Ids are allocated here, before any gateway call starts.
    pub fn insert_placeholders(
        &mut self,
        sources: impl IntoIterator<Item = SourceFile>,
        uploaded_at: DateTime<Utc>,
    ) -> Vec<String> {
        let mut ids = Vec::new();
        for source in sources {
            self.next_seq += 1;
            let id = format!("doc-{}", self.next_seq);
            debug!("Inserted placeholder {} for {}", id, source.file_name);
            self.documents
                .push(DocumentData::placeholder(id.clone(), source, uploaded_at));
            ids.push(id);
        }
        if !ids.is_empty() {
            self.version += 1;
        }
        ids
    }

    pub fn documents(&self) -> &[DocumentData] {
        &self.documents
    }

    pub fn get(&self, id: &str) -> Option<&DocumentData> {
        self.documents.iter().find(|d| d.id == id)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Incremented on every mutation.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Mutate one document by id. `None` if the id is unknown.
    pub fn modify<R>(&mut self, id: &str, f: impl FnOnce(&mut DocumentData) -> R) -> Option<R> {
        let doc = self.documents.iter_mut().find(|d| d.id == id)?;
        let result = f(doc);
        self.version += 1;
        Some(result)
    }

    /// Apply `f` to every document in one pass; `f` reports whether it changed
    /// the document. Returns the number changed.
    pub fn modify_each(&mut self, mut f: impl FnMut(&mut DocumentData) -> bool) -> usize {
        let mut changed = 0;
        for doc in self.documents.iter_mut() {
            if f(doc) {
                changed += 1;
            }
        }
        if changed > 0 {
            self.version += 1;
        }
        changed
    }

    /// Documents in the given status, in arrival order.
    pub fn with_status(&self, status: DocStatus) -> Vec<&DocumentData> {
        self.documents.iter().filter(|d| d.status == status).collect()
    }

    pub fn progress(&self) -> Progress {
        Progress {
            processed: self
                .documents
                .iter()
                .filter(|d| d.status != DocStatus::Processing)
                .count(),
            total: self.documents.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sources(names: &[&str]) -> Vec<SourceFile> {
        names
            .iter()
            .map(|n| SourceFile::from_path(format!("/scans/{}", n)).unwrap())
            .collect()
    }

    #[test]
    fn test_placeholders_keep_arrival_order() {
        let mut collection = Collection::new();
        let ids = collection.insert_placeholders(sources(&["a.pdf", "b.png"]), Utc::now());
        let more = collection.insert_placeholders(sources(&["c.jpg"]), Utc::now());

        assert_eq!(ids, vec!["doc-1", "doc-2"]);
        assert_eq!(more, vec!["doc-3"]);
        let names: Vec<_> = collection.documents().iter().map(|d| d.file_name()).collect();
        assert_eq!(names, vec!["a.pdf", "b.png", "c.jpg"]);
        assert!(collection
            .documents()
            .iter()
            .all(|d| d.status() == DocStatus::Processing));
    }

    #[test]
    fn test_modify_is_keyed() {
        let mut collection = Collection::new();
        collection.insert_placeholders(sources(&["a.pdf", "b.png"]), Utc::now());
        let version = collection.version();

        let result = collection.modify("doc-2", |d| {
            d.status = DocStatus::Failed;
            d.file_name.clone()
        });
        assert_eq!(result.as_deref(), Some("b.png"));
        assert_eq!(collection.get("doc-1").map(|d| d.status()), Some(DocStatus::Processing));
        assert_eq!(collection.get("doc-2").map(|d| d.status()), Some(DocStatus::Failed));
        assert!(collection.version() > version);

        assert!(collection.modify("doc-9", |_| ()).is_none());
    }

    #[test]
    fn test_progress() {
        let mut collection = Collection::new();
        assert_eq!(collection.progress().percent(), 0.0);

        collection.insert_placeholders(sources(&["a.pdf", "b.png", "c.jpg", "d.tiff"]), Utc::now());
        collection.modify("doc-1", |d| d.status = DocStatus::Extracted);
        collection.modify("doc-3", |d| d.status = DocStatus::Failed);

        let progress = collection.progress();
        assert_eq!(progress, Progress { processed: 2, total: 4 });
        assert_eq!(progress.pending(), 2);
        assert_eq!(progress.percent(), 50.0);
    }
}
