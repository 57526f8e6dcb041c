//! Type filtering, grouping, counting, and selection over the collection.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::models::document::{DocType, DocumentData};

/// Active type filter of the review queue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum TypeFilter {
    #[default]
    All,
    Only(DocType),
}

impl TypeFilter {
    pub fn matches(&self, doc: &DocumentData) -> bool {
        match self {
            TypeFilter::All => true,
            TypeFilter::Only(doc_type) => doc.doc_type == *doc_type,
        }
    }
}

impl fmt::Display for TypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeFilter::All => f.write_str("all"),
            TypeFilter::Only(doc_type) => write!(f, "{}", doc_type),
        }
    }
}

impl FromStr for TypeFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(TypeFilter::All)
        } else {
            s.parse().map(TypeFilter::Only)
        }
    }
}

impl From<TypeFilter> for String {
    fn from(filter: TypeFilter) -> Self {
        filter.to_string()
    }
}

impl TryFrom<String> for TypeFilter {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Documents matching the filter, in original order.
pub fn filter_by_type(docs: &[DocumentData], filter: TypeFilter) -> Vec<&DocumentData> {
    docs.iter().filter(|d| filter.matches(d)).collect()
}

/// Documents grouped by type in display precedence (INVOICE, BOL, RECEIPT,
/// UNKNOWN). Empty groups are omitted.
pub fn group_by_type(docs: &[DocumentData]) -> Vec<(DocType, Vec<&DocumentData>)> {
    DocType::ALL
        .iter()
        .map(|t| (*t, filter_by_type(docs, TypeFilter::Only(*t))))
        .filter(|(_, group)| !group.is_empty())
        .collect()
}

/// Document counts for the filter options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeCounts {
    /// Total number of documents.
    pub all: usize,
    /// Counts per classified type present in the data, sorted by type name.
    /// `UNKNOWN` is never listed.
    pub by_type: Vec<(DocType, usize)>,
}

impl TypeCounts {
    /// Number of distinct classified types present.
    pub fn distinct_types(&self) -> usize {
        self.by_type.len()
    }

    /// Count for a filter option; 0 for types not present.
    pub fn get(&self, filter: TypeFilter) -> usize {
        match filter {
            TypeFilter::All => self.all,
            TypeFilter::Only(doc_type) => self
                .by_type
                .iter()
                .find(|(t, _)| *t == doc_type)
                .map(|(_, n)| *n)
                .unwrap_or(0),
        }
    }

    /// Filter options available for the current data.
    pub fn filters(&self) -> Vec<TypeFilter> {
        std::iter::once(TypeFilter::All)
            .chain(self.by_type.iter().map(|(t, _)| TypeFilter::Only(*t)))
            .collect()
    }
}

pub fn counts_by_type(docs: &[DocumentData]) -> TypeCounts {
    let mut by_type: Vec<(DocType, usize)> = Vec::new();
    for doc in docs.iter().filter(|d| d.doc_type != DocType::Unknown) {
        match by_type.iter_mut().find(|(t, _)| *t == doc.doc_type) {
            Some((_, n)) => *n += 1,
            None => by_type.push((doc.doc_type, 1)),
        }
    }
    by_type.sort_by_key(|(t, _)| t.as_str());

    TypeCounts {
        all: docs.len(),
        by_type,
    }
}

/// Outcome of advancing the selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// Selection moved to this document.
    Moved(String),
    /// Already at the last document of the filtered view; selection unchanged.
    EndOfList,
    /// Nothing is selected.
    NoSelection,
}

/// Active filter plus the selected document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewView {
    filter: TypeFilter,
    selected: Option<String>,
}

impl ReviewView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(&self) -> TypeFilter {
        self.filter
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// The filtered subsequence.
    pub fn visible<'a>(&self, docs: &'a [DocumentData]) -> Vec<&'a DocumentData> {
        filter_by_type(docs, self.filter)
    }

    /// The selected document, if any.
    pub fn selected_document<'a>(&self, docs: &'a [DocumentData]) -> Option<&'a DocumentData> {
        let id = self.selected.as_deref()?;
        docs.iter().find(|d| d.id == id)
    }

    /// Re-establish the selection invariant after the view changed.
    ///
    /// A selection outside the filtered view falls to its first element (or
    /// none); an empty selection picks the first element if there is one.
    pub fn resolve(&mut self, docs: &[DocumentData]) {
        let visible = self.visible(docs);
        let still_visible = self
            .selected
            .as_deref()
            .is_some_and(|id| visible.iter().any(|d| d.id == id));
        if !still_visible {
            self.selected = visible.first().map(|d| d.id.clone());
        }
    }

    /// Switch filters and resolve the selection.
    pub fn set_filter(&mut self, filter: TypeFilter, docs: &[DocumentData]) {
        self.filter = filter;
        self.resolve(docs);
    }

    /// Select a document in the filtered view. Returns `false` if it is not visible.
    pub fn select(&mut self, id: &str, docs: &[DocumentData]) -> bool {
        if self.visible(docs).iter().any(|d| d.id == id) {
            self.selected = Some(id.to_string());
            true
        } else {
            false
        }
    }

    /// Advance to the next document in the filtered view, without wrapping.
    pub fn next(&mut self, docs: &[DocumentData]) -> Navigation {
        let Some(current) = self.selected.as_deref() else {
            return Navigation::NoSelection;
        };
        let visible = self.visible(docs);
        let Some(index) = visible.iter().position(|d| d.id == current) else {
            return Navigation::NoSelection;
        };

        match visible.get(index + 1) {
            Some(next) => {
                self.selected = Some(next.id.clone());
                Navigation::Moved(next.id.clone())
            }
            None => Navigation::EndOfList,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::document::SourceFile;
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    fn docs(types: &[DocType]) -> Vec<DocumentData> {
        types
            .iter()
            .enumerate()
            .map(|(i, t)| {
                let source = SourceFile::from_path(format!("/scans/{}.pdf", i + 1)).unwrap();
                let mut doc = DocumentData::placeholder(format!("doc-{}", i + 1), source, Utc::now());
                doc.doc_type = *t;
                doc
            })
            .collect()
    }

    fn ids(docs: &[&DocumentData]) -> Vec<String> {
        docs.iter().map(|d| d.id.clone()).collect()
    }

    #[test]
    fn test_filter_preserves_order() {
        let all = docs(&[DocType::Bol, DocType::Invoice, DocType::Bol, DocType::Unknown]);

        assert_eq!(ids(&filter_by_type(&all, TypeFilter::All)).len(), 4);
        assert_eq!(
            ids(&filter_by_type(&all, TypeFilter::Only(DocType::Bol))),
            vec!["doc-1", "doc-3"]
        );
        assert!(filter_by_type(&all, TypeFilter::Only(DocType::Receipt)).is_empty());
    }

    #[test]
    fn test_group_precedence_omits_empty_groups() {
        let all = docs(&[DocType::Unknown, DocType::Receipt, DocType::Invoice, DocType::Receipt]);
        let groups: Vec<(DocType, Vec<String>)> = group_by_type(&all)
            .into_iter()
            .map(|(t, g)| (t, ids(&g)))
            .collect();

        assert_eq!(
            groups,
            vec![
                (DocType::Invoice, vec!["doc-3".to_string()]),
                (DocType::Receipt, vec!["doc-2".to_string(), "doc-4".to_string()]),
                (DocType::Unknown, vec!["doc-1".to_string()]),
            ]
        );
    }

    #[test]
    fn test_counts_only_present_types() {
        let all = docs(&[DocType::Receipt, DocType::Invoice, DocType::Unknown, DocType::Invoice]);
        let counts = counts_by_type(&all);

        assert_eq!(counts.all, 4);
        assert_eq!(counts.by_type, vec![(DocType::Invoice, 2), (DocType::Receipt, 1)]);
        assert_eq!(counts.distinct_types(), 2);
        assert_eq!(counts.get(TypeFilter::Only(DocType::Bol)), 0);
        assert_eq!(
            counts.filters(),
            vec![
                TypeFilter::All,
                TypeFilter::Only(DocType::Invoice),
                TypeFilter::Only(DocType::Receipt)
            ]
        );
    }

    #[test]
    fn test_filter_switch_moves_selection() {
        let all = docs(&[DocType::Invoice, DocType::Invoice, DocType::Bol]);
        let mut view = ReviewView::new();
        view.resolve(&all);
        assert!(view.select("doc-2", &all));

        view.set_filter(TypeFilter::Only(DocType::Bol), &all);
        assert_eq!(view.selected(), Some("doc-3"));
    }

    #[test]
    fn test_selection_kept_when_visible() {
        let all = docs(&[DocType::Invoice, DocType::Invoice, DocType::Bol]);
        let mut view = ReviewView::new();
        view.select("doc-2", &all);

        view.set_filter(TypeFilter::Only(DocType::Invoice), &all);
        assert_eq!(view.selected(), Some("doc-2"));
    }

    #[test]
    fn test_empty_view_clears_selection() {
        let all = docs(&[DocType::Invoice]);
        let mut view = ReviewView::new();
        view.resolve(&all);
        assert_eq!(view.selected(), Some("doc-1"));

        view.set_filter(TypeFilter::Only(DocType::Receipt), &all);
        assert_eq!(view.selected(), None);
        assert!(view.selected_document(&all).is_none());
    }

    #[test]
    fn test_auto_select_first() {
        let mut view = ReviewView::new();
        view.resolve(&[]);
        assert_eq!(view.selected(), None);

        let all = docs(&[DocType::Bol, DocType::Invoice]);
        view.resolve(&all);
        assert_eq!(view.selected(), Some("doc-1"));
    }

    #[test]
    fn test_select_outside_view_is_rejected() {
        let all = docs(&[DocType::Invoice, DocType::Bol]);
        let mut view = ReviewView::new();
        view.set_filter(TypeFilter::Only(DocType::Invoice), &all);

        assert!(!view.select("doc-2", &all));
        assert_eq!(view.selected(), Some("doc-1"));
    }

    #[test]
    fn test_next_stops_at_end() {
        let all = docs(&[DocType::Invoice, DocType::Bol, DocType::Invoice]);
        let mut view = ReviewView::new();
        view.resolve(&all);

        assert_eq!(view.next(&all), Navigation::Moved("doc-2".to_string()));
        assert_eq!(view.next(&all), Navigation::Moved("doc-3".to_string()));
        assert_eq!(view.next(&all), Navigation::EndOfList);
        assert_eq!(view.selected(), Some("doc-3"));
    }

    #[test]
    fn test_next_follows_filter_order() {
        let all = docs(&[DocType::Invoice, DocType::Bol, DocType::Invoice]);
        let mut view = ReviewView::new();
        view.set_filter(TypeFilter::Only(DocType::Invoice), &all);

        assert_eq!(view.next(&all), Navigation::Moved("doc-3".to_string()));
        assert_eq!(view.next(&all), Navigation::EndOfList);
    }

    #[test]
    fn test_next_without_selection() {
        let mut view = ReviewView::new();
        assert_eq!(view.next(&[]), Navigation::NoSelection);
    }

    #[test]
    fn test_filter_parsing() {
        assert_eq!("all".parse::<TypeFilter>(), Ok(TypeFilter::All));
        assert_eq!("bol".parse::<TypeFilter>(), Ok(TypeFilter::Only(DocType::Bol)));
        assert!("memo".parse::<TypeFilter>().is_err());
        assert_eq!(
            serde_json::to_string(&TypeFilter::Only(DocType::Receipt)).unwrap(),
            "\"RECEIPT\""
        );
    }
}
