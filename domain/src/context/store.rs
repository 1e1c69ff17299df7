//! Budgeted document context store.
//!
//! Holds parsed-document text for agent prompts under a hard character
//! budget. An incoming document is first head-truncated to the per-document
//! cap; if the insert would still overflow the aggregate budget, the oldest
//! records are dropped whole. `add` never returns with the store over
//! budget.

use crate::context::budget::ContextBudget;
use crate::core::error::ContextError;
use serde::{Deserialize, Serialize};

/// A parsed document held in the context store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// Source file name or label
    pub source: String,
    /// Extracted text (possibly truncated to fit the budget)
    text: String,
    /// Char count of `text`, kept in sync so statistics never re-scan
    chars: usize,
    /// Extracted tables: rows of cells, one Vec per table
    pub tables: Vec<Vec<Vec<String>>>,
    /// Whether the stored text was cut down from the original
    pub truncated: bool,
}

impl DocumentRecord {
    pub fn new(source: impl Into<String>, text: impl Into<String>) -> Self {
        let text = text.into();
        let chars = text.chars().count();
        Self {
            source: source.into(),
            text,
            chars,
            tables: Vec::new(),
            truncated: false,
        }
    }

    pub fn with_tables(mut self, tables: Vec<Vec<Vec<String>>>) -> Self {
        self.tables = tables;
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn chars(&self) -> usize {
        self.chars
    }

    fn truncate_to(&mut self, max_chars: usize) {
        self.text = truncate_chars(&self.text, max_chars);
        self.chars = self.text.chars().count();
        self.truncated = true;
    }
}

/// Outcome of a successful `add`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddOutcome {
    /// Older records dropped to make room
    pub evicted: usize,
    /// Whether the stored text was truncated
    pub truncated: bool,
}

/// One search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchMatch {
    pub source: String,
    pub score: usize,
    pub excerpt: String,
}

/// Store counters, exposed through the orchestrator's `statistics()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StoreStatistics {
    pub documents: usize,
    pub total_chars: usize,
    pub budget_chars: usize,
    pub evicted: usize,
    pub truncated: usize,
    pub failed_ingests: usize,
}

/// FIFO document store with a hard aggregate character budget.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    budget: ContextBudget,
    records: Vec<DocumentRecord>,
    evicted: usize,
    truncated: usize,
    failed_ingests: usize,
}

impl DocumentStore {
    pub fn new(budget: ContextBudget) -> Self {
        Self {
            budget,
            records: Vec::new(),
            evicted: 0,
            truncated: 0,
            failed_ingests: 0,
        }
    }

    pub fn budget(&self) -> &ContextBudget {
        &self.budget
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn total_chars(&self) -> usize {
        self.records.iter().map(|r| r.chars()).sum()
    }

    /// Add a document, evicting and truncating as needed to stay within
    /// budget. Returns what had to be done to make it fit.
    pub fn add(&mut self, mut record: DocumentRecord) -> Result<AddOutcome, ContextError> {
        if self.budget.max_total_chars() == 0 {
            return Err(ContextError::ZeroBudget);
        }
        if record.text.trim().is_empty() {
            self.failed_ingests += 1;
            return Err(ContextError::EmptyDocument(record.source));
        }

        let mut truncated = false;
        let per_doc_cap = self
            .budget
            .max_document_chars()
            .min(self.budget.max_total_chars());
        if record.chars() > per_doc_cap {
            record.truncate_to(per_doc_cap);
            truncated = true;
        }

        // Oldest-first eviction until the newcomer fits
        let mut evicted = 0;
        while !self.records.is_empty()
            && self.total_chars() + record.chars() > self.budget.max_total_chars()
        {
            self.records.remove(0);
            evicted += 1;
        }

        self.evicted += evicted;
        if truncated {
            self.truncated += 1;
        }
        self.records.push(record);

        debug_assert!(self.total_chars() <= self.budget.max_total_chars());
        Ok(AddOutcome { evicted, truncated })
    }

    /// Record a parse failure so statistics reflect it.
    pub fn record_failure(&mut self) {
        self.failed_ingests += 1;
    }

    /// Case-insensitive keyword search across stored text.
    ///
    /// Score is the total occurrence count of query terms; results are
    /// ordered score descending with ties kept in insertion order.
    pub fn search(&self, query: &str) -> Vec<SearchMatch> {
        let terms: Vec<String> = query
            .split_whitespace()
            .map(|t| t.to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();
        if terms.is_empty() {
            return Vec::new();
        }

        let mut matches: Vec<SearchMatch> = self
            .records
            .iter()
            .filter_map(|record| {
                let lowered = record.text.to_lowercase();
                let score: usize = terms.iter().map(|t| count_occurrences(&lowered, t)).sum();
                if score == 0 {
                    return None;
                }
                Some(SearchMatch {
                    source: record.source.clone(),
                    score,
                    excerpt: excerpt_around_first(&record.text, &lowered, &terms),
                })
            })
            .collect();

        // Stable sort preserves insertion order among equal scores
        matches.sort_by(|a, b| b.score.cmp(&a.score));
        matches
    }

    /// Concatenated context for agent prompts, newest documents last,
    /// head-capped at `max_chars`.
    pub fn combined_context(&self, max_chars: usize) -> String {
        let mut combined = String::new();
        for record in &self.records {
            if !combined.is_empty() {
                combined.push_str("\n\n");
            }
            combined.push_str(&format!("[{}]\n{}", record.source, record.text));
        }
        if combined.chars().count() > max_chars {
            truncate_chars(&combined, max_chars)
        } else {
            combined
        }
    }

    pub fn clear(&mut self) {
        self.records.clear();
        self.evicted = 0;
        self.truncated = 0;
        self.failed_ingests = 0;
    }

    pub fn statistics(&self) -> StoreStatistics {
        StoreStatistics {
            documents: self.records.len(),
            total_chars: self.total_chars(),
            budget_chars: self.budget.max_total_chars(),
            evicted: self.evicted,
            truncated: self.truncated,
            failed_ingests: self.failed_ingests,
        }
    }

    pub fn records(&self) -> &[DocumentRecord] {
        &self.records
    }
}

impl Default for DocumentStore {
    fn default() -> Self {
        Self::new(ContextBudget::default())
    }
}

/// Keep the first `max_chars` characters, respecting UTF-8 boundaries.
fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

fn count_occurrences(haystack: &str, needle: &str) -> usize {
    if needle.is_empty() {
        return 0;
    }
    haystack.matches(needle).count()
}

/// A short window of original-case text around the first term hit.
fn excerpt_around_first(original: &str, lowered: &str, terms: &[String]) -> String {
    const WINDOW: usize = 160;

    let first_hit = terms.iter().filter_map(|t| lowered.find(t.as_str())).min();
    let Some(pos) = first_hit else {
        return truncate_chars(original, WINDOW);
    };

    let start = original
        .char_indices()
        .map(|(i, _)| i)
        .take_while(|i| *i <= pos)
        .last()
        .unwrap_or(0)
        .saturating_sub(WINDOW / 4);
    // Snap to a char boundary
    let start = (0..=start).rev().find(|i| original.is_char_boundary(*i)).unwrap_or(0);

    original[start..].chars().take(WINDOW).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_budget(total: usize, per_doc: usize) -> DocumentStore {
        DocumentStore::new(ContextBudget::new(total, per_doc))
    }

    #[test]
    fn test_add_within_budget() {
        let mut store = DocumentStore::default();
        let outcome = store.add(DocumentRecord::new("a.txt", "hello world")).unwrap();
        assert_eq!(outcome, AddOutcome { evicted: 0, truncated: false });
        assert_eq!(store.statistics().documents, 1);
    }

    #[test]
    fn test_empty_document_rejected() {
        let mut store = DocumentStore::default();
        let err = store.add(DocumentRecord::new("empty.txt", "   ")).unwrap_err();
        assert!(matches!(err, ContextError::EmptyDocument(_)));
        assert_eq!(store.statistics().failed_ingests, 1);
    }

    #[test]
    fn test_fifo_eviction_respects_budget() {
        let mut store = store_with_budget(100, 100);
        store.add(DocumentRecord::new("one", "a".repeat(60))).unwrap();
        store.add(DocumentRecord::new("two", "b".repeat(30))).unwrap();

        // 60 + 30 + 50 > 100: "one" must go
        let outcome = store.add(DocumentRecord::new("three", "c".repeat(50))).unwrap();
        assert_eq!(outcome.evicted, 1);

        let stats = store.statistics();
        assert!(stats.total_chars <= 100);
        assert_eq!(stats.documents, 2);
        assert_eq!(stats.evicted, 1);
        assert_eq!(store.records()[0].source, "two");
    }

    #[test]
    fn test_oversized_document_truncated() {
        let mut store = store_with_budget(100, 40);
        let outcome = store.add(DocumentRecord::new("big", "x".repeat(500))).unwrap();
        assert!(outcome.truncated);
        assert_eq!(store.records()[0].chars(), 40);
        assert!(store.records()[0].truncated);
        assert_eq!(store.statistics().truncated, 1);
    }

    #[test]
    fn test_record_char_count_tracks_truncation() {
        let mut store = store_with_budget(100, 25);
        store.add(DocumentRecord::new("doc", "m".repeat(80))).unwrap();

        let record = &store.records()[0];
        assert_eq!(record.chars(), 25);
        assert_eq!(record.chars(), record.text().chars().count());
    }

    #[test]
    fn test_never_exceeds_budget_under_pressure() {
        let mut store = store_with_budget(120, 120);
        for i in 0..10 {
            store
                .add(DocumentRecord::new(format!("doc-{}", i), "y".repeat(50)))
                .unwrap();
            assert!(store.total_chars() <= 120);
        }
        let stats = store.statistics();
        assert!(stats.total_chars <= stats.budget_chars);
        assert!(stats.evicted > 0);
    }

    #[test]
    fn test_search_orders_by_score() {
        let mut store = DocumentStore::default();
        store
            .add(DocumentRecord::new("a", "stock stock stock levels"))
            .unwrap();
        store.add(DocumentRecord::new("b", "stock report")).unwrap();
        store.add(DocumentRecord::new("c", "unrelated notes")).unwrap();

        let matches = store.search("STOCK");
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].source, "a");
        assert_eq!(matches[0].score, 3);
        assert_eq!(matches[1].source, "b");
    }

    #[test]
    fn test_search_ties_keep_insertion_order() {
        let mut store = DocumentStore::default();
        store.add(DocumentRecord::new("first", "pallet count")).unwrap();
        store.add(DocumentRecord::new("second", "pallet moves")).unwrap();

        let matches = store.search("pallet");
        assert_eq!(matches[0].source, "first");
        assert_eq!(matches[1].source, "second");
    }

    #[test]
    fn test_search_excerpt_contains_hit() {
        let mut store = DocumentStore::default();
        let text = format!("{} reorder point discussion", "filler ".repeat(10));
        store.add(DocumentRecord::new("doc", text)).unwrap();
        let matches = store.search("reorder");
        assert!(matches[0].excerpt.to_lowercase().contains("reorder"));
    }

    #[test]
    fn test_combined_context_capped() {
        let mut store = store_with_budget(10_000, 10_000);
        store.add(DocumentRecord::new("a", "z".repeat(500))).unwrap();
        store.add(DocumentRecord::new("b", "w".repeat(500))).unwrap();
        let context = store.combined_context(100);
        assert_eq!(context.chars().count(), 100);
        assert!(context.starts_with("[a]"));
    }

    #[test]
    fn test_clear_resets_counters() {
        let mut store = store_with_budget(50, 50);
        store.add(DocumentRecord::new("a", "q".repeat(40))).unwrap();
        store.add(DocumentRecord::new("b", "r".repeat(40))).unwrap();
        store.clear();
        assert_eq!(store.statistics(), StoreStatistics {
            budget_chars: 50,
            ..StoreStatistics::default()
        });
    }
}
