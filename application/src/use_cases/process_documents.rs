//! Process documents use case
//!
//! Parses files through the parser port and loads them into the document
//! store. Each file succeeds or fails on its own; one bad file never aborts
//! the batch.

use crate::ports::document_parser::DocumentParser;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};
use warebot_domain::{DocumentRecord, DocumentStore};

/// Per-file outcome of an ingest batch.
#[derive(Debug, Clone)]
pub struct IngestReport {
    pub source: String,
    pub success: bool,
    pub error: Option<String>,
    /// Older documents evicted to make room
    pub evicted: usize,
    /// Whether the stored text was truncated to fit the budget
    pub truncated: bool,
}

impl IngestReport {
    fn ok(source: String, evicted: usize, truncated: bool) -> Self {
        Self {
            source,
            success: true,
            error: None,
            evicted,
            truncated,
        }
    }

    fn failed(source: String, error: String) -> Self {
        Self {
            source,
            success: false,
            error: Some(error),
            evicted: 0,
            truncated: false,
        }
    }
}

/// Use case for loading documents into the context store.
pub struct ProcessDocumentsUseCase<P: DocumentParser> {
    parser: Arc<P>,
}

impl<P: DocumentParser> ProcessDocumentsUseCase<P> {
    pub fn new(parser: Arc<P>) -> Self {
        Self { parser }
    }

    pub async fn execute(
        &self,
        store: &mut DocumentStore,
        paths: &[impl AsRef<Path>],
    ) -> Vec<IngestReport> {
        let mut reports = Vec::with_capacity(paths.len());

        for path in paths {
            let path = path.as_ref();
            let source = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());

            let report = match self.parser.parse(path).await {
                Ok(parsed) => {
                    let record =
                        DocumentRecord::new(source.clone(), parsed.text).with_tables(parsed.tables);
                    match store.add(record) {
                        Ok(outcome) => {
                            info!(
                                "Ingested {} (evicted {}, truncated: {})",
                                source, outcome.evicted, outcome.truncated
                            );
                            IngestReport::ok(source, outcome.evicted, outcome.truncated)
                        }
                        Err(e) => {
                            warn!("Could not store {}: {}", source, e);
                            IngestReport::failed(source, e.to_string())
                        }
                    }
                }
                Err(e) => {
                    warn!("Could not parse {}: {}", source, e);
                    store.record_failure();
                    IngestReport::failed(source, e.to_string())
                }
            };
            reports.push(report);
        }

        reports
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::document_parser::{ParsedDocument, ParserError};
    use async_trait::async_trait;
    use std::path::PathBuf;
    use warebot_domain::ContextBudget;

    /// Parser that answers from a canned map; unknown paths are NotFound.
    struct CannedParser {
        documents: Vec<(String, String)>,
    }

    #[async_trait]
    impl DocumentParser for CannedParser {
        async fn parse(&self, path: &Path) -> Result<ParsedDocument, ParserError> {
            let name = path.file_name().unwrap().to_string_lossy();
            self.documents
                .iter()
                .find(|(n, _)| *n == name)
                .map(|(_, text)| ParsedDocument::new(text.clone()))
                .ok_or_else(|| ParserError::NotFound(path.to_path_buf()))
        }
    }

    #[tokio::test]
    async fn test_batch_isolates_failures() {
        let parser = Arc::new(CannedParser {
            documents: vec![("good.txt".to_string(), "inventory notes".to_string())],
        });
        let use_case = ProcessDocumentsUseCase::new(parser);
        let mut store = DocumentStore::default();

        let paths = [PathBuf::from("good.txt"), PathBuf::from("missing.txt")];
        let reports = use_case.execute(&mut store, &paths).await;

        assert_eq!(reports.len(), 2);
        assert!(reports[0].success);
        assert!(!reports[1].success);
        assert!(reports[1].error.as_deref().unwrap().contains("missing.txt"));

        let stats = store.statistics();
        assert_eq!(stats.documents, 1);
        assert_eq!(stats.failed_ingests, 1);
    }

    #[tokio::test]
    async fn test_report_carries_eviction_and_truncation() {
        let parser = Arc::new(CannedParser {
            documents: vec![
                ("a.txt".to_string(), "x".repeat(80)),
                ("b.txt".to_string(), "y".repeat(300)),
            ],
        });
        let use_case = ProcessDocumentsUseCase::new(parser);
        let mut store = DocumentStore::new(ContextBudget::new(100, 90));

        let reports = use_case
            .execute(&mut store, &[PathBuf::from("a.txt"), PathBuf::from("b.txt")])
            .await;

        assert!(reports[1].success);
        assert!(reports[1].truncated);
        assert_eq!(reports[1].evicted, 1);
        assert!(store.total_chars() <= 100);
    }
}
