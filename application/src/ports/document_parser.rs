//! Document parser port
//!
//! The core depends on a single capability: turn a file into text plus
//! tables. Which parser library handles which format - and any
//! primary/fallback selection - is the adapter's concern.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from document parsing. Reported per file; one failing file never
/// blocks the rest of a batch.
#[derive(Error, Debug)]
pub enum ParserError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    #[error("File is empty: {0}")]
    Empty(PathBuf),

    #[error("Could not read {path}: {reason}")]
    Unreadable { path: PathBuf, reason: String },
}

/// Extraction result for one file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedDocument {
    pub text: String,
    /// Tables as rows of cells, one Vec per detected table
    pub tables: Vec<Vec<Vec<String>>>,
    pub metadata: BTreeMap<String, String>,
}

impl ParsedDocument {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tables: Vec::new(),
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_tables(mut self, tables: Vec<Vec<Vec<String>>>) -> Self {
        self.tables = tables;
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// Port for turning files into [`ParsedDocument`]s.
#[async_trait]
pub trait DocumentParser: Send + Sync {
    async fn parse(&self, path: &Path) -> Result<ParsedDocument, ParserError>;
}
