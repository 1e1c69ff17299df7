//! Plain-text document parser.
//!
//! Reads files as UTF-8 (falling back to lossy decoding for stray bytes)
//! and pulls simple pipe-delimited tables out of the text so agents can
//! reference tabular data from warehouse reports.

use async_trait::async_trait;
use std::path::Path;
use tracing::debug;
use warebot_application::ports::document_parser::{DocumentParser, ParsedDocument, ParserError};

/// Parser for plain-text documents (.txt, .md, .csv-ish reports).
pub struct TextDocumentParser;

impl TextDocumentParser {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TextDocumentParser {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentParser for TextDocumentParser {
    async fn parse(&self, path: &Path) -> Result<ParsedDocument, ParserError> {
        if !path.exists() {
            return Err(ParserError::NotFound(path.to_path_buf()));
        }

        let bytes = tokio::fs::read(path).await.map_err(|e| ParserError::Unreadable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let text = match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
        };

        if text.trim().is_empty() {
            return Err(ParserError::Empty(path.to_path_buf()));
        }

        let tables = extract_tables(&text);
        debug!(
            "Parsed {} ({} chars, {} tables)",
            path.display(),
            text.chars().count(),
            tables.len()
        );

        let mut parsed = ParsedDocument::new(text).with_tables(tables);
        if let Some(ext) = path.extension() {
            parsed = parsed.with_metadata("extension", ext.to_string_lossy());
        }
        Ok(parsed)
    }
}

/// Pull pipe- or tab-delimited tables out of text. A table is two or more
/// consecutive delimited rows; markdown separator rows (`|---|---|`) are
/// skipped.
fn extract_tables(text: &str) -> Vec<Vec<Vec<String>>> {
    let mut tables = Vec::new();
    let mut current: Vec<Vec<String>> = Vec::new();

    for line in text.lines() {
        match parse_row(line) {
            Some(Row::Cells(row)) => current.push(row),
            // A separator continues the table it sits in
            Some(Row::Separator) => {}
            None => flush_table(&mut current, &mut tables),
        }
    }
    flush_table(&mut current, &mut tables);

    tables
}

fn flush_table(current: &mut Vec<Vec<String>>, tables: &mut Vec<Vec<Vec<String>>>) {
    if current.len() >= 2 {
        tables.push(std::mem::take(current));
    } else {
        current.clear();
    }
}

enum Row {
    Cells(Vec<String>),
    /// Markdown header separator (`|---|---|`)
    Separator,
}

fn parse_row(line: &str) -> Option<Row> {
    let trimmed = line.trim();

    let cells: Vec<String> = if trimmed.contains('|') {
        trimmed
            .trim_matches('|')
            .split('|')
            .map(|c| c.trim().to_string())
            .collect()
    } else if trimmed.contains('\t') {
        trimmed.split('\t').map(|c| c.trim().to_string()).collect()
    } else {
        return None;
    };

    if cells.len() < 2 {
        return None;
    }
    if cells
        .iter()
        .all(|c| !c.is_empty() && c.chars().all(|ch| ch == '-' || ch == ':'))
    {
        return Some(Row::Separator);
    }
    Some(Row::Cells(cells))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    async fn parse_str(content: &str) -> Result<ParsedDocument, ParserError> {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.txt");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(file, "{}", content).unwrap();
        TextDocumentParser::new().parse(&path).await
    }

    #[tokio::test]
    async fn test_missing_file_is_not_found() {
        let err = TextDocumentParser::new()
            .parse(Path::new("/nonexistent/report.txt"))
            .await
            .unwrap_err();
        assert!(matches!(err, ParserError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_blank_file_is_empty() {
        let err = parse_str("   \n\n  ").await.unwrap_err();
        assert!(matches!(err, ParserError::Empty(_)));
    }

    #[tokio::test]
    async fn test_plain_text_has_no_tables() {
        let parsed = parse_str("inventory levels are fine").await.unwrap();
        assert_eq!(parsed.text, "inventory levels are fine");
        assert!(parsed.tables.is_empty());
    }

    #[tokio::test]
    async fn test_markdown_table_extracted() {
        let content = "Stock report\n\n\
                       | SKU | Count |\n\
                       |-----|-------|\n\
                       | A-1 | 500 |\n\
                       | B-2 | 120 |\n";
        let parsed = parse_str(content).await.unwrap();
        assert_eq!(parsed.tables.len(), 1);
        let table = &parsed.tables[0];
        assert_eq!(table.len(), 3); // header + 2 data rows, separator dropped
        assert_eq!(table[0], vec!["SKU", "Count"]);
        assert_eq!(table[2], vec!["B-2", "120"]);
    }

    #[tokio::test]
    async fn test_tsv_rows_extracted() {
        let parsed = parse_str("sku\tcount\nA-1\t500\n").await.unwrap();
        assert_eq!(parsed.tables.len(), 1);
        assert_eq!(parsed.tables[0][1], vec!["A-1", "500"]);
    }

    #[tokio::test]
    async fn test_single_delimited_line_is_not_a_table() {
        let parsed = parse_str("a | b\nplain text follows").await.unwrap();
        assert!(parsed.tables.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_utf8_falls_back_to_lossy() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.txt");
        std::fs::write(&path, [b'o', b'k', 0xFF, b'!']).unwrap();

        let parsed = TextDocumentParser::new().parse(&path).await.unwrap();
        assert!(parsed.text.starts_with("ok"));
        assert!(parsed.text.contains('\u{FFFD}'));
    }
}
