//! Character budget for the document context store.
//!
//! [`ContextBudget`] caps how much parsed-document text is retained for
//! agent prompts, preventing unbounded context growth when many files are
//! ingested. Two knobs:
//!
//! - `max_total_chars`: cap on the aggregate stored text
//! - `max_document_chars`: cap on any single document (oversized documents
//!   are head-truncated at ingest)

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextBudget {
    max_total_chars: usize,
    max_document_chars: usize,
}

impl ContextBudget {
    pub fn new(max_total_chars: usize, max_document_chars: usize) -> Self {
        Self {
            max_total_chars,
            max_document_chars,
        }
    }

    /// Strict preset: tight limits for cost-sensitive usage.
    pub fn strict() -> Self {
        Self {
            max_total_chars: 10_000,
            max_document_chars: 4_000,
        }
    }

    /// Generous preset: for long ingest sessions.
    pub fn generous() -> Self {
        Self {
            max_total_chars: 200_000,
            max_document_chars: 50_000,
        }
    }

    /// Unlimited preset: no truncation.
    pub fn unlimited() -> Self {
        Self {
            max_total_chars: usize::MAX,
            max_document_chars: usize::MAX,
        }
    }

    pub fn max_total_chars(&self) -> usize {
        self.max_total_chars
    }

    pub fn max_document_chars(&self) -> usize {
        self.max_document_chars
    }

    pub fn with_max_total_chars(mut self, chars: usize) -> Self {
        self.max_total_chars = chars;
        self
    }

    pub fn with_max_document_chars(mut self, chars: usize) -> Self {
        self.max_document_chars = chars;
        self
    }

    /// Validate this budget, returning a list of issues.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();
        if self.max_total_chars == 0 {
            issues.push("context_budget: max_total_chars must be >= 1".to_string());
        }
        if self.max_document_chars > self.max_total_chars {
            issues.push(format!(
                "context_budget: max_document_chars ({}) must be <= max_total_chars ({})",
                self.max_document_chars, self.max_total_chars
            ));
        }
        issues
    }
}

impl Default for ContextBudget {
    /// Default: 50k chars aggregate, 20k per document.
    fn default() -> Self {
        Self {
            max_total_chars: 50_000,
            max_document_chars: 20_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let budget = ContextBudget::default();
        assert_eq!(budget.max_total_chars(), 50_000);
        assert_eq!(budget.max_document_chars(), 20_000);
    }

    #[test]
    fn test_presets() {
        assert!(ContextBudget::strict().max_total_chars() < ContextBudget::default().max_total_chars());
        assert_eq!(ContextBudget::unlimited().max_total_chars(), usize::MAX);
    }

    #[test]
    fn test_builder() {
        let budget = ContextBudget::default()
            .with_max_total_chars(1_000)
            .with_max_document_chars(500);
        assert_eq!(budget.max_total_chars(), 1_000);
        assert_eq!(budget.max_document_chars(), 500);
    }

    #[test]
    fn test_validate_ok() {
        assert!(ContextBudget::default().validate().is_empty());
    }

    #[test]
    fn test_validate_inverted() {
        let issues = ContextBudget::new(1_000, 5_000).validate();
        assert_eq!(issues.len(), 1);
        assert!(issues[0].contains("max_document_chars"));
    }

    #[test]
    fn test_validate_zero_total() {
        assert!(!ContextBudget::new(0, 0).validate().is_empty());
    }
}
