//! Query value object

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A structured parameter attached to a query.
///
/// Agents check these before reaching for the LLM: a query whose params
/// fully satisfy a formula's required fields is answered deterministically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Number(f64),
    Text(String),
    Series(Vec<f64>),
    Items(Vec<ValueItem>),
}

/// An (id, value) pair for ranking analyses (ABC, Pareto).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueItem {
    pub id: String,
    pub value: f64,
}

impl ValueItem {
    pub fn new(id: impl Into<String>, value: f64) -> Self {
        Self {
            id: id.into(),
            value,
        }
    }
}

/// Named structured parameters. BTreeMap keeps iteration deterministic.
pub type Params = BTreeMap<String, ParamValue>;

/// A user query: free text plus optional structured parameters (Value Object)
///
/// Immutable once submitted. The text drives routing and the LLM path;
/// the params drive the deterministic formula path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    text: String,
    #[serde(default)]
    params: Params,
}

impl Query {
    /// Create a new query.
    ///
    /// # Panics
    /// Panics if the text is empty or only whitespace.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        assert!(!text.trim().is_empty(), "Query text cannot be empty");
        Self {
            text,
            params: Params::new(),
        }
    }

    /// Try to create a query, returning None if the text is blank.
    pub fn try_new(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        if text.trim().is_empty() {
            None
        } else {
            Some(Self {
                text,
                params: Params::new(),
            })
        }
    }

    pub fn with_params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    pub fn with_param(mut self, name: impl Into<String>, value: ParamValue) -> Self {
        self.params.insert(name.into(), value);
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Look up a numeric parameter.
    pub fn number(&self, name: &str) -> Option<f64> {
        match self.params.get(name) {
            Some(ParamValue::Number(n)) => Some(*n),
            _ => None,
        }
    }

    /// Look up a numeric series parameter.
    pub fn series(&self, name: &str) -> Option<&[f64]> {
        match self.params.get(name) {
            Some(ParamValue::Series(s)) => Some(s),
            _ => None,
        }
    }

    /// Look up an item-list parameter.
    pub fn items(&self, name: &str) -> Option<&[ValueItem]> {
        match self.params.get(name) {
            Some(ParamValue::Items(items)) => Some(items),
            _ => None,
        }
    }

    /// Look up a text parameter.
    pub fn param_text(&self, name: &str) -> Option<&str> {
        match self.params.get(name) {
            Some(ParamValue::Text(t)) => Some(t),
            _ => None,
        }
    }

    /// True if all named numeric parameters are present.
    pub fn has_numbers(&self, names: &[&str]) -> bool {
        names.iter().all(|n| self.number(n).is_some())
    }
}

impl std::fmt::Display for Query {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text)
    }
}

impl From<&str> for Query {
    fn from(s: &str) -> Self {
        Query::new(s)
    }
}

impl From<String> for Query {
    fn from(s: String) -> Self {
        Query::new(s)
    }
}
