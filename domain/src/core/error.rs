//! Domain error types

use thiserror::Error;

/// Errors produced by formula input validation.
///
/// These are always locally recoverable: an agent folds them into a failed
/// `AgentResponse` instead of propagating them up the call stack.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(String),

    #[error("{name} must be greater than zero (got {value})")]
    NotPositive { name: String, value: f64 },

    #[error("{name} must not be negative (got {value})")]
    NegativeInput { name: String, value: f64 },

    #[error("Need at least {required} data points (got {actual})")]
    InsufficientData { required: usize, actual: usize },

    #[error("Standard deviation is zero - no process variation")]
    ZeroVariance,

    #[error("Item list is empty")]
    EmptyItems,

    #[error("{name} must be within {min}..={max} (got {value})")]
    OutOfRange {
        name: String,
        min: f64,
        max: f64,
        value: f64,
    },

    #[error("Upper specification limit {usl} must exceed lower limit {lsl}")]
    InvalidBounds { usl: f64, lsl: f64 },

    #[error("Could not parse expression: {0}")]
    UnparsableExpression(String),
}

impl ValidationError {
    pub fn missing(name: &str) -> Self {
        ValidationError::MissingParameter(name.to_string())
    }

    pub fn not_positive(name: &str, value: f64) -> Self {
        ValidationError::NotPositive {
            name: name.to_string(),
            value,
        }
    }

    pub fn negative(name: &str, value: f64) -> Self {
        ValidationError::NegativeInput {
            name: name.to_string(),
            value,
        }
    }

    /// Short machine-readable kind, stable across message wording changes.
    pub fn kind(&self) -> &'static str {
        match self {
            ValidationError::MissingParameter(_) => "missing_parameter",
            ValidationError::NotPositive { .. } => "not_positive",
            ValidationError::NegativeInput { .. } => "negative_input",
            ValidationError::InsufficientData { .. } => "insufficient_data",
            ValidationError::ZeroVariance => "zero_variance",
            ValidationError::EmptyItems => "empty_items",
            ValidationError::OutOfRange { .. } => "out_of_range",
            ValidationError::InvalidBounds { .. } => "invalid_bounds",
            ValidationError::UnparsableExpression(_) => "unparsable_expression",
        }
    }
}

/// Errors from the document context store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContextError {
    #[error("Document '{0}' contains no extractable text")]
    EmptyDocument(String),

    #[error("Context budget is zero - cannot store documents")]
    ZeroBudget,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display() {
        let e = ValidationError::not_positive("annual_demand", -3.0);
        assert_eq!(
            e.to_string(),
            "annual_demand must be greater than zero (got -3)"
        );
    }

    #[test]
    fn test_kind_is_stable() {
        assert_eq!(
            ValidationError::missing("order_cost").kind(),
            "missing_parameter"
        );
        assert_eq!(ValidationError::ZeroVariance.kind(), "zero_variance");
        assert_eq!(
            ValidationError::InsufficientData {
                required: 2,
                actual: 1
            }
            .kind(),
            "insufficient_data"
        );
    }
}
