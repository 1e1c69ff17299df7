//! LLM Gateway port
//!
//! Defines the interface for communicating with LLM providers. The core
//! depends on two capabilities: free-form generation and schema-guided
//! function calling. Implementations (adapters) live in the infrastructure
//! layer; any provider satisfying this interface is pluggable.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during gateway operations.
///
/// The external-service failure surface: authentication, rate limiting,
/// network, and malformed-response failures all land here and are
/// propagated verbatim - the core never retries.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),

    #[error("Provider error: {0}")]
    Provider(String),
}

/// A single generation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// Provider model identifier
    pub model: String,
    pub temperature: f64,
    /// System prompt establishing the agent's role
    pub system: String,
    /// User prompt (query plus any document context)
    pub prompt: String,
}

impl GenerateRequest {
    pub fn new(
        model: impl Into<String>,
        temperature: f64,
        system: impl Into<String>,
        prompt: impl Into<String>,
    ) -> Self {
        Self {
            model: model.into(),
            temperature,
            system: system.into(),
            prompt: prompt.into(),
        }
    }
}

/// JSON Schema description of one callable formula, in the provider-neutral
/// shape used by chat-completions tool calling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSchema {
    pub name: String,
    pub description: String,
    /// JSON Schema for the arguments object
    pub parameters: serde_json::Value,
}

impl ToolSchema {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: serde_json::Value,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
        }
    }
}

/// What the model decided to do with the offered tools.
#[derive(Debug, Clone, PartialEq)]
pub enum FunctionCallOutcome {
    /// The model picked a tool and produced arguments for it
    Call {
        name: String,
        arguments: serde_json::Value,
    },
    /// The model answered directly without calling a tool
    Message(String),
}

/// Gateway for LLM communication
///
/// This port defines how the application layer reaches LLM providers.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Plain text generation.
    async fn generate(&self, request: GenerateRequest) -> Result<String, GatewayError>;

    /// Generation with tool schemas offered; the model may answer directly
    /// or return a structured call for the caller to execute.
    async fn function_call(
        &self,
        request: GenerateRequest,
        tools: &[ToolSchema],
    ) -> Result<FunctionCallOutcome, GatewayError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gateway_error_display() {
        let e = GatewayError::RateLimited("retry after 30s".to_string());
        assert_eq!(e.to_string(), "Rate limited: retry after 30s");
    }

    #[test]
    fn test_tool_schema_construction() {
        let schema = ToolSchema::new(
            "eoq",
            "Economic Order Quantity",
            serde_json::json!({"type": "object"}),
        );
        assert_eq!(schema.name, "eoq");
        assert_eq!(schema.parameters["type"], "object");
    }
}
