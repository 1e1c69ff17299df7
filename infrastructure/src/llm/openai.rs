//! OpenAI-compatible chat-completions gateway.
//!
//! Implements the [`LlmGateway`] port over any provider speaking the
//! `/v1/chat/completions` protocol (OpenAI, DeepSeek, local inference
//! servers). Function calling uses the standard `tools` array.

use crate::config::FileProviderConfig;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;
use warebot_application::ports::llm_gateway::{
    FunctionCallOutcome, GatewayError, GenerateRequest, LlmGateway, ToolSchema,
};

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    temperature: f64,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<ToolEntry>>,
}

#[derive(Serialize)]
struct ToolEntry {
    #[serde(rename = "type")]
    kind: &'static str,
    function: ToolFunction,
}

#[derive(Serialize)]
struct ToolFunction {
    name: String,
    description: String,
    parameters: Value,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
    #[serde(default)]
    tool_calls: Vec<ResponseToolCall>,
}

#[derive(Deserialize)]
struct ResponseToolCall {
    function: ResponseFunction,
}

#[derive(Deserialize)]
struct ResponseFunction {
    name: String,
    /// The provider encodes arguments as a JSON string, not an object
    arguments: String,
}

/// Gateway adapter for OpenAI-compatible providers.
pub struct OpenAiGateway {
    base_url: String,
    api_key: String,
    http_client: reqwest::Client,
}

impl OpenAiGateway {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, GatewayError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            http_client,
        })
    }

    /// Build a gateway from provider config, reading the API key from the
    /// configured environment variable.
    pub fn from_config(provider: &FileProviderConfig) -> Result<Self, GatewayError> {
        let api_key = std::env::var(&provider.api_key_env).map_err(|_| {
            GatewayError::AuthenticationFailed(format!(
                "environment variable {} is not set",
                provider.api_key_env
            ))
        })?;
        Self::new(
            &provider.base_url,
            api_key,
            Duration::from_secs(provider.timeout_secs),
        )
    }

    fn build_request(request: &GenerateRequest, tools: Option<&[ToolSchema]>) -> ChatRequest {
        ChatRequest {
            model: request.model.clone(),
            temperature: request.temperature,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: request.system.clone(),
                },
                ChatMessage {
                    role: "user",
                    content: request.prompt.clone(),
                },
            ],
            tools: tools.map(|tools| {
                tools
                    .iter()
                    .map(|t| ToolEntry {
                        kind: "function",
                        function: ToolFunction {
                            name: t.name.clone(),
                            description: t.description.clone(),
                            parameters: t.parameters.clone(),
                        },
                    })
                    .collect()
            }),
        }
    }

    async fn post(&self, body: &ChatRequest) -> Result<ChatResponse, GatewayError> {
        let url = format!("{}/v1/chat/completions", self.base_url);
        debug!("POST {} (model: {})", url, body.model);

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(match status.as_u16() {
                401 | 403 => GatewayError::AuthenticationFailed(detail),
                429 => GatewayError::RateLimited(detail),
                _ => GatewayError::Provider(format!("HTTP {}: {}", status, detail)),
            });
        }

        response
            .json::<ChatResponse>()
            .await
            .map_err(|e| GatewayError::MalformedResponse(e.to_string()))
    }

    fn first_message(response: ChatResponse) -> Result<ResponseMessage, GatewayError> {
        response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message)
            .ok_or_else(|| GatewayError::MalformedResponse("no choices in response".to_string()))
    }
}

#[async_trait]
impl LlmGateway for OpenAiGateway {
    async fn generate(&self, request: GenerateRequest) -> Result<String, GatewayError> {
        let body = Self::build_request(&request, None);
        let message = Self::first_message(self.post(&body).await?)?;
        message
            .content
            .ok_or_else(|| GatewayError::MalformedResponse("message has no content".to_string()))
    }

    async fn function_call(
        &self,
        request: GenerateRequest,
        tools: &[ToolSchema],
    ) -> Result<FunctionCallOutcome, GatewayError> {
        let body = Self::build_request(&request, Some(tools));
        let message = Self::first_message(self.post(&body).await?)?;

        if let Some(call) = message.tool_calls.into_iter().next() {
            let arguments: Value = serde_json::from_str(&call.function.arguments)
                .map_err(|e| GatewayError::MalformedResponse(format!("tool arguments: {}", e)))?;
            return Ok(FunctionCallOutcome::Call {
                name: call.function.name,
                arguments,
            });
        }

        message
            .content
            .map(FunctionCallOutcome::Message)
            .ok_or_else(|| {
                GatewayError::MalformedResponse("message has neither content nor tool call".to_string())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> GenerateRequest {
        GenerateRequest::new("gpt-4o", 0.7, "You are helpful", "What is EOQ?")
    }

    #[test]
    fn test_request_body_shape() {
        let tools = [ToolSchema::new(
            "calculate_eoq",
            "EOQ",
            serde_json::json!({"type": "object"}),
        )];
        let body = OpenAiGateway::build_request(&request(), Some(&tools));
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["model"], "gpt-4o");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "What is EOQ?");
        assert_eq!(json["tools"][0]["type"], "function");
        assert_eq!(json["tools"][0]["function"]["name"], "calculate_eoq");
    }

    #[test]
    fn test_request_without_tools_omits_field() {
        let body = OpenAiGateway::build_request(&request(), None);
        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("tools").is_none());
    }

    #[test]
    fn test_response_tool_call_parsing() {
        let raw = r#"{
            "choices": [{
                "message": {
                    "content": null,
                    "tool_calls": [{
                        "function": {
                            "name": "calculate_eoq",
                            "arguments": "{\"annual_demand\": 10000}"
                        }
                    }]
                }
            }]
        }"#;
        let response: ChatResponse = serde_json::from_str(raw).unwrap();
        let message = OpenAiGateway::first_message(response).unwrap();
        assert_eq!(message.tool_calls[0].function.name, "calculate_eoq");
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let gateway =
            OpenAiGateway::new("https://api.openai.com/", "key", Duration::from_secs(5)).unwrap();
        assert_eq!(gateway.base_url, "https://api.openai.com");
    }
}
