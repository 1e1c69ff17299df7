//! Helpers shared by the agent implementations: gateway invocation with
//! failure folding, and JSON argument extraction for tool calls.

use crate::ports::llm_gateway::{
    FunctionCallOutcome, GenerateRequest, LlmGateway, ToolSchema,
};
use serde_json::Value;
use tracing::{debug, warn};
use warebot_domain::{
    AgentName, AgentResponse, AgentSettings, PromptTemplate, Query, ValidationError, ValueItem,
};

/// Plain generation with the agent's system prompt. Gateway failures become
/// failed responses, never errors.
pub(crate) async fn llm_narrative<G: LlmGateway>(
    gateway: &G,
    settings: &AgentSettings,
    agent: AgentName,
    query: &Query,
    document_context: Option<&str>,
) -> AgentResponse {
    let request = GenerateRequest::new(
        &settings.model,
        settings.temperature,
        PromptTemplate::system(agent),
        PromptTemplate::agent_query(query.text(), document_context),
    );

    match gateway.generate(request).await {
        Ok(text) => AgentResponse::success(agent, text),
        Err(e) => {
            warn!("{} agent gateway call failed: {}", agent, e);
            AgentResponse::failure(agent, e.to_string())
        }
    }
}

/// Tool-assisted generation: offer the agent's formula schemas and execute
/// whatever call comes back. `execute` maps a (tool name, arguments) pair to
/// (metrics, narrative) via the formula library.
pub(crate) async fn tool_assisted<G, F>(
    gateway: &G,
    settings: &AgentSettings,
    agent: AgentName,
    query: &Query,
    document_context: Option<&str>,
    tools: &[ToolSchema],
    execute: F,
) -> AgentResponse
where
    G: LlmGateway,
    F: Fn(&str, &Value) -> Result<(Value, String), ValidationError>,
{
    let request = GenerateRequest::new(
        &settings.model,
        settings.temperature,
        PromptTemplate::system(agent),
        PromptTemplate::agent_query(query.text(), document_context),
    );

    match gateway.function_call(request, tools).await {
        Ok(FunctionCallOutcome::Call { name, arguments }) => {
            debug!("{} agent executing tool call: {}", agent, name);
            match execute(&name, &arguments) {
                Ok((metrics, narrative)) => AgentResponse::with_metrics(agent, narrative, metrics),
                Err(e) => AgentResponse::failure(agent, e.to_string()),
            }
        }
        Ok(FunctionCallOutcome::Message(text)) => AgentResponse::success(agent, text),
        Err(e) => {
            warn!("{} agent gateway call failed: {}", agent, e);
            AgentResponse::failure(agent, e.to_string())
        }
    }
}

/// Serialize a formula result for the metrics field.
pub(crate) fn metrics_of<T: serde::Serialize>(result: &T) -> Value {
    serde_json::to_value(result).unwrap_or_default()
}

// ==================== Tool argument extraction ====================

pub(crate) fn arg_f64(args: &Value, name: &str) -> Result<f64, ValidationError> {
    args.get(name)
        .and_then(Value::as_f64)
        .ok_or_else(|| ValidationError::missing(name))
}

pub(crate) fn arg_f64_or(args: &Value, name: &str, default: f64) -> Result<f64, ValidationError> {
    match args.get(name) {
        None | Some(Value::Null) => Ok(default),
        Some(v) => v.as_f64().ok_or_else(|| ValidationError::missing(name)),
    }
}

pub(crate) fn arg_series(args: &Value, name: &str) -> Result<Vec<f64>, ValidationError> {
    let array = args
        .get(name)
        .and_then(Value::as_array)
        .ok_or_else(|| ValidationError::missing(name))?;
    array
        .iter()
        .map(|v| v.as_f64().ok_or_else(|| ValidationError::missing(name)))
        .collect()
}

/// Items arrive as `[{"id"|"name": ..., "value": ...}]`.
pub(crate) fn arg_items(args: &Value, name: &str) -> Result<Vec<ValueItem>, ValidationError> {
    let array = args
        .get(name)
        .and_then(Value::as_array)
        .ok_or_else(|| ValidationError::missing(name))?;

    array
        .iter()
        .map(|entry| {
            let id = entry
                .get("id")
                .or_else(|| entry.get("name"))
                .and_then(Value::as_str)
                .ok_or_else(|| ValidationError::missing("items[].id"))?;
            let value = entry
                .get("value")
                .and_then(Value::as_f64)
                .ok_or_else(|| ValidationError::missing("items[].value"))?;
            Ok(ValueItem::new(id, value))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_arg_f64() {
        let args = json!({"demand": 100.0});
        assert_eq!(arg_f64(&args, "demand").unwrap(), 100.0);
        assert_eq!(
            arg_f64(&args, "missing").unwrap_err().kind(),
            "missing_parameter"
        );
    }

    #[test]
    fn test_arg_f64_or_default() {
        let args = json!({});
        assert_eq!(arg_f64_or(&args, "opportunities", 1.0).unwrap(), 1.0);
        let args = json!({"opportunities": 3});
        assert_eq!(arg_f64_or(&args, "opportunities", 1.0).unwrap(), 3.0);
    }

    #[test]
    fn test_arg_series() {
        let args = json!({"data": [1.0, 2, 3.5]});
        assert_eq!(arg_series(&args, "data").unwrap(), vec![1.0, 2.0, 3.5]);
        assert!(arg_series(&json!({"data": "nope"}), "data").is_err());
        assert!(arg_series(&json!({"data": [1.0, "x"]}), "data").is_err());
    }

    #[test]
    fn test_arg_items_accepts_id_or_name() {
        let args = json!({"items": [{"id": "A", "value": 5.0}, {"name": "B", "value": 3.0}]});
        let items = arg_items(&args, "items").unwrap();
        assert_eq!(items[0].id, "A");
        assert_eq!(items[1].id, "B");
    }
}
