//! Math agent: arithmetic evaluation and general numeric analysis.

use crate::agents::shared::{arg_series, llm_narrative, metrics_of, tool_assisted};
use crate::agents::DomainAgent;
use crate::ports::llm_gateway::{LlmGateway, ToolSchema};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;
use warebot_domain::formulas::expr::{evaluate, extract_arithmetic};
use warebot_domain::formulas::quality::process_variation;
use warebot_domain::{AgentName, AgentResponse, AgentSettings, Query, ValidationError};

pub struct MathAgent<G: LlmGateway> {
    gateway: Arc<G>,
    settings: AgentSettings,
}

impl<G: LlmGateway> MathAgent<G> {
    pub fn new(gateway: Arc<G>, settings: AgentSettings) -> Self {
        Self { gateway, settings }
    }

    pub fn tools() -> Vec<ToolSchema> {
        vec![
            ToolSchema::new(
                "evaluate_expression",
                "Evaluate an arithmetic expression (+ - * / ^ with parentheses)",
                json!({
                    "type": "object",
                    "properties": {
                        "expression": {"type": "string"}
                    },
                    "required": ["expression"]
                }),
            ),
            ToolSchema::new(
                "descriptive_statistics",
                "Mean, median, spread, and control limits for a numeric series",
                json!({
                    "type": "object",
                    "properties": {
                        "data": {"type": "array", "items": {"type": "number"}}
                    },
                    "required": ["data"]
                }),
            ),
        ]
    }

    pub fn execute_tool(name: &str, args: &Value) -> Result<(Value, String), ValidationError> {
        match name {
            "evaluate_expression" => {
                let expression = args
                    .get("expression")
                    .and_then(Value::as_str)
                    .ok_or_else(|| ValidationError::missing("expression"))?;
                let r = evaluate(expression)?;
                let narrative = format!("{} = {}", r.expression, r.result);
                Ok((metrics_of(&r), narrative))
            }
            "descriptive_statistics" => {
                let r = process_variation(&arg_series(args, "data")?)?;
                let narrative = format!(
                    "{} values: mean {:.3}, median {:.3}, std dev {:.3}, range {:.3}.",
                    r.sample_size, r.mean, r.median, r.std_dev, r.range
                );
                Ok((metrics_of(&r), narrative))
            }
            other => Err(ValidationError::MissingParameter(format!(
                "unknown tool '{}'",
                other
            ))),
        }
    }

    /// Deterministic path: an explicit expression param, a numeric series,
    /// or an arithmetic skeleton pulled from the query text itself.
    fn try_deterministic(query: &Query) -> Option<Result<(Value, String), ValidationError>> {
        if let Some(expression) = query.param_text("expression") {
            return Some(Self::execute_tool(
                "evaluate_expression",
                &json!({"expression": expression}),
            ));
        }
        if let Some(data) = query.series("data") {
            return Some(Self::execute_tool(
                "descriptive_statistics",
                &json!({"data": data}),
            ));
        }
        if let Some(expression) = extract_arithmetic(query.text()) {
            // Only commit when the skeleton actually parses; otherwise let
            // the gateway interpret the question.
            return match evaluate(&expression) {
                Ok(r) => {
                    let narrative = format!("{} = {}", r.expression, r.result);
                    Some(Ok((metrics_of(&r), narrative)))
                }
                Err(_) => None,
            };
        }
        None
    }
}

#[async_trait]
impl<G: LlmGateway> DomainAgent for MathAgent<G> {
    fn name(&self) -> AgentName {
        AgentName::Math
    }

    async fn process(&self, query: Query, document_context: Option<String>) -> AgentResponse {
        if let Some(result) = Self::try_deterministic(&query) {
            return match result {
                Ok((metrics, narrative)) => {
                    AgentResponse::with_metrics(self.name(), narrative, metrics)
                }
                Err(e) => AgentResponse::failure(self.name(), e.to_string()),
            };
        }

        if self.settings.function_calling {
            tool_assisted(
                self.gateway.as_ref(),
                &self.settings,
                self.name(),
                &query,
                document_context.as_deref(),
                &Self::tools(),
                Self::execute_tool,
            )
            .await
        } else {
            llm_narrative(
                self.gateway.as_ref(),
                &self.settings,
                self.name(),
                &query,
                document_context.as_deref(),
            )
            .await
        }
    }
}
