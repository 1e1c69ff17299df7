//! Operations agent: workflow, throughput, takt time, lead time.

use crate::agents::shared::{arg_f64, arg_f64_or, llm_narrative, metrics_of, tool_assisted};
use crate::agents::DomainAgent;
use crate::ports::llm_gateway::{LlmGateway, ToolSchema};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;
use warebot_domain::formulas::operations::{lead_time_breakdown, takt_time};
use warebot_domain::{AgentName, AgentResponse, AgentSettings, Query, ValidationError};

pub struct OperationsAgent<G: LlmGateway> {
    gateway: Arc<G>,
    settings: AgentSettings,
}

impl<G: LlmGateway> OperationsAgent<G> {
    pub fn new(gateway: Arc<G>, settings: AgentSettings) -> Self {
        Self { gateway, settings }
    }

    pub fn tools() -> Vec<ToolSchema> {
        vec![
            ToolSchema::new(
                "calculate_takt_time",
                "Calculate takt time: available production minutes per unit of demand",
                json!({
                    "type": "object",
                    "properties": {
                        "available_minutes": {"type": "number"},
                        "demand_units": {"type": "number"}
                    },
                    "required": ["available_minutes", "demand_units"]
                }),
            ),
            ToolSchema::new(
                "lead_time_breakdown",
                "Break total lead time into processing, queue, and transport shares",
                json!({
                    "type": "object",
                    "properties": {
                        "processing_minutes": {"type": "number"},
                        "queue_minutes": {"type": "number", "default": 0},
                        "transport_minutes": {"type": "number", "default": 0}
                    },
                    "required": ["processing_minutes"]
                }),
            ),
        ]
    }

    pub fn execute_tool(name: &str, args: &Value) -> Result<(Value, String), ValidationError> {
        match name {
            "calculate_takt_time" => {
                let r = takt_time(
                    arg_f64(args, "available_minutes")?,
                    arg_f64(args, "demand_units")?,
                )?;
                let narrative = format!(
                    "Takt time is {:.2} minutes per unit ({:.0} minutes available for {:.0} \
                     units of demand).",
                    r.takt_minutes, r.available_minutes, r.demand_units
                );
                Ok((metrics_of(&r), narrative))
            }
            "lead_time_breakdown" => {
                let r = lead_time_breakdown(
                    arg_f64(args, "processing_minutes")?,
                    arg_f64_or(args, "queue_minutes", 0.0)?,
                    arg_f64_or(args, "transport_minutes", 0.0)?,
                )?;
                let narrative = format!(
                    "Total lead time is {:.1} minutes: {:.1}% processing, {:.1}% queue, \
                     {:.1}% transport.",
                    r.total_minutes, r.processing_pct, r.queue_pct, r.transport_pct
                );
                Ok((metrics_of(&r), narrative))
            }
            other => Err(ValidationError::MissingParameter(format!(
                "unknown tool '{}'",
                other
            ))),
        }
    }

    fn try_deterministic(query: &Query) -> Option<Result<(Value, String), ValidationError>> {
        if query.has_numbers(&["available_minutes", "demand_units"]) {
            let args = json!({
                "available_minutes": query.number("available_minutes"),
                "demand_units": query.number("demand_units"),
            });
            return Some(Self::execute_tool("calculate_takt_time", &args));
        }
        if query.has_numbers(&["processing_minutes"]) {
            let args = json!({
                "processing_minutes": query.number("processing_minutes"),
                "queue_minutes": query.number("queue_minutes").unwrap_or(0.0),
                "transport_minutes": query.number("transport_minutes").unwrap_or(0.0),
            });
            return Some(Self::execute_tool("lead_time_breakdown", &args));
        }
        None
    }
}

#[async_trait]
impl<G: LlmGateway> DomainAgent for OperationsAgent<G> {
    fn name(&self) -> AgentName {
        AgentName::Operations
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
