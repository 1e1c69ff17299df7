//! Inventory agent: stock levels, reorder points, order quantities, ABC.

use crate::agents::shared::{
    arg_f64, arg_f64_or, arg_items, llm_narrative, metrics_of, tool_assisted,
};
use crate::agents::DomainAgent;
use crate::ports::llm_gateway::{LlmGateway, ToolSchema};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;
use warebot_domain::formulas::inventory::{
    abc_classification, eoq, reorder_point, safety_stock,
};
use warebot_domain::{AgentName, AgentResponse, AgentSettings, Query, ValidationError};

pub struct InventoryAgent<G: LlmGateway> {
    gateway: Arc<G>,
    settings: AgentSettings,
}

impl<G: LlmGateway> InventoryAgent<G> {
    pub fn new(gateway: Arc<G>, settings: AgentSettings) -> Self {
        Self { gateway, settings }
    }

    /// Formula schemas offered to the model on the tool path.
    pub fn tools() -> Vec<ToolSchema> {
        vec![
            ToolSchema::new(
                "calculate_eoq",
                "Calculate the Economic Order Quantity minimizing total inventory cost",
                json!({
                    "type": "object",
                    "properties": {
                        "annual_demand": {"type": "number", "description": "Annual demand in units"},
                        "order_cost": {"type": "number", "description": "Cost per order"},
                        "holding_cost": {"type": "number", "description": "Holding cost per unit per year"}
                    },
                    "required": ["annual_demand", "order_cost", "holding_cost"]
                }),
            ),
            ToolSchema::new(
                "calculate_reorder_point",
                "Calculate the inventory level that should trigger a new order",
                json!({
                    "type": "object",
                    "properties": {
                        "daily_demand": {"type": "number"},
                        "lead_time_days": {"type": "number"},
                        "safety_stock": {"type": "number", "default": 0}
                    },
                    "required": ["daily_demand", "lead_time_days"]
                }),
            ),
            ToolSchema::new(
                "calculate_safety_stock",
                "Calculate safety stock for a service level (z-score) and demand variability",
                json!({
                    "type": "object",
                    "properties": {
                        "daily_demand": {"type": "number"},
                        "lead_time_days": {"type": "number"},
                        "service_z": {"type": "number", "default": 1.96},
                        "demand_cv": {"type": "number", "default": 0.2}
                    },
                    "required": ["daily_demand", "lead_time_days"]
                }),
            ),
            ToolSchema::new(
                "abc_classification",
                "Classify inventory items into A/B/C categories by value contribution",
                json!({
                    "type": "object",
                    "properties": {
                        "items": {
                            "type": "array",
                            "items": {
                                "type": "object",
                                "properties": {
                                    "id": {"type": "string"},
                                    "value": {"type": "number"}
                                },
                                "required": ["id", "value"]
                            }
                        }
                    },
                    "required": ["items"]
                }),
            ),
        ]
    }

    /// Execute a tool call against the formula library.
    pub fn execute_tool(name: &str, args: &Value) -> Result<(Value, String), ValidationError> {
        match name {
            "calculate_eoq" => {
                let r = eoq(
                    arg_f64(args, "annual_demand")?,
                    arg_f64(args, "order_cost")?,
                    arg_f64(args, "holding_cost")?,
                )?;
                let narrative = format!(
                    "Optimal order quantity is {:.1} units, placing about {:.1} orders per year \
                     with an average cycle stock of {:.1} units.",
                    r.eoq, r.orders_per_year, r.average_cycle_stock
                );
                Ok((metrics_of(&r), narrative))
            }
            "calculate_reorder_point" => {
                let r = reorder_point(
                    arg_f64(args, "daily_demand")?,
                    arg_f64(args, "lead_time_days")?,
                    arg_f64_or(args, "safety_stock", 0.0)?,
                )?;
                let narrative = format!(
                    "Reorder when inventory reaches {:.1} units ({:.1} units of lead-time demand \
                     plus {:.1} units of safety stock).",
                    r.reorder_point, r.lead_time_demand, r.safety_stock
                );
                Ok((metrics_of(&r), narrative))
            }
            "calculate_safety_stock" => {
                let r = safety_stock(
                    arg_f64(args, "daily_demand")?,
                    arg_f64(args, "lead_time_days")?,
                    arg_f64_or(args, "service_z", 1.96)?,
                    arg_f64_or(args, "demand_cv", 0.2)?,
                )?;
                let narrative = format!(
                    "Hold {:.1} units of safety stock (z = {:.2}, estimated demand deviation \
                     {:.1} units/day).",
                    r.safety_stock, r.service_z, r.demand_std
                );
                Ok((metrics_of(&r), narrative))
            }
            "abc_classification" => {
                let r = abc_classification(&arg_items(args, "items")?)?;
                let narrative = format!(
                    "Classified {} items: {} A items carry {:.1}% of value, {} B items {:.1}%, \
                     {} C items {:.1}%.",
                    r.classification.len(),
                    r.a.count,
                    r.a.value_contribution_pct,
                    r.b.count,
                    r.b.value_contribution_pct,
                    r.c.count,
                    r.c.value_contribution_pct
                );
                Ok((metrics_of(&r), narrative))
            }
            other => Err(ValidationError::MissingParameter(format!(
                "unknown tool '{}'",
                other
            ))),
        }
    }

    /// Deterministic path: structured params that fully satisfy a formula.
    fn try_deterministic(query: &Query) -> Option<Result<(Value, String), ValidationError>> {
        if query.has_numbers(&["annual_demand", "order_cost", "holding_cost"]) {
            let args = json!({
                "annual_demand": query.number("annual_demand"),
                "order_cost": query.number("order_cost"),
                "holding_cost": query.number("holding_cost"),
            });
            return Some(Self::execute_tool("calculate_eoq", &args));
        }
        if query.has_numbers(&["daily_demand", "lead_time_days"]) {
            let args = json!({
                "daily_demand": query.number("daily_demand"),
                "lead_time_days": query.number("lead_time_days"),
                "safety_stock": query.number("safety_stock").unwrap_or(0.0),
            });
            return Some(Self::execute_tool("calculate_reorder_point", &args));
        }
        if let Some(items) = query.items("items") {
            let args = json!({
                "items": items
                    .iter()
                    .map(|i| json!({"id": i.id, "value": i.value}))
                    .collect::<Vec<_>>()
            });
            return Some(Self::execute_tool("abc_classification", &args));
        }
        None
    }
}

#[async_trait]
impl<G: LlmGateway> DomainAgent for InventoryAgent<G> {
    fn name(&self) -> AgentName {
        AgentName::Inventory
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
