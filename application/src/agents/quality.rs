//! Quality agent: Lean Six Sigma analysis over the quality formula set.

use crate::agents::shared::{
    arg_f64, arg_f64_or, arg_items, arg_series, llm_narrative, metrics_of, tool_assisted,
};
use crate::agents::DomainAgent;
use crate::ports::llm_gateway::{LlmGateway, ToolSchema};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;
use warebot_domain::formulas::quality::{
    dpmo, pareto_analysis, process_capability, process_variation, sigma_level_from_yield,
};
use warebot_domain::{AgentName, AgentResponse, AgentSettings, Query, ValidationError};

pub struct QualityAgent<G: LlmGateway> {
    gateway: Arc<G>,
    settings: AgentSettings,
}

impl<G: LlmGateway> QualityAgent<G> {
    pub fn new(gateway: Arc<G>, settings: AgentSettings) -> Self {
        Self { gateway, settings }
    }

    pub fn tools() -> Vec<ToolSchema> {
        vec![
            ToolSchema::new(
                "pareto_analysis",
                "Rank defect categories by value and identify the vital few (80/20)",
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
            ToolSchema::new(
                "process_capability",
                "Calculate Cp and Cpk for measured data against specification limits",
                json!({
                    "type": "object",
                    "properties": {
                        "data": {"type": "array", "items": {"type": "number"}},
                        "usl": {"type": "number", "description": "Upper specification limit"},
                        "lsl": {"type": "number", "description": "Lower specification limit"}
                    },
                    "required": ["data", "usl", "lsl"]
                }),
            ),
            ToolSchema::new(
                "calculate_dpmo",
                "Defects per million opportunities and the corresponding sigma level",
                json!({
                    "type": "object",
                    "properties": {
                        "defects": {"type": "number"},
                        "units": {"type": "number"},
                        "opportunities_per_unit": {"type": "number", "default": 1}
                    },
                    "required": ["defects", "units"]
                }),
            ),
            ToolSchema::new(
                "sigma_from_yield",
                "Convert a process yield percentage to a sigma level",
                json!({
                    "type": "object",
                    "properties": {
                        "yield_pct": {"type": "number", "minimum": 0, "maximum": 100}
                    },
                    "required": ["yield_pct"]
                }),
            ),
            ToolSchema::new(
                "process_variation",
                "Descriptive statistics, control limits, and stability for measured data",
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
            "pareto_analysis" => {
                let r = pareto_analysis(&arg_items(args, "items")?)?;
                let narrative = format!(
                    "{} of {} categories are the vital few, contributing {:.1}% of the total. \
                     Focus improvement there first.",
                    r.vital_few_count,
                    r.entries.len(),
                    r.vital_few_contribution_pct
                );
                Ok((metrics_of(&r), narrative))
            }
            "process_capability" => {
                let r = process_capability(
                    &arg_series(args, "data")?,
                    arg_f64(args, "usl")?,
                    arg_f64(args, "lsl")?,
                )?;
                let narrative = format!(
                    "Cp = {:.2}, Cpk = {:.2} ({:?} process). Mean {:.2}, std dev {:.3}, \
                     roughly {:.1} sigma short-term ({:.0} DPMO).",
                    r.cp, r.cpk, r.band, r.mean, r.std_dev, r.sigma_level, r.estimated_dpmo
                );
                Ok((metrics_of(&r), narrative))
            }
            "calculate_dpmo" => {
                let r = dpmo(
                    arg_f64(args, "defects")?,
                    arg_f64(args, "units")?,
                    arg_f64_or(args, "opportunities_per_unit", 1.0)?,
                )?;
                let narrative = format!(
                    "DPMO is {:.0}, about {:.2} sigma with a {:.2}% yield.",
                    r.dpmo, r.sigma_level, r.yield_pct
                );
                Ok((metrics_of(&r), narrative))
            }
            "sigma_from_yield" => {
                let r = sigma_level_from_yield(arg_f64(args, "yield_pct")?)?;
                let narrative = format!(
                    "A {:.2}% yield corresponds to {:.0} DPMO, about {:.2} sigma.",
                    r.yield_pct, r.dpmo, r.sigma_level
                );
                Ok((metrics_of(&r), narrative))
            }
            "process_variation" => {
                let r = process_variation(&arg_series(args, "data")?)?;
                let narrative = format!(
                    "Over {} points: mean {:.2}, std dev {:.3}, CV {:.1}%. Control limits \
                     [{:.2}, {:.2}] with {} outlier(s); process looks {:?}.",
                    r.sample_size,
                    r.mean,
                    r.std_dev,
                    r.cv_pct,
                    r.lcl,
                    r.ucl,
                    r.outliers.len(),
                    r.stability
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
        if let Some(data) = query.series("data") {
            if query.has_numbers(&["usl", "lsl"]) {
                let args = json!({
                    "data": data,
                    "usl": query.number("usl"),
                    "lsl": query.number("lsl"),
                });
                return Some(Self::execute_tool("process_capability", &args));
            }
            return Some(Self::execute_tool("process_variation", &json!({"data": data})));
        }
        if query.has_numbers(&["defects", "units"]) {
            let args = json!({
                "defects": query.number("defects"),
                "units": query.number("units"),
                "opportunities_per_unit": query.number("opportunities_per_unit").unwrap_or(1.0),
            });
            return Some(Self::execute_tool("calculate_dpmo", &args));
        }
        if query.has_numbers(&["yield_pct"]) {
            let args = json!({"yield_pct": query.number("yield_pct")});
            return Some(Self::execute_tool("sigma_from_yield", &args));
        }
        if let Some(items) = query.items("items") {
            let args = json!({
                "items": items
                    .iter()
                    .map(|i| json!({"id": i.id, "value": i.value}))
                    .collect::<Vec<_>>()
            });
            return Some(Self::execute_tool("pareto_analysis", &args));
        }
        None
    }
}

#[async_trait]
impl<G: LlmGateway> DomainAgent for QualityAgent<G> {
    fn name(&self) -> AgentName {
        AgentName::Quality
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

#[cfg(test)]
mod tests {
    use super::*;
    use warebot_domain::ParamValue;

    type Agent = QualityAgent<crate::testing::StubGateway>;

    #[test]
    fn test_dpmo_tool_defaults_opportunities() {
        let args = json!({"defects": 15, "units": 1000, "opportunities_per_unit": 3});
        let (metrics, _) = Agent::execute_tool("calculate_dpmo", &args).unwrap();
        assert_eq!(metrics["dpmo"].as_f64().unwrap(), 5000.0);

        let args = json!({"defects": 5, "units": 1000});
        let (metrics, _) = Agent::execute_tool("calculate_dpmo", &args).unwrap();
        assert_eq!(metrics["dpmo"].as_f64().unwrap(), 5000.0);
    }

    #[test]
    fn test_capability_insufficient_data() {
        let args = json!({"data": [10.0], "usl": 12.0, "lsl": 8.0});
        let err = Agent::execute_tool("process_capability", &args).unwrap_err();
        assert_eq!(err.kind(), "insufficient_data");
    }

    #[tokio::test]
    async fn test_deterministic_capability_path() {
        let gateway = Arc::new(crate::testing::StubGateway::default());
        let agent = QualityAgent::new(gateway, AgentSettings::default_for(AgentName::Quality));
        let query = Query::new("is the process capable?")
            .with_param(
                "data",
                ParamValue::Series(vec![10.1, 9.9, 10.0, 10.2, 9.8]),
            )
            .with_param("usl", ParamValue::Number(10.5))
            .with_param("lsl", ParamValue::Number(9.5));

        let response = agent.process(query, None).await;
        assert!(response.is_success());
        let cpk = response.metrics["cpk"].as_f64().unwrap();
        assert!(cpk.is_finite() && cpk > 0.0);
    }

    #[tokio::test]
    async fn test_data_alone_runs_variation() {
        let gateway = Arc::new(crate::testing::StubGateway::default());
        let agent = QualityAgent::new(gateway, AgentSettings::default_for(AgentName::Quality));
        let query = Query::new("how variable is picking time?")
            .with_param("data", ParamValue::Series(vec![4.0, 5.0, 6.0, 5.0, 4.5]));

        let response = agent.process(query, None).await;
        assert!(response.is_success());
        assert_eq!(response.metrics["sample_size"].as_u64().unwrap(), 5);
    }
}
