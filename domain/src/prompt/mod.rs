//! Prompt templates for the agents and the supervisor synthesis step.

use crate::agent::name::AgentName;
use crate::agent::response::AgentResponse;

/// Templates for generating agent prompts
pub struct PromptTemplate;

impl PromptTemplate {
    /// System prompt for a given agent.
    pub fn system(agent: AgentName) -> &'static str {
        match agent {
            AgentName::Supervisor => {
                r#"You are a warehouse management supervisor coordinating a team of
specialist agents. Provide clear, actionable guidance on warehouse efficiency,
resource allocation, safety, and team coordination. When given other agents'
answers, integrate them into one coherent response."#
            }
            AgentName::Inventory => {
                r#"You are an inventory management expert. Answer questions about stock
levels, reorder points, safety stock, order quantities, and ABC
classification. Be specific and actionable; show the numbers behind your
recommendations."#
            }
            AgentName::Operations => {
                r#"You are a warehouse operations expert. Answer questions about workflow
optimization, picking and packing, layout, labor allocation, equipment
utilization, and throughput. Provide concrete process recommendations."#
            }
            AgentName::Quality => {
                r#"You are a quality and process improvement expert specializing in Lean
Six Sigma. Use DMAIC thinking, Pareto analysis, process capability (Cp/Cpk),
and DPMO metrics. Back every recommendation with the statistics."#
            }
            AgentName::Math => {
                r#"You are a warehouse math analysis agent. Solve calculations,
optimizations, and statistical questions step by step, stating each
intermediate result."#
            }
        }
    }

    /// User prompt for a plain (no function calling) agent query, with
    /// optional document context prepended.
    pub fn agent_query(query_text: &str, document_context: Option<&str>) -> String {
        match document_context {
            Some(context) if !context.is_empty() => format!(
                r#"Relevant warehouse documents:

{}

Question: {}"#,
                context, query_text
            ),
            _ => query_text.to_string(),
        }
    }

    /// User prompt asking the supervisor to synthesize fan-out results.
    /// Failed agents are listed explicitly so the synthesis acknowledges
    /// them rather than papering over the gap.
    pub fn synthesis(query_text: &str, responses: &[AgentResponse]) -> String {
        let mut prompt = format!(
            r#"Original question: {}

Specialist agent answers:
"#,
            query_text
        );

        for response in responses {
            if response.is_success() {
                prompt.push_str(&format!(
                    "\n--- {} ---\n{}\n",
                    response.agent, response.narrative
                ));
            } else {
                prompt.push_str(&format!(
                    "\n--- {} (FAILED) ---\n{}\n",
                    response.agent,
                    response.error.as_deref().unwrap_or("unknown error")
                ));
            }
        }

        prompt.push_str(
            r#"
Synthesize these into one clear answer that:
1. Addresses the original question directly
2. Integrates each successful agent's findings
3. Notes explicitly which agents failed and why
4. Ends with actionable recommendations"#,
        );

        prompt
    }

    /// Deterministic fallback when no gateway is available for synthesis:
    /// concatenate narratives under agent headers.
    pub fn concatenated(responses: &[AgentResponse]) -> String {
        responses
            .iter()
            .map(|r| format!("[{}]\n{}", r.agent, r.narrative))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}
