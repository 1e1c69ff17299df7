//! Supervisor agent: fallback answerer for unrouted queries and synthesizer
//! for multi-agent fan-out results.

use crate::agents::shared::llm_narrative;
use crate::agents::DomainAgent;
use crate::ports::llm_gateway::{GenerateRequest, LlmGateway};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::warn;
use warebot_domain::{AgentName, AgentResponse, AgentSettings, PromptTemplate, Query};

pub struct SupervisorAgent<G: LlmGateway> {
    gateway: Arc<G>,
    settings: AgentSettings,
}

impl<G: LlmGateway> SupervisorAgent<G> {
    pub fn new(gateway: Arc<G>, settings: AgentSettings) -> Self {
        Self { gateway, settings }
    }

    /// Combine fan-out responses into one answer. Asks the gateway to
    /// integrate them; if that call fails, falls back to a deterministic
    /// concatenation so partial results are never lost. Returns the answer
    /// and whether the gateway produced it.
    pub async fn synthesize(&self, query_text: &str, responses: &[AgentResponse]) -> (String, bool) {
        let request = GenerateRequest::new(
            &self.settings.model,
            self.settings.temperature,
            PromptTemplate::system(AgentName::Supervisor),
            PromptTemplate::synthesis(query_text, responses),
        );

        match self.gateway.generate(request).await {
            Ok(answer) => (answer, true),
            Err(e) => {
                warn!("synthesis gateway call failed, concatenating instead: {}", e);
                (PromptTemplate::concatenated(responses), false)
            }
        }
    }
}

#[async_trait]
impl<G: LlmGateway> DomainAgent for SupervisorAgent<G> {
    fn name(&self) -> AgentName {
        AgentName::Supervisor
    }

    async fn process(&self, query: Query, document_context: Option<String>) -> AgentResponse {
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
