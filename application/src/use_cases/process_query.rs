//! Process query use case
//!
//! Routes a query to the specialist agents, fans out in parallel when more
//! than one is relevant, and synthesizes the answers.

use crate::agents::{
    DomainAgent, InventoryAgent, MathAgent, OperationsAgent, QualityAgent, SupervisorAgent,
};
use crate::ports::llm_gateway::LlmGateway;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};
use warebot_domain::{route, AgentName, AgentResponse, AgentRoster, PromptTemplate, Query};

/// What came out of one query.
#[derive(Debug, Clone)]
pub struct QueryOutcome {
    pub query: String,
    /// Agents the router selected, in dispatch order
    pub routed: Vec<AgentName>,
    /// One response per routed agent, same order, failures included
    pub responses: Vec<AgentResponse>,
    /// Final synthesized (or sole) answer
    pub answer: String,
    /// Whether the answer came from a synthesis call rather than a single
    /// agent or the concatenation fallback
    pub synthesized: bool,
}

/// Use case for answering one query through the agent team.
pub struct ProcessQueryUseCase<G: LlmGateway + 'static> {
    agents: BTreeMap<AgentName, Arc<dyn DomainAgent>>,
    supervisor: Arc<SupervisorAgent<G>>,
    multi_agent: bool,
    synthesis: bool,
}

impl<G: LlmGateway + 'static> ProcessQueryUseCase<G> {
    /// Build the full agent team from one shared gateway and the roster's
    /// per-agent settings.
    pub fn new(gateway: Arc<G>, roster: &AgentRoster) -> Self {
        let mut agents: BTreeMap<AgentName, Arc<dyn DomainAgent>> = BTreeMap::new();
        agents.insert(
            AgentName::Inventory,
            Arc::new(InventoryAgent::new(
                Arc::clone(&gateway),
                roster.get(AgentName::Inventory),
            )),
        );
        agents.insert(
            AgentName::Operations,
            Arc::new(OperationsAgent::new(
                Arc::clone(&gateway),
                roster.get(AgentName::Operations),
            )),
        );
        agents.insert(
            AgentName::Quality,
            Arc::new(QualityAgent::new(
                Arc::clone(&gateway),
                roster.get(AgentName::Quality),
            )),
        );
        agents.insert(
            AgentName::Math,
            Arc::new(MathAgent::new(
                Arc::clone(&gateway),
                roster.get(AgentName::Math),
            )),
        );

        let supervisor = Arc::new(SupervisorAgent::new(
            gateway,
            roster.get(AgentName::Supervisor),
        ));

        Self {
            agents,
            supervisor,
            multi_agent: roster.multi_agent,
            synthesis: roster.synthesis,
        }
    }

    /// Route, dispatch, and synthesize one query. `document_context` is a
    /// read-only snapshot taken by the caller before dispatch.
    pub async fn execute(&self, query: Query, document_context: Option<String>) -> QueryOutcome {
        let mut routed = route(query.text());
        if !self.multi_agent {
            routed.truncate(1);
        }
        info!(
            "Routing '{}' to {:?}",
            query.text(),
            routed.iter().map(|a| a.as_str()).collect::<Vec<_>>()
        );

        let responses = if routed.len() == 1 {
            vec![self.dispatch_one(routed[0], &query, &document_context).await]
        } else {
            self.fan_out(&routed, &query, &document_context).await
        };

        let (answer, synthesized) = self.resolve_answer(query.text(), &responses).await;

        QueryOutcome {
            query: query.text().to_string(),
            routed,
            responses,
            answer,
            synthesized,
        }
    }

    async fn dispatch_one(
        &self,
        name: AgentName,
        query: &Query,
        document_context: &Option<String>,
    ) -> AgentResponse {
        let agent = match name {
            AgentName::Supervisor => {
                return self
                    .supervisor
                    .process(query.clone(), document_context.clone())
                    .await;
            }
            other => &self.agents[&other],
        };
        agent.process(query.clone(), document_context.clone()).await
    }

    /// Query all routed agents in parallel, preserving routed order in the
    /// collected responses. A panicked task becomes a failed response, so
    /// every routed agent is accounted for.
    async fn fan_out(
        &self,
        routed: &[AgentName],
        query: &Query,
        document_context: &Option<String>,
    ) -> Vec<AgentResponse> {
        let mut join_set = JoinSet::new();

        for (index, name) in routed.iter().enumerate() {
            let agent = Arc::clone(&self.agents[name]);
            let query = query.clone();
            let context = document_context.clone();

            join_set.spawn(async move {
                let response = agent.process(query, context).await;
                (index, response)
            });
        }

        let mut collected: BTreeMap<usize, AgentResponse> = BTreeMap::new();
        while let Some(result) = join_set.join_next().await {
            match result {
                Ok((index, response)) => {
                    debug!(
                        "Agent {} finished (success: {})",
                        response.agent, response.success
                    );
                    collected.insert(index, response);
                }
                Err(e) => {
                    warn!("Agent task join error: {}", e);
                }
            }
        }

        routed
            .iter()
            .enumerate()
            .map(|(index, name)| {
                collected
                    .remove(&index)
                    .unwrap_or_else(|| AgentResponse::failure(*name, "agent task panicked"))
            })
            .collect()
    }

    /// Pick the final answer: a single response stands alone; multiple
    /// responses are synthesized by the supervisor, or concatenated when
    /// synthesis is disabled.
    async fn resolve_answer(
        &self,
        query_text: &str,
        responses: &[AgentResponse],
    ) -> (String, bool) {
        match responses {
            [only] => (only.narrative.clone(), false),
            many if self.synthesis => self.supervisor.synthesize(query_text, many).await,
            many => (PromptTemplate::concatenated(many), false),
        }
    }
}
