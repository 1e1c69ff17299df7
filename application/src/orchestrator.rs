//! Orchestrator facade
//!
//! Owns the agent team, the document store, and the conversation log, and
//! exposes the operations the outer layers call: answer a query, ingest
//! documents, search, inspect, reset.

use crate::ports::conversation_logger::{ConversationEvent, ConversationLogger, NoopConversationLogger};
use crate::ports::document_parser::DocumentParser;
use crate::ports::llm_gateway::LlmGateway;
use crate::use_cases::process_documents::{IngestReport, ProcessDocumentsUseCase};
use crate::use_cases::process_query::{ProcessQueryUseCase, QueryOutcome};
use serde_json::json;
use std::path::Path;
use std::sync::Arc;
use tracing::info;
use warebot_domain::{
    AgentRoster, ContextBudget, ConversationTurn, DocumentStore, Query, SearchMatch,
    StoreStatistics,
};

pub struct Orchestrator<G: LlmGateway + 'static, P: DocumentParser + 'static> {
    query_use_case: ProcessQueryUseCase<G>,
    ingest_use_case: ProcessDocumentsUseCase<P>,
    store: DocumentStore,
    history: Vec<ConversationTurn>,
    logger: Arc<dyn ConversationLogger>,
}

impl<G: LlmGateway + 'static, P: DocumentParser + 'static> Orchestrator<G, P> {
    pub fn new(
        gateway: Arc<G>,
        parser: Arc<P>,
        roster: AgentRoster,
        budget: ContextBudget,
    ) -> Self {
        Self {
            query_use_case: ProcessQueryUseCase::new(gateway, &roster),
            ingest_use_case: ProcessDocumentsUseCase::new(parser),
            store: DocumentStore::new(budget),
            history: Vec::new(),
            logger: Arc::new(NoopConversationLogger),
        }
    }

    pub fn with_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Answer one query: route, dispatch, synthesize, and append the
    /// exchange to the conversation log.
    pub async fn process_query(&mut self, query: Query) -> QueryOutcome {
        let document_context = if self.store.is_empty() {
            None
        } else {
            Some(
                self.store
                    .combined_context(self.store.budget().max_total_chars()),
            )
        };

        let outcome = self.query_use_case.execute(query, document_context).await;

        self.append_turn(ConversationTurn::user(&outcome.query));
        self.append_turn(ConversationTurn::assistant(&outcome.answer));

        self.logger.log(ConversationEvent::new(
            "query",
            json!({
                "query": outcome.query,
                "routed": outcome.routed.iter().map(|a| a.as_str()).collect::<Vec<_>>(),
                "synthesized": outcome.synthesized,
                "failures": outcome.responses.iter().filter(|r| !r.success).count(),
                "answer": outcome.answer,
            }),
        ));

        outcome
    }

    /// Load documents into the context store, one report per path.
    pub async fn process_documents(&mut self, paths: &[impl AsRef<Path>]) -> Vec<IngestReport> {
        let reports = self.ingest_use_case.execute(&mut self.store, paths).await;

        for report in &reports {
            self.logger.log(ConversationEvent::new(
                "document_ingest",
                json!({
                    "source": report.source,
                    "success": report.success,
                    "error": report.error,
                }),
            ));
        }

        reports
    }

    pub fn search_documents(&self, query: &str) -> Vec<SearchMatch> {
        self.store.search(query)
    }

    pub fn statistics(&self) -> StoreStatistics {
        self.store.statistics()
    }

    pub fn clear_documents(&mut self) {
        self.store.clear();
    }

    pub fn history(&self) -> &[ConversationTurn] {
        &self.history
    }

    /// Drop all conversation and document state. Safe to call repeatedly;
    /// the agent team and its settings are untouched.
    pub fn reset(&mut self) {
        info!("Resetting orchestrator state");
        self.history.clear();
        self.store.clear();
        self.logger
            .log(ConversationEvent::new("reset", json!({})));
    }

    /// Append with the timestamp clamped so the log stays monotonic.
    fn append_turn(&mut self, turn: ConversationTurn) {
        let turn = match self.history.last() {
            Some(previous) => turn.not_before(previous.timestamp),
            None => turn,
        };
        self.history.push(turn);
    }
}
