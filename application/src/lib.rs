//! Application layer for warebot
//!
//! This crate contains the domain agents, use cases, port definitions, and
//! the orchestrator facade. It depends only on the domain layer.

pub mod agents;
pub mod orchestrator;
pub mod ports;
pub mod use_cases;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types
pub use agents::{
    DomainAgent, InventoryAgent, MathAgent, OperationsAgent, QualityAgent, SupervisorAgent,
};
pub use orchestrator::Orchestrator;
pub use ports::{
    conversation_logger::{ConversationEvent, ConversationLogger, NoopConversationLogger},
    document_parser::{DocumentParser, ParsedDocument, ParserError},
    llm_gateway::{
        FunctionCallOutcome, GatewayError, GenerateRequest, LlmGateway, ToolSchema,
    },
};
pub use use_cases::process_documents::{IngestReport, ProcessDocumentsUseCase};
pub use use_cases::process_query::{ProcessQueryUseCase, QueryOutcome};
