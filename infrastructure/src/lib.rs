//! Infrastructure layer for warebot
//!
//! External adapters: the OpenAI-compatible HTTP gateway, the plain-text
//! document parser, TOML configuration loading, and the JSONL conversation
//! logger. Everything here implements a port from the application layer.

pub mod config;
pub mod llm;
pub mod logging;
pub mod parser;

pub use config::{ConfigIssue, ConfigLoader, FileConfig, Severity};
pub use llm::OpenAiGateway;
pub use logging::JsonlConversationLogger;
pub use parser::TextDocumentParser;
