//! Ports: interfaces the application layer needs the outside world to
//! implement.

pub mod conversation_logger;
pub mod document_parser;
pub mod llm_gateway;
