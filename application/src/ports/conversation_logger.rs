//! Conversation logger port
//!
//! Fire-and-forget sink for conversation events. Logging must never fail a
//! query, so the trait returns nothing; adapters swallow their own errors.

use serde_json::Value;

/// A single loggable event with a type tag and free-form payload.
#[derive(Debug, Clone)]
pub struct ConversationEvent {
    pub event_type: String,
    pub payload: Value,
}

impl ConversationEvent {
    pub fn new(event_type: impl Into<String>, payload: Value) -> Self {
        Self {
            event_type: event_type.into(),
            payload,
        }
    }
}

/// Sink for conversation events.
pub trait ConversationLogger: Send + Sync {
    fn log(&self, event: ConversationEvent);
}

/// Logger that drops everything. Default when no log path is configured.
pub struct NoopConversationLogger;

impl ConversationLogger for NoopConversationLogger {
    fn log(&self, _event: ConversationEvent) {}
}
