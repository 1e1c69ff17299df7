//! Agent response and conversation value objects.
//!
//! - [`AgentResponse`] - one agent's answer to a query, produced once and
//!   never mutated afterwards
//! - [`ConversationTurn`] - one entry in the orchestrator's append-only
//!   conversation log

use crate::agent::name::AgentName;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Response from a single agent invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentResponse {
    /// The agent that produced this response
    pub agent: AgentName,
    /// Human-readable answer text
    pub narrative: String,
    /// Structured computed metrics, embedded verbatim from the formula
    /// library regardless of narrative wrapping
    #[serde(skip_serializing_if = "serde_json::Value::is_null", default)]
    pub metrics: serde_json::Value,
    /// Whether this invocation succeeded
    pub success: bool,
    /// Error detail if failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AgentResponse {
    /// Create a successful response with narrative only.
    pub fn success(agent: AgentName, narrative: impl Into<String>) -> Self {
        Self {
            agent,
            narrative: narrative.into(),
            metrics: serde_json::Value::Null,
            success: true,
            error: None,
        }
    }

    /// Create a successful response carrying structured metrics.
    pub fn with_metrics(
        agent: AgentName,
        narrative: impl Into<String>,
        metrics: serde_json::Value,
    ) -> Self {
        Self {
            agent,
            narrative: narrative.into(),
            metrics,
            success: true,
            error: None,
        }
    }

    /// Create a failed response. The narrative restates the error so a
    /// synthesized answer can mention the failure inline.
    pub fn failure(agent: AgentName, error: impl Into<String>) -> Self {
        let error = error.into();
        Self {
            agent,
            narrative: format!("{} agent could not answer: {}", agent, error),
            metrics: serde_json::Value::Null,
            success: false,
            error: Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn has_metrics(&self) -> bool {
        !self.metrics.is_null()
    }
}

/// Speaker role for a conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One entry in the append-only conversation log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl ConversationTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }

    /// Clamp this turn's timestamp so the log stays monotonic even if the
    /// wall clock steps backwards between turns.
    pub fn not_before(mut self, floor: DateTime<Utc>) -> Self {
        if self.timestamp < floor {
            self.timestamp = floor;
        }
        self
    }
}
