//! Domain layer for warebot
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Formula Library
//!
//! Deterministic warehouse formulas (EOQ, reorder point, ABC/Pareto,
//! Cp/Cpk, DPMO, process variation). Pure functions, no external calls.
//!
//! ## Routing
//!
//! A query is scored against each agent's capability keywords; the winner
//! handles it alone, multi-domain queries fan out, and everything else
//! falls back to the supervisor. Routing is a pure function and always
//! deterministic for identical input.
//!
//! ## Document Context
//!
//! Parsed documents live in a FIFO store under a hard character budget;
//! agents see a combined snapshot, never the store itself.

pub mod agent;
pub mod context;
pub mod core;
pub mod formulas;
pub mod prompt;
pub mod routing;

// Re-export commonly used types
pub use agent::{
    name::AgentName,
    response::{AgentResponse, ConversationTurn, Role},
    settings::{AgentRoster, AgentSettings},
};
pub use context::{
    budget::ContextBudget,
    store::{AddOutcome, DocumentRecord, DocumentStore, SearchMatch, StoreStatistics},
};
pub use crate::core::{
    error::{ContextError, ValidationError},
    query::{ParamValue, Params, Query, ValueItem},
};
pub use prompt::PromptTemplate;
pub use routing::{route, score};
