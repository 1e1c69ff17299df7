//! Domain agents.
//!
//! Each agent resolves a query in a fixed order:
//!
//! 1. **Deterministic path**: structured params that satisfy one of the
//!    agent's formulas are computed directly - no external call, and the
//!    numeric result is embedded verbatim in the response.
//! 2. **Tool path**: with function calling enabled, the gateway is offered
//!    the agent's formula schemas; a returned call is executed against the
//!    formula library.
//! 3. **Plain path**: otherwise the gateway generates a narrative answer
//!    with the agent's system prompt and any document context.
//!
//! Every failure - validation or external - is folded into a failed
//! [`AgentResponse`]; agents never propagate errors to the dispatcher.

mod shared;

pub mod inventory;
pub mod math;
pub mod operations;
pub mod quality;
pub mod supervisor;

pub use inventory::InventoryAgent;
pub use math::MathAgent;
pub use operations::OperationsAgent;
pub use quality::QualityAgent;
pub use supervisor::SupervisorAgent;

use async_trait::async_trait;
use warebot_domain::{AgentName, AgentResponse, Query};

/// A specialist agent that can answer warehouse queries.
#[async_trait]
pub trait DomainAgent: Send + Sync {
    fn name(&self) -> AgentName;

    /// Answer a query. `document_context` is a read-only snapshot of the
    /// combined document store taken by the orchestrator before dispatch.
    async fn process(&self, query: Query, document_context: Option<String>) -> AgentResponse;
}
