//! Agent name value object

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The fixed set of domain agents (Value Object)
///
/// Ordering matters: `precedence()` breaks routing ties so that identical
/// queries always produce identical agent lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentName {
    Supervisor,
    Inventory,
    Operations,
    Quality,
    Math,
}

impl AgentName {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentName::Supervisor => "supervisor",
            AgentName::Inventory => "inventory",
            AgentName::Operations => "operations",
            AgentName::Quality => "quality",
            AgentName::Math => "math",
        }
    }

    /// All agents, in precedence order.
    pub fn all() -> [AgentName; 5] {
        [
            AgentName::Supervisor,
            AgentName::Inventory,
            AgentName::Operations,
            AgentName::Quality,
            AgentName::Math,
        ]
    }

    /// The agents a query can be routed to. The supervisor is excluded:
    /// it synthesizes and serves as the fallback, it is not a routing target.
    pub fn routable() -> [AgentName; 4] {
        [
            AgentName::Inventory,
            AgentName::Operations,
            AgentName::Quality,
            AgentName::Math,
        ]
    }

    /// Fixed tie-break precedence: lower is stronger.
    /// Supervisor > Inventory > Operations > Quality > Math.
    pub fn precedence(&self) -> u8 {
        match self {
            AgentName::Supervisor => 0,
            AgentName::Inventory => 1,
            AgentName::Operations => 2,
            AgentName::Quality => 3,
            AgentName::Math => 4,
        }
    }
}

impl std::fmt::Display for AgentName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AgentName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "supervisor" => Ok(AgentName::Supervisor),
            "inventory" => Ok(AgentName::Inventory),
            "operations" | "ops" => Ok(AgentName::Operations),
            "quality" => Ok(AgentName::Quality),
            "math" => Ok(AgentName::Math),
            other => Err(format!("Unknown agent: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        for name in AgentName::all() {
            assert_eq!(name.as_str().parse::<AgentName>().unwrap(), name);
        }
    }

    #[test]
    fn test_alias() {
        assert_eq!("ops".parse::<AgentName>().unwrap(), AgentName::Operations);
    }

    #[test]
    fn test_unknown_agent() {
        assert!("warehouse".parse::<AgentName>().is_err());
    }

    #[test]
    fn test_precedence_ordering() {
        assert!(AgentName::Supervisor.precedence() < AgentName::Inventory.precedence());
        assert!(AgentName::Inventory.precedence() < AgentName::Operations.precedence());
        assert!(AgentName::Operations.precedence() < AgentName::Quality.precedence());
        assert!(AgentName::Quality.precedence() < AgentName::Math.precedence());
    }

    #[test]
    fn test_routable_excludes_supervisor() {
        assert!(!AgentName::routable().contains(&AgentName::Supervisor));
    }
}
