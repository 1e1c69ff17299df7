//! Per-agent configuration.
//!
//! Settings are fixed at orchestrator initialization and stay immutable for
//! the process lifetime; reconfiguration means building a new orchestrator.

use crate::agent::name::AgentName;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Settings for a single agent: which model it talks to and how.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSettings {
    /// Provider model identifier (e.g. "gpt-4o", "deepseek-chat")
    pub model: String,
    /// Sampling temperature passed to the provider
    pub temperature: f64,
    /// Whether this agent may use provider function calling to pick formulas
    pub function_calling: bool,
}

impl AgentSettings {
    pub fn new(model: impl Into<String>, temperature: f64) -> Self {
        Self {
            model: model.into(),
            temperature,
            function_calling: true,
        }
    }

    pub fn without_function_calling(mut self) -> Self {
        self.function_calling = false;
        self
    }

    /// Default settings per agent. The math and quality agents run cooler:
    /// their answers are mostly numeric.
    pub fn default_for(name: AgentName) -> Self {
        let temperature = match name {
            AgentName::Supervisor => 0.5,
            AgentName::Inventory => 0.7,
            AgentName::Operations => 0.7,
            AgentName::Quality => 0.4,
            AgentName::Math => 0.2,
        };
        Self {
            model: "gpt-4o".to_string(),
            temperature,
            function_calling: true,
        }
    }
}

/// The full agent configuration set handed to the orchestrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentRoster {
    agents: BTreeMap<AgentName, AgentSettings>,
    /// Enable multi-agent fan-out for multi-domain queries
    pub multi_agent: bool,
    /// Use the supervisor to synthesize fan-out results (falls back to
    /// deterministic concatenation when disabled or on gateway failure)
    pub synthesis: bool,
}

impl AgentRoster {
    /// Settings for an agent. A roster deserialized from partial data may
    /// lack entries; missing agents get their built-in defaults.
    pub fn get(&self, name: AgentName) -> AgentSettings {
        self.agents
            .get(&name)
            .cloned()
            .unwrap_or_else(|| AgentSettings::default_for(name))
    }

    pub fn set(&mut self, name: AgentName, settings: AgentSettings) {
        self.agents.insert(name, settings);
    }

    pub fn iter(&self) -> impl Iterator<Item = (AgentName, &AgentSettings)> {
        self.agents.iter().map(|(n, s)| (*n, s))
    }
}

impl Default for AgentRoster {
    fn default() -> Self {
        let agents = AgentName::all()
            .into_iter()
            .map(|n| (n, AgentSettings::default_for(n)))
            .collect();
        Self {
            agents,
            multi_agent: true,
            synthesis: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roster_covers_all_agents() {
        let roster = AgentRoster::default();
        for name in AgentName::all() {
            // Must not panic
            let _ = roster.get(name);
        }
    }

    #[test]
    fn test_default_temperatures() {
        let roster = AgentRoster::default();
        assert!(roster.get(AgentName::Math).temperature < roster.get(AgentName::Inventory).temperature);
    }

    #[test]
    fn test_partial_roster_falls_back_to_defaults() {
        // A roster deserialized from sparse data must not panic on lookup
        let roster: AgentRoster = serde_json::from_str(
            r#"{
                "agents": {
                    "math": {"model": "deepseek-chat", "temperature": 0.1, "function_calling": false}
                },
                "multi_agent": true,
                "synthesis": false
            }"#,
        )
        .unwrap();

        assert_eq!(roster.get(AgentName::Math).model, "deepseek-chat");
        assert_eq!(roster.get(AgentName::Inventory).model, "gpt-4o");
        assert!(roster.get(AgentName::Inventory).function_calling);
    }

    #[test]
    fn test_set_overrides() {
        let mut roster = AgentRoster::default();
        roster.set(
            AgentName::Inventory,
            AgentSettings::new("deepseek-chat", 0.6),
        );
        assert_eq!(roster.get(AgentName::Inventory).model, "deepseek-chat");
    }
}
