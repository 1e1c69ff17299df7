//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted into domain types after
//! validation.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;
use warebot_domain::{AgentName, AgentRoster, AgentSettings, ContextBudget};

/// How bad a config issue is. Warnings never abort startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

/// One problem found while validating a loaded configuration.
#[derive(Debug, Clone)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub message: String,
}

impl ConfigIssue {
    fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
        }
    }
}

/// Per-agent overrides. Anything left out keeps the built-in default.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAgentConfig {
    pub model: Option<String>,
    pub temperature: Option<f64>,
    pub function_calling: Option<bool>,
}

/// Orchestrator-scope behavior toggles.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileBehaviorConfig {
    /// Fan out multi-domain queries to several agents
    pub multi_agent: bool,
    /// Synthesize fan-out results through the supervisor
    pub synthesis: bool,
    /// Recognized for compatibility; the chat-completions adapter does not
    /// stream, so enabling it only produces a warning
    pub streaming: bool,
}

impl Default for FileBehaviorConfig {
    fn default() -> Self {
        Self {
            multi_agent: true,
            synthesis: true,
            streaming: false,
        }
    }
}

/// Document context store limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileContextConfig {
    pub max_total_chars: usize,
    pub max_document_chars: usize,
}

impl Default for FileContextConfig {
    fn default() -> Self {
        let budget = ContextBudget::default();
        Self {
            max_total_chars: budget.max_total_chars(),
            max_document_chars: budget.max_document_chars(),
        }
    }
}

/// LLM provider endpoint settings. The API key itself never lives in the
/// file, only the name of the environment variable holding it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProviderConfig {
    pub base_url: String,
    pub api_key_env: String,
    pub timeout_secs: u64,
}

impl Default for FileProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            timeout_secs: 60,
        }
    }
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Per-agent settings, keyed by agent name
    pub agents: BTreeMap<String, FileAgentConfig>,
    /// Behavior toggles
    pub behavior: FileBehaviorConfig,
    /// Context store limits
    pub context: FileContextConfig,
    /// Provider endpoint settings
    pub provider: FileProviderConfig,
}

impl FileConfig {
    /// Validate the loaded configuration, returning all detected issues.
    /// Everything here is a warning: a misconfigured section falls back to
    /// its default rather than aborting startup.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        for (name, agent) in &self.agents {
            if AgentName::from_str(name).is_err() {
                issues.push(ConfigIssue::warning(format!(
                    "[agents.{}] is not a known agent and will be ignored",
                    name
                )));
            }
            if let Some(t) = agent.temperature
                && !(0.0..=2.0).contains(&t)
            {
                issues.push(ConfigIssue::warning(format!(
                    "[agents.{}] temperature {} is outside 0.0..=2.0",
                    name, t
                )));
            }
            if let Some(model) = &agent.model
                && model.trim().is_empty()
            {
                issues.push(ConfigIssue::warning(format!(
                    "[agents.{}] model is empty",
                    name
                )));
            }
        }

        if self.context.max_total_chars == 0 {
            issues.push(ConfigIssue::warning(
                "[context] max_total_chars is 0; no documents can be stored",
            ));
        }
        if self.context.max_document_chars > self.context.max_total_chars {
            issues.push(ConfigIssue::warning(
                "[context] max_document_chars exceeds max_total_chars; the total cap wins",
            ));
        }

        if self.provider.timeout_secs == 0 {
            issues.push(ConfigIssue::warning(
                "[provider] timeout_secs is 0; requests will never time out",
            ));
        }

        if self.behavior.streaming {
            issues.push(ConfigIssue::warning(
                "[behavior] streaming is not supported by this provider adapter and will be ignored",
            ));
        }

        issues
    }

    /// Build the domain roster: defaults overridden by whatever the file
    /// sets per agent. Unknown agent names are skipped.
    pub fn agent_roster(&self) -> AgentRoster {
        let mut roster = AgentRoster::default();
        roster.multi_agent = self.behavior.multi_agent;
        roster.synthesis = self.behavior.synthesis;

        for (name, overrides) in &self.agents {
            let Ok(agent) = AgentName::from_str(name) else {
                continue;
            };
            let defaults = AgentSettings::default_for(agent);
            roster.set(
                agent,
                AgentSettings {
                    model: overrides.model.clone().unwrap_or(defaults.model),
                    temperature: overrides.temperature.unwrap_or(defaults.temperature),
                    function_calling: overrides
                        .function_calling
                        .unwrap_or(defaults.function_calling),
                },
            );
        }

        roster
    }

    pub fn context_budget(&self) -> ContextBudget {
        ContextBudget::new(self.context.max_total_chars, self.context.max_document_chars)
    }
}
