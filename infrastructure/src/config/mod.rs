//! Configuration loading and validation.

mod file_config;
mod loader;

pub use file_config::{
    ConfigIssue, FileAgentConfig, FileBehaviorConfig, FileConfig, FileContextConfig,
    FileProviderConfig, Severity,
};
pub use loader::ConfigLoader;
