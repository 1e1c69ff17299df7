//! Agent identity, configuration, and response types.

pub mod name;
pub mod response;
pub mod settings;
