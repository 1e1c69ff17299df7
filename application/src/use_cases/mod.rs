//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod process_documents;
pub mod process_query;
