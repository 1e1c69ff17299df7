//! Core domain types: errors and the query value object.

pub mod error;
pub mod query;
