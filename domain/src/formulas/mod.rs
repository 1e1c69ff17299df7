//! Pure formula library.
//!
//! Every function here is deterministic given numeric inputs, validates its
//! arguments, and returns a serializable result struct. Agents embed these
//! results verbatim in their responses; nothing in this module touches an
//! external service.

pub mod expr;
pub mod inventory;
pub mod normal;
pub mod operations;
pub mod quality;
