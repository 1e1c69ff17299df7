//! Document context: character budget and the FIFO store.

pub mod budget;
pub mod store;
