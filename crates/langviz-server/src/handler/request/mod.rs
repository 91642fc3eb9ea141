//! Request types for HTTP handlers.

mod graphs;
mod traces;
mod validations;

pub use graphs::*;
pub use traces::*;
