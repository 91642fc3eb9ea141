//! Response types for HTTP handlers.

mod errors;
mod graphs;
mod monitors;
mod traces;

pub use errors::*;
pub use graphs::*;
pub use monitors::*;
pub use traces::*;
