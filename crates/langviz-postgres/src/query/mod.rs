//! Repository traits implemented for [`PgConnection`].
//!
//! [`PgConnection`]: crate::PgConnection

mod graph;
mod graph_trace;

pub use graph::GraphRepository;
pub use graph_trace::{GraphTrace, GraphTraceRepository, ReplacedTrace};
