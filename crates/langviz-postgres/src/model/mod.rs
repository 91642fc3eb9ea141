//! Diesel models for the trace store tables.

mod graph;
mod graph_edge;
mod graph_step;

pub use graph::{DEFAULT_GRAPH_NAME, Graph, NewGraph};
pub use graph_edge::{GraphEdge, NewGraphEdge};
pub use graph_step::{EMPTY_PAYLOAD, GraphStep, NewGraphStep};
