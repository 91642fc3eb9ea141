//! [`Error`], [`ErrorKind`] and [`Result`].

mod http_error;
mod pg_error;
mod pg_graph;

pub use http_error::{Error, ErrorKind, Result};
pub(crate) use pg_error::graph_not_found;
