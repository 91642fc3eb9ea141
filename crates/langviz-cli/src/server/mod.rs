//! HTTP server startup and lifecycle.

mod error;
mod http_server;
mod shutdown;

pub use error::{Result, ServerError};
pub use http_server::serve_http as serve;
use shutdown::shutdown_signal;

use crate::{
    TRACING_TARGET_SERVER_SHUTDOWN as TRACING_TARGET_SHUTDOWN,
    TRACING_TARGET_SERVER_STARTUP as TRACING_TARGET_STARTUP,
};
