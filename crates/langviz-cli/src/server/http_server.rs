//! HTTP listener with graceful shutdown.

use std::future::Future;
use std::io;
use std::time::Instant;

use axum::Router;
use tokio::net::TcpListener;

use super::{TRACING_TARGET_SHUTDOWN, TRACING_TARGET_STARTUP};
use crate::config::ServerConfig;
use crate::server::{Result, ServerError, shutdown_signal};

/// Runs `serve_fn` and logs how the server stopped.
pub(crate) async fn serve_with_shutdown<F>(
    server_config: &ServerConfig,
    serve_fn: impl FnOnce() -> F,
) -> Result<()>
where
    F: Future<Output = io::Result<()>>,
{
    let start_time = Instant::now();

    tracing::info!(
        target: TRACING_TARGET_STARTUP,
        addr = %server_config.server_addr(),
        "server is ready and listening for connections"
    );

    if server_config.binds_to_all_interfaces() {
        tracing::warn!(
            target: TRACING_TARGET_STARTUP,
            "server is bound to all interfaces, ensure firewall rules are configured"
        );
    }

    serve_fn().await.map_err(|err| {
        let err = ServerError::Runtime(err);
        tracing::error!(
            target: TRACING_TARGET_SHUTDOWN,
            error = %err,
            error_code = err.error_code(),
            suggestion = err.suggestion(),
            uptime_secs = start_time.elapsed().as_secs(),
            "server encountered an error"
        );
        err
    })?;

    tracing::info!(
        target: TRACING_TARGET_SHUTDOWN,
        uptime_secs = start_time.elapsed().as_secs(),
        "server shut down gracefully"
    );
    Ok(())
}

/// Binds the configured address and serves `app` until a shutdown signal.
pub async fn serve_http(app: Router, server_config: ServerConfig) -> Result<()> {
    if let Err(validation_error) = server_config.validate() {
        let err = ServerError::invalid_config(&validation_error);
        tracing::error!(
            target: TRACING_TARGET_STARTUP,
            error = %err,
            "invalid server configuration"
        );
        return Err(err);
    }

    let server_addr = server_config.server_addr();
    let listener = TcpListener::bind(server_addr).await.map_err(|source| {
        let err = ServerError::bind_error(server_addr, source);
        tracing::error!(
            target: TRACING_TARGET_STARTUP,
            error = %err,
            error_code = err.error_code(),
            recoverable = err.is_recoverable(),
            suggestion = err.suggestion(),
            "failed to bind to address"
        );
        err
    })?;

    let shutdown_signal = shutdown_signal(server_config.shutdown_timeout());
    serve_with_shutdown(&server_config, || async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal)
            .await
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn serve_with_shutdown_success() {
        let config = ServerConfig::default();
        let result = serve_with_shutdown(&config, || async { Ok(()) }).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn serve_with_shutdown_wraps_runtime_errors() {
        let config = ServerConfig::default();
        let result =
            serve_with_shutdown(&config, || async { Err(io::Error::other("test error")) }).await;

        assert!(matches!(result, Err(ServerError::Runtime(_))));
    }
}
