//! CLI configuration.
//!
//! ```text
//! Cli
//! ├── server: ServerConfig          # Host, port, shutdown
//! ├── middleware: MiddlewareConfig  # CORS, OpenAPI, request timeout
//! └── service: ServiceConfig        # Trace store, health cache
//! ```
//!
//! Every option can be passed as an argument or an environment variable.
//!
//! ```bash
//! langviz --postgres-url "postgresql://..." --port 8080
//! POSTGRES_URL="postgresql://..." PORT=8080 langviz
//! ```

mod middleware;
mod server;

use std::process;

use anyhow::Context;
use clap::Parser;
use langviz_server::service::ServiceConfig;
pub use middleware::MiddlewareConfig;
pub use server::ServerConfig;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::{TRACING_TARGET_CONFIG, TRACING_TARGET_SERVER_STARTUP};

/// Command-line arguments of the `langviz` binary.
#[derive(Debug, Clone, Parser)]
#[command(name = "langviz")]
#[command(about = "LangViz trace dashboard server")]
#[command(version)]
pub struct Cli {
    #[clap(flatten)]
    pub server: ServerConfig,

    #[clap(flatten)]
    pub middleware: MiddlewareConfig,

    #[clap(flatten)]
    pub service: ServiceConfig,
}

impl Cli {
    /// Loads `.env` when enabled, then parses arguments.
    pub fn init() -> Self {
        Self::load_dotenv();
        Self::parse()
    }

    #[cfg(feature = "dotenv")]
    fn load_dotenv() {
        if let Err(err) = dotenvy::dotenv()
            && !err.not_found()
        {
            eprintln!("Warning: failed to load .env file: {err}");
        }
    }

    #[cfg(not(feature = "dotenv"))]
    fn load_dotenv() {}

    /// Installs the fmt subscriber, filtered by `RUST_LOG` (default `info`).
    pub fn init_tracing() {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        self.server
            .validate()
            .context("invalid server configuration")?;
        self.service
            .validate()
            .context("invalid service configuration")?;
        Ok(())
    }

    pub fn log(&self) {
        tracing::debug!(
            target: TRACING_TARGET_SERVER_STARTUP,
            version = env!("CARGO_PKG_VERSION"),
            pid = process::id(),
            arch = std::env::consts::ARCH,
            os = std::env::consts::OS,
            dotenv = cfg!(feature = "dotenv"),
            "build information"
        );

        self.server.log();
        self.middleware.log();

        let postgres = &self.service.postgres;
        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            postgres_url = %postgres.database_url_masked(),
            postgres_max_connections = postgres.postgres_max_connections,
            postgres_connection_timeout_secs = ?postgres.postgres_connection_timeout_secs,
            postgres_idle_timeout_secs = ?postgres.postgres_idle_timeout_secs,
            health_cache_ttl_secs = self.service.health_cache_ttl_secs,
            "trace store configuration"
        );
    }
}
