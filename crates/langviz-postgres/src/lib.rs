#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

/// Embeds all migrations into the final binary.
pub(crate) const MIGRATIONS: diesel_migrations::EmbeddedMigrations =
    diesel_migrations::embed_migrations!("./migrations");

// Tracing target constants for consistent logging.

/// Tracing target for client initialization, configuration and lifecycle events.
pub const TRACING_TARGET_CLIENT: &str = "langviz_postgres::client";

/// Tracing target for query execution, results and query-related errors.
pub const TRACING_TARGET_QUERY: &str = "langviz_postgres::queries";

/// Tracing target for migration application and status checks.
pub const TRACING_TARGET_MIGRATION: &str = "langviz_postgres::migrations";

/// Tracing target for connection establishment and pool management.
pub const TRACING_TARGET_CONNECTION: &str = "langviz_postgres::connection";

mod client;
mod error;
pub mod model;
pub mod query;
mod schema;
pub mod types;

pub use diesel::result::Error as DieselError;
pub use diesel_async::AsyncPgConnection as PgConnection;

pub use crate::client::{
    ConnectionPool, MigrationResult, MigrationStatus, PgClient, PgClientExt, PgConfig, PgConn,
    PgPoolStatus, PooledConnection,
};
pub use crate::error::{BoxError, ErrorHint, PgError, PgResult};
