//! PostgreSQL client with connection pooling and migration management.

pub(crate) mod custom_hooks;
mod migrate;
mod pg_client;
mod pg_config;

use deadpool::managed::{Object, Pool};
use diesel_async::AsyncPgConnection;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;

pub use self::migrate::{MigrationResult, MigrationStatus, PgClientExt};
pub use self::pg_client::{PgClient, PgConn, PgPoolStatus};
pub use self::pg_config::PgConfig;

/// Connection pool used by [`PgClient`].
pub type ConnectionPool = Pool<AsyncDieselConnectionManager<AsyncPgConnection>>;

/// Connection object checked out of the [`ConnectionPool`].
pub type PooledConnection = Object<AsyncDieselConnectionManager<AsyncPgConnection>>;
