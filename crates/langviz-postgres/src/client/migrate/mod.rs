//! Embedded schema migrations.
//!
//! Migrations are compiled into the binary and applied with
//! [`PgClientExt::run_pending_migrations`] during startup.

mod migrate_result;
mod run_migration;
mod run_utility;

pub use self::migrate_result::{MigrationResult, MigrationStatus};
use self::run_utility::{get_migration_status, verify_schema_integrity};
use crate::{PgClient, PgResult};

/// Extension trait adding migration management to [`PgClient`].
pub trait PgClientExt {
    /// Applies every embedded migration that has not been applied yet.
    ///
    /// Safe to call repeatedly; an up-to-date schema yields a no-op result.
    fn run_pending_migrations(&self) -> impl Future<Output = PgResult<MigrationResult>> + Send;

    /// Compares the embedded migrations with the ones recorded in the database.
    fn get_migration_status(&self) -> impl Future<Output = PgResult<MigrationStatus>> + Send;

    /// Checks that the migration bookkeeping table and the trace tables exist.
    fn verify_schema_integrity(&self) -> impl Future<Output = PgResult<()>> + Send;
}

impl PgClientExt for PgClient {
    async fn run_pending_migrations(&self) -> PgResult<MigrationResult> {
        run_migration::run_pending_migrations(self).await
    }

    async fn get_migration_status(&self) -> PgResult<MigrationStatus> {
        let mut conn = self.get_pooled_connection().await?;
        get_migration_status(&mut conn).await
    }

    async fn verify_schema_integrity(&self) -> PgResult<()> {
        let mut conn = self.get_pooled_connection().await?;
        verify_schema_integrity(&mut conn).await
    }
}
