use diesel::migration::MigrationSource;
use diesel::pg::Pg;
use diesel::sql_query;
use diesel::sql_types::{Bool, Text};
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use super::MigrationStatus;
use crate::{MIGRATIONS, PgError, PgResult, TRACING_TARGET_MIGRATION};

const MIGRATIONS_TABLE: &str = "__diesel_schema_migrations";

#[derive(diesel::QueryableByName)]
struct ExistsRow {
    #[diesel(sql_type = Bool)]
    exists: bool,
}

#[derive(diesel::QueryableByName)]
struct VersionRow {
    #[diesel(sql_type = Text)]
    version: String,
}

/// Compares embedded migrations with the versions recorded in the database.
#[tracing::instrument(skip(conn), target = TRACING_TARGET_MIGRATION)]
pub(crate) async fn get_migration_status(
    conn: &mut AsyncPgConnection,
) -> PgResult<MigrationStatus> {
    let applied_versions = get_applied_migrations(conn).await?;
    let pending_versions = embedded_versions()?
        .into_iter()
        .filter(|version| !applied_versions.contains(version))
        .collect::<Vec<_>>();

    let status = MigrationStatus::new(applied_versions, pending_versions);
    tracing::debug!(
        target: TRACING_TARGET_MIGRATION,
        applied = status.applied_migrations(),
        pending = status.pending_migrations(),
        "Migration status retrieved"
    );

    Ok(status)
}

/// Checks that the migration table and every trace table exist.
#[tracing::instrument(skip(conn), target = TRACING_TARGET_MIGRATION)]
pub(crate) async fn verify_schema_integrity(conn: &mut AsyncPgConnection) -> PgResult<()> {
    for table in [MIGRATIONS_TABLE, "graphs", "graph_steps", "graph_edges"] {
        if !table_exists(conn, table).await? {
            tracing::warn!(target: TRACING_TARGET_MIGRATION, table, "Expected table is missing");
            return Err(PgError::Migration(
                format!("table {table} does not exist").into(),
            ));
        }
    }

    Ok(())
}

/// Returns the versions recorded in the migration table.
///
/// A database that has never been migrated has no versions.
async fn get_applied_migrations(conn: &mut AsyncPgConnection) -> PgResult<Vec<String>> {
    if !table_exists(conn, MIGRATIONS_TABLE).await? {
        return Ok(Vec::new());
    }

    let rows = sql_query("SELECT version FROM __diesel_schema_migrations ORDER BY version")
        .get_results::<VersionRow>(conn)
        .await
        .map_err(|e| PgError::Migration(format!("failed to read applied migrations: {e}").into()))?;

    Ok(rows.into_iter().map(|row| row.version).collect())
}

async fn table_exists(conn: &mut AsyncPgConnection, table: &str) -> PgResult<bool> {
    let row = sql_query(
        "SELECT EXISTS (
            SELECT FROM information_schema.tables
            WHERE table_schema = current_schema() AND table_name = $1
         ) AS exists",
    )
    .bind::<Text, _>(table)
    .get_result::<ExistsRow>(conn)
    .await?;

    Ok(row.exists)
}

/// Versions of the migrations embedded in the binary, oldest first.
fn embedded_versions() -> PgResult<Vec<String>> {
    let migrations = MigrationSource::<Pg>::migrations(&MIGRATIONS).map_err(PgError::Migration)?;
    let mut versions = migrations
        .iter()
        .map(|migration| migration.name().version().to_string())
        .collect::<Vec<_>>();
    versions.sort();

    Ok(versions)
}
