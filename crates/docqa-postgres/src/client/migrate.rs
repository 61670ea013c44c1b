//! Embedded schema migrations.

use std::time::Instant;

use diesel_async::async_connection_wrapper::AsyncConnectionWrapper;
use diesel_migrations::MigrationHarness;
use tokio::task::spawn_blocking;

use crate::{MIGRATIONS, PgClient, PgError, PgResult, TRACING_TARGET_MIGRATION};

/// Runs all pending migrations and returns the versions that were applied.
///
/// Diesel's migration harness is synchronous, so it runs on the blocking
/// pool over an [`AsyncConnectionWrapper`].
#[tracing::instrument(skip(pg), target = TRACING_TARGET_MIGRATION)]
pub async fn run_pending_migrations(pg: &PgClient) -> PgResult<Vec<String>> {
    let start_time = Instant::now();
    let conn = pg.get_pooled_connection().await?;
    let mut conn: AsyncConnectionWrapper<_> = conn.into();

    let versions = spawn_blocking(move || {
        conn.run_pending_migrations(MIGRATIONS).map(|versions| {
            versions
                .into_iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
        })
    })
    .await
    .map_err(|err| {
        tracing::error!(
            target: TRACING_TARGET_MIGRATION,
            error = %err,
            "Migration task panicked"
        );
        PgError::Migration(err.into())
    })?
    .map_err(|err| {
        tracing::error!(
            target: TRACING_TARGET_MIGRATION,
            error = %err,
            "Database migration failed"
        );
        PgError::Migration(err)
    })?;

    if versions.is_empty() {
        tracing::debug!(
            target: TRACING_TARGET_MIGRATION,
            "Database schema is already up to date"
        );
    } else {
        tracing::info!(
            target: TRACING_TARGET_MIGRATION,
            duration = ?start_time.elapsed(),
            applied = ?versions,
            "Applied database migrations"
        );
    }

    Ok(versions)
}
