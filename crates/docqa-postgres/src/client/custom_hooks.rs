//! Connection setup and pool hooks.

use std::time::Instant;

use deadpool::managed::{HookResult, Metrics};
use diesel::ConnectionResult;
use diesel_async::pooled_connection::{PoolError, PoolableConnection};
use diesel_async::{AsyncConnection, AsyncPgConnection};
use futures::FutureExt;
use futures::future::BoxFuture;

use super::PgConfig;
use crate::TRACING_TARGET_CONNECTION;

/// Opens a fresh connection for the pool, timing the handshake.
///
/// Installed as [`ManagerConfig::custom_setup`].
///
/// [`ManagerConfig::custom_setup`]: diesel_async::pooled_connection::ManagerConfig
pub fn establish<C>(url: &str) -> BoxFuture<'_, ConnectionResult<C>>
where
    C: AsyncConnection + 'static,
{
    let started = Instant::now();

    async move {
        let conn = C::establish(url).await;
        let elapsed_ms = started.elapsed().as_millis();

        if let Err(err) = &conn {
            tracing::error!(
                target: TRACING_TARGET_CONNECTION,
                url = %PgConfig::mask_url(url),
                elapsed_ms,
                error = %err,
                "Could not open database connection"
            );
        } else {
            tracing::debug!(
                target: TRACING_TARGET_CONNECTION,
                elapsed_ms,
                "Opened database connection"
            );
        }

        conn
    }
    .boxed()
}

/// Runs after the pool creates a connection.
pub fn post_create(conn: &mut AsyncPgConnection, metrics: &Metrics) -> HookResult<PoolError> {
    warn_if_broken(conn, "post_create", metrics);
    Ok(())
}

/// Runs before the pool hands a connection out again.
pub fn pre_recycle(conn: &mut AsyncPgConnection, metrics: &Metrics) -> HookResult<PoolError> {
    warn_if_broken(conn, "pre_recycle", metrics);
    Ok(())
}

fn warn_if_broken(conn: &mut AsyncPgConnection, hook: &'static str, metrics: &Metrics) {
    if conn.is_broken() {
        tracing::warn!(
            target: TRACING_TARGET_CONNECTION,
            hook,
            age = ?metrics.age(),
            recycled = metrics.recycle_count,
            "Pooled connection is broken"
        );
    }
}
