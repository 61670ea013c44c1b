use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use deadpool::managed::{Hook, Pool};
use derive_more::{Deref, DerefMut};
use diesel::sql_types::Integer;
use diesel_async::RunQueryDsl;
use diesel_async::pooled_connection::{AsyncDieselConnectionManager, ManagerConfig};

use super::custom_hooks;
use crate::{
    ConnectionPool, PgConfig, PgError, PgResult, PooledConnection, TRACING_TARGET_CONNECTION,
};

/// Checkouts slower than this are logged as warnings.
const SLOW_CHECKOUT: Duration = Duration::from_millis(100);

/// Pooled PostgreSQL client.
///
/// Clones share one pool. Connections are opened on demand, so building a
/// client never touches the network; call [`PgClient::ping`] to fail fast.
#[derive(Clone)]
pub struct PgClient {
    inner: Arc<Shared>,
}

struct Shared {
    pool: ConnectionPool,
    config: PgConfig,
}

impl PgClient {
    /// Builds the pool described by `config`.
    ///
    /// Prefer [`PgConfig::build`], which validates the settings first.
    #[tracing::instrument(
        skip(config),
        target = TRACING_TARGET_CONNECTION,
        fields(url = %config.database_url_masked())
    )]
    pub fn new(config: PgConfig) -> PgResult<Self> {
        let mut setup = ManagerConfig::default();
        setup.custom_setup = Box::new(custom_hooks::establish);
        let manager = AsyncDieselConnectionManager::new_with_config(config.database_url(), setup);

        let pool = Pool::builder(manager)
            .max_size(config.max_connections as usize)
            .wait_timeout(config.connect_timeout())
            .create_timeout(config.connect_timeout())
            .runtime(deadpool::Runtime::Tokio1)
            .post_create(Hook::sync_fn(custom_hooks::post_create))
            .pre_recycle(Hook::sync_fn(custom_hooks::pre_recycle))
            .build()
            .map_err(|err| PgError::Pool(format!("cannot build connection pool: {err}")))?;

        tracing::debug!(
            target: TRACING_TARGET_CONNECTION,
            max_connections = config.max_connections,
            "Connection pool ready"
        );

        Ok(Self {
            inner: Arc::new(Shared { pool, config }),
        })
    }

    /// Round-trips `SELECT 1` to confirm the database is reachable.
    pub async fn ping(&self) -> PgResult<()> {
        let mut conn = self.get_pooled_connection().await?;
        let _: i32 = diesel::select(diesel::dsl::sql::<Integer>("1"))
            .get_result(&mut *conn)
            .await?;

        Ok(())
    }

    /// Checks out a connection for use with the repository traits.
    pub async fn get_connection(&self) -> PgResult<PgConn> {
        self.get_pooled_connection().await.map(PgConn::new)
    }

    pub(crate) async fn get_pooled_connection(&self) -> PgResult<PooledConnection> {
        let started = Instant::now();
        let conn = self.inner.pool.get().await.map_err(|err| {
            tracing::error!(
                target: TRACING_TARGET_CONNECTION,
                error = %err,
                waited = ?started.elapsed(),
                "Connection checkout failed"
            );
            PgError::from(err)
        })?;

        let waited = started.elapsed();
        if waited > SLOW_CHECKOUT {
            let status = self.inner.pool.status();
            tracing::warn!(
                target: TRACING_TARGET_CONNECTION,
                ?waited,
                pool_size = status.size,
                waiting = status.waiting,
                "Slow connection checkout"
            );
        }

        Ok(conn)
    }

    /// Settings the pool was built from.
    #[inline]
    pub fn config(&self) -> &PgConfig {
        &self.inner.config
    }
}

impl fmt::Debug for PgClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = self.inner.pool.status();
        f.debug_struct("PgClient")
            .field("url", &self.inner.config.database_url_masked())
            .field("connections", &status.size)
            .field("idle", &status.available)
            .finish_non_exhaustive()
    }
}

/// A checked-out connection.
///
/// Dereferences to [`PgConnection`], which carries the repository traits.
/// Dropping it returns the connection to the pool.
///
/// ```ignore
/// let mut conn = pg.get_connection().await?;
/// let stored = conn.count_embeddings(collection_id).await?;
/// ```
///
/// [`PgConnection`]: crate::PgConnection
#[derive(Deref, DerefMut)]
pub struct PgConn(PooledConnection);

impl PgConn {
    /// Wraps a raw pooled connection.
    pub fn new(conn: PooledConnection) -> Self {
        Self(conn)
    }
}

impl fmt::Debug for PgConn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PgConn")
    }
}
