//! Connection pool, configuration and migrations.

mod custom_hooks;
mod migrate;
mod pg_client;
mod pg_config;

use deadpool::managed::{Object, Pool};
use diesel_async::AsyncPgConnection;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;

pub use self::migrate::run_pending_migrations;
pub use self::pg_client::{PgClient, PgConn};
pub use self::pg_config::PgConfig;

type Manager = AsyncDieselConnectionManager<AsyncPgConnection>;

/// Pool of async Postgres connections.
pub type ConnectionPool = Pool<Manager>;

/// A connection checked out of [`ConnectionPool`].
pub type PooledConnection = Object<Manager>;
