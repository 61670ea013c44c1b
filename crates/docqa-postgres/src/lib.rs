#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod client;
mod error;
pub mod model;
pub mod query;
mod schema;

pub use diesel_async::AsyncPgConnection as PgConnection;
pub use pgvector::Vector;

pub use crate::client::{
    ConnectionPool, PgClient, PgConfig, PgConn, PooledConnection, run_pending_migrations,
};
pub use crate::error::{BoxError, PgError, PgResult};

/// Schema migrations compiled into the binary.
pub(crate) const MIGRATIONS: diesel_migrations::EmbeddedMigrations =
    diesel_migrations::embed_migrations!("src/migrations");

/// Tracing target for pool setup, connection hooks and checkouts.
pub const TRACING_TARGET_CONNECTION: &str = "docqa_postgres::connection";

/// Tracing target for repository queries.
pub const TRACING_TARGET_QUERY: &str = "docqa_postgres::queries";

/// Tracing target for schema migrations.
pub const TRACING_TARGET_MIGRATION: &str = "docqa_postgres::migrations";
