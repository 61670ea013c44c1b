//! Error type shared by the client, migrations and repositories.

use deadpool::managed::TimeoutType;
use diesel::ConnectionError;
use diesel::result::Error as DieselError;
use diesel_async::pooled_connection::PoolError as ManagerError;
use diesel_async::pooled_connection::deadpool::PoolError;

use crate::TRACING_TARGET_CONNECTION;

/// Boxed error produced by the migration harness.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Specialized [`Result`] type for database operations.
pub type PgResult<T, E = PgError> = Result<T, E>;

/// Errors raised while talking to PostgreSQL.
#[derive(Debug, thiserror::Error)]
#[must_use = "database errors should be handled appropriately"]
pub enum PgError {
    /// The connection settings were rejected before any I/O happened.
    #[error("invalid database configuration: {0}")]
    Config(String),

    /// The pool gave up waiting for, creating or recycling a connection.
    #[error("timed out while {} a pooled connection", timeout_action(.0))]
    Timeout(TimeoutType),

    /// The server could not be reached or dropped the connection.
    #[error("database connection failed: {0}")]
    Connection(#[from] ConnectionError),

    /// Applying the embedded schema failed.
    #[error("schema migration failed: {0}")]
    Migration(BoxError),

    /// A statement was rejected or returned something unexpected.
    #[error("database query failed: {0}")]
    Query(#[from] DieselError),

    /// The pool itself is unusable (closed, misbuilt, or a hook failed).
    #[error("connection pool error: {0}")]
    Pool(String),
}

fn timeout_action(timeout: &TimeoutType) -> &'static str {
    match timeout {
        TimeoutType::Wait => "waiting for",
        TimeoutType::Create => "creating",
        TimeoutType::Recycle => "recycling",
    }
}

impl PgError {
    /// Returns `true` when retrying the same operation later may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Timeout(_) => true,
            Self::Connection(ConnectionError::BadConnection(_)) => true,
            Self::Query(DieselError::DatabaseError(kind, _)) => matches!(
                kind,
                diesel::result::DatabaseErrorKind::SerializationFailure
                    | diesel::result::DatabaseErrorKind::ClosedConnection
            ),
            _ => false,
        }
    }
}

impl From<PoolError> for PgError {
    fn from(value: PoolError) -> Self {
        match value {
            PoolError::Timeout(timeout) => Self::Timeout(timeout),
            PoolError::Backend(ManagerError::ConnectionError(err)) => Self::Connection(err),
            PoolError::Backend(ManagerError::QueryError(err)) => Self::Query(err),
            PoolError::Closed => Self::Pool("pool has been closed".to_owned()),
            PoolError::NoRuntimeSpecified => Self::Pool("no async runtime configured".to_owned()),
            PoolError::PostCreateHook(err) => {
                tracing::warn!(
                    target: TRACING_TARGET_CONNECTION,
                    error = %err,
                    "Post-create hook rejected a connection"
                );
                Self::Pool(err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeouts_are_transient() {
        assert!(PgError::Timeout(TimeoutType::Wait).is_transient());
        assert!(PgError::Connection(ConnectionError::BadConnection("reset".into())).is_transient());
    }

    #[test]
    fn config_and_missing_rows_are_not_transient() {
        assert!(!PgError::Config("empty url".into()).is_transient());
        assert!(!PgError::Query(DieselError::NotFound).is_transient());
    }

    #[test]
    fn closed_pool_maps_to_pool_error() {
        let err = PgError::from(PoolError::Closed);
        assert!(matches!(err, PgError::Pool(_)));
        assert!(!err.is_transient());
    }

    #[test]
    fn timeout_message_names_the_phase() {
        let err = PgError::Timeout(TimeoutType::Create);
        assert_eq!(err.to_string(), "timed out while creating a pooled connection");
    }
}
