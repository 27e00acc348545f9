/**
 * Database Error Types
 *
 * Errors raised by the pool manager. Driver errors are carried unchanged in
 * `Query`; the only translation is a pool acquire timeout, which becomes the
 * retryable `Timeout` variant.
 */
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DatabaseError {
    /// The health round-trip could not reach the server
    #[error("Database unreachable: {0}")]
    Unreachable(String),

    /// No pooled connection became available within the connect timeout
    #[error("Timed out waiting for a database connection")]
    Timeout,

    /// Statement failed in the driver
    #[error("Query failed: {0}")]
    Query(sqlx::Error),

    /// The transactional client was already returned to the pool
    #[error("Database client has already been released")]
    Released,

    #[error("Migration failed: {0}")]
    Migration(String),
}

impl DatabaseError {
    /// Whether the caller may retry the same operation later
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout | Self::Unreachable(_))
    }

    /// Whether this is a unique-constraint violation
    pub fn is_unique_violation(&self) -> bool {
        match self {
            Self::Query(sqlx::Error::Database(db_err)) => db_err.is_unique_violation(),
            _ => false,
        }
    }
}

impl From<sqlx::Error> for DatabaseError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut => Self::Timeout,
            other => Self::Query(other),
        }
    }
}
