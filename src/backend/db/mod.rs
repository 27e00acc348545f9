//! Database Module
//!
//! PostgreSQL access for the backend: the shared connection pool, leased
//! transactional clients and the helpers around them.
//!
//! - **`pool`** - `Database` handle, health check, shutdown
//! - **`client`** - `TransactionalClient` for multi-statement work
//! - **`params`** - positional parameters and result sets
//! - **`watchdog`** - checkout timer for leased clients
//! - **`error`** - `DatabaseError`

pub mod client;
pub mod error;
pub mod params;
pub mod pool;
pub mod watchdog;

pub use client::TransactionalClient;
pub use error::DatabaseError;
pub use params::{QueryResult, SqlParam};
pub use pool::{Database, DatabaseHealth, PoolEvent};
