/**
 * Connection Pool Manager
 *
 * `Database` owns the single PostgreSQL pool of the process. It is built
 * once at startup, cloned into `AppState` and closed once during shutdown.
 *
 * # Operations
 *
 * - `query` - one statement on any pooled connection
 * - `lease` - check out a `TransactionalClient`
 * - `run_transaction` - BEGIN / work / COMMIT, ROLLBACK on failure, release always
 * - `check_health` - trivial round trip that never fails
 * - `shutdown` - drain and close the pool
 *
 * # Idle Connection Faults
 *
 * Every connection leaving the idle set is pinged. A failed ping is
 * published as `PoolEvent::IdleConnectionError`; the process shell treats
 * that event as fatal.
 */
use chrono::{DateTime, Utc};
use futures_util::future::BoxFuture;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Connection, PgPool, Row};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::broadcast;

use crate::backend::db::client::TransactionalClient;
use crate::backend::db::error::DatabaseError;
use crate::backend::db::params::{run_statement, truncate_statement, QueryResult, SqlParam};
use crate::backend::db::watchdog::CHECKOUT_WARN_AFTER;
use crate::backend::server::config::DatabaseSettings;

/// Pool-level events published to the process shell
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PoolEvent {
    /// A connection failed while sitting idle in the pool
    IdleConnectionError { message: String },
}

/// Outcome of a health round trip
#[derive(Debug, Clone, PartialEq)]
pub enum DatabaseHealth {
    Reachable { server_time: DateTime<Utc> },
    Unreachable { error: String },
}

impl DatabaseHealth {
    pub fn is_reachable(&self) -> bool {
        matches!(self, Self::Reachable { .. })
    }
}

/// Shared handle to the connection pool
#[derive(Clone)]
pub struct Database {
    inner: Arc<DatabaseInner>,
}

struct DatabaseInner {
    pool: PgPool,
    log_queries: bool,
    leased: Arc<AtomicUsize>,
    events: broadcast::Sender<PoolEvent>,
    closed: AtomicBool,
    watchdog_threshold: Duration,
}

impl Database {
    /// Build the pool from settings. Connections are opened lazily, so this
    /// never touches the network; call `check_health` to find out whether the
    /// server is reachable.
    pub fn connect(settings: &DatabaseSettings, log_queries: bool) -> Self {
        let (events, _) = broadcast::channel(16);
        let hook_events = events.clone();

        let pool = PgPoolOptions::new()
            .max_connections(settings.max_connections)
            .idle_timeout(settings.idle_timeout)
            .acquire_timeout(settings.connect_timeout)
            .test_before_acquire(false)
            .before_acquire(move |conn, meta| {
                let events = hook_events.clone();
                Box::pin(async move {
                    match conn.ping().await {
                        Ok(()) => Ok(true),
                        Err(err) => {
                            tracing::error!(
                                error = %err,
                                idle_for_ms = meta.idle_for.as_millis() as u64,
                                "Unexpected error on idle database connection"
                            );
                            let _ = events.send(PoolEvent::IdleConnectionError {
                                message: err.to_string(),
                            });
                            Err(err)
                        }
                    }
                })
            })
            .connect_lazy_with(settings.connect_options());

        tracing::info!(
            target_db = %settings.redacted_target(),
            max_connections = settings.max_connections,
            "Database pool configured"
        );

        Self::with_pool(pool, events, log_queries)
    }

    /// Wrap an existing pool (tests and tools)
    pub fn from_pool(pool: PgPool, log_queries: bool) -> Self {
        let (events, _) = broadcast::channel(16);
        Self::with_pool(pool, events, log_queries)
    }

    fn with_pool(pool: PgPool, events: broadcast::Sender<PoolEvent>, log_queries: bool) -> Self {
        Self {
            inner: Arc::new(DatabaseInner {
                pool,
                log_queries,
                leased: Arc::new(AtomicUsize::new(0)),
                events,
                closed: AtomicBool::new(false),
                watchdog_threshold: CHECKOUT_WARN_AFTER,
            }),
        }
    }

    /// The underlying driver pool
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Subscribe to pool-level events
    pub fn subscribe(&self) -> broadcast::Receiver<PoolEvent> {
        self.inner.events.subscribe()
    }

    /// Number of transactional clients currently checked out
    pub fn leased_clients(&self) -> usize {
        self.inner.leased.load(Ordering::SeqCst)
    }

    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::SeqCst)
    }

    /// Execute one parameterized statement on any available connection
    pub async fn query(&self, sql: &str, params: &[SqlParam]) -> Result<QueryResult, DatabaseError> {
        let started = Instant::now();
        let result = run_statement(&self.inner.pool, sql, params).await?;
        if self.inner.log_queries {
            tracing::debug!(
                statement = %truncate_statement(sql, 80),
                duration_ms = started.elapsed().as_millis() as u64,
                rows = result.row_count,
                "Executed query"
            );
        }
        Ok(result)
    }

    /// Check out a dedicated connection for transactional work
    pub async fn lease(&self) -> Result<TransactionalClient, DatabaseError> {
        let conn = self.inner.pool.acquire().await?;
        self.inner.leased.fetch_add(1, Ordering::SeqCst);
        Ok(TransactionalClient::new(
            conn,
            self.inner.leased.clone(),
            self.inner.watchdog_threshold,
            self.inner.log_queries,
        ))
    }

    /// Run `work` inside BEGIN/COMMIT on one leased client.
    ///
    /// Any failure, including one returned by `work`, rolls the transaction
    /// back and is returned unchanged. The client is released exactly once
    /// in every case.
    ///
    /// ```rust,no_run
    /// # use gymbook::backend::db::{Database, DatabaseError, SqlParam};
    /// # async fn example(db: Database) -> Result<(), DatabaseError> {
    /// let count = db
    ///     .run_transaction(|client| {
    ///         Box::pin(async move {
    ///             client.query("UPDATE users SET updated_at = NOW()", &[]).await?;
    ///             let result = client.query("SELECT id FROM users", &[]).await?;
    ///             Ok::<_, DatabaseError>(result.row_count)
    ///         })
    ///     })
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn run_transaction<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: for<'c> FnOnce(&'c mut TransactionalClient) -> BoxFuture<'c, Result<T, E>>,
        E: From<DatabaseError>,
    {
        let mut client = self.lease().await.map_err(E::from)?;

        let result = match client.begin().await {
            Ok(()) => match work(&mut client).await {
                Ok(value) => client.commit().await.map(|()| value).map_err(E::from),
                Err(err) => Err(err),
            },
            Err(err) => Err(E::from(err)),
        };

        if result.is_err() && client.in_transaction() {
            if let Err(rollback_err) = client.rollback().await {
                tracing::error!(error = %rollback_err, "Rollback failed");
            }
        }
        client.release();
        result
    }

    /// Round trip to the server. Never fails; the outcome says whether the
    /// database answered.
    pub async fn check_health(&self) -> DatabaseHealth {
        let outcome = self
            .query("SELECT NOW() AS server_time", &[])
            .await
            .and_then(|result| {
                let row = result
                    .first()
                    .ok_or(DatabaseError::Query(sqlx::Error::RowNotFound))?;
                row.try_get::<DateTime<Utc>, _>("server_time")
                    .map_err(DatabaseError::Query)
            });

        match outcome {
            Ok(server_time) => DatabaseHealth::Reachable { server_time },
            Err(err) => {
                tracing::error!(error = %err, "Database health check failed");
                DatabaseHealth::Unreachable {
                    error: err.to_string(),
                }
            }
        }
    }

    /// Apply pending schema migrations
    pub async fn migrate(&self) -> Result<(), DatabaseError> {
        sqlx::migrate!("./migrations")
            .run(&self.inner.pool)
            .await
            .map_err(|err| DatabaseError::Migration(err.to_string()))
    }

    /// Drain and close every pooled connection. Only the first call does
    /// anything.
    pub async fn shutdown(&self) {
        if self.inner.closed.swap(true, Ordering::SeqCst) {
            tracing::debug!("Database pool already closed");
            return;
        }
        tracing::info!("Closing database pool...");
        self.inner.pool.close().await;
        tracing::info!("Database pool closed");
    }
}
