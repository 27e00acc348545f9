/**
 * Transactional Client
 *
 * A single pooled connection checked out for a multi-statement operation.
 * The client owns the connection, remembers the last statement it ran and
 * carries a checkout watchdog. `release()` hands the connection back exactly
 * once; dropping an unreleased client releases it as well.
 *
 * A connection released while its transaction is still open is closed
 * instead of being returned, so the pool never hands out a connection in
 * the middle of someone else's transaction.
 */
use sqlx::pool::PoolConnection;
use sqlx::Postgres;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::backend::db::error::DatabaseError;
use crate::backend::db::params::{run_statement, truncate_statement, QueryResult, SqlParam};
use crate::backend::db::watchdog::{CheckoutWatchdog, LastQuery};

pub struct TransactionalClient {
    conn: Option<PoolConnection<Postgres>>,
    last_query: LastQuery,
    watchdog: CheckoutWatchdog,
    leased: Arc<AtomicUsize>,
    in_transaction: bool,
    log_queries: bool,
}

impl TransactionalClient {
    pub(crate) fn new(
        conn: PoolConnection<Postgres>,
        leased: Arc<AtomicUsize>,
        watchdog_threshold: Duration,
        log_queries: bool,
    ) -> Self {
        let last_query: LastQuery = Arc::new(Mutex::new(None));
        let watchdog = CheckoutWatchdog::arm(watchdog_threshold, last_query.clone());
        Self {
            conn: Some(conn),
            last_query,
            watchdog,
            leased,
            in_transaction: false,
            log_queries,
        }
    }

    /// Run a statement on this client's connection
    pub async fn query(
        &mut self,
        sql: &str,
        params: &[SqlParam],
    ) -> Result<QueryResult, DatabaseError> {
        let conn = self.conn.as_mut().ok_or(DatabaseError::Released)?;
        if let Ok(mut last) = self.last_query.lock() {
            *last = Some(sql.to_string());
        }

        let started = Instant::now();
        let result = run_statement(&mut **conn, sql, params).await?;
        if self.log_queries {
            tracing::debug!(
                statement = %truncate_statement(sql, 80),
                duration_ms = started.elapsed().as_millis() as u64,
                rows = result.row_count,
                "Executed transactional query"
            );
        }
        Ok(result)
    }

    pub async fn begin(&mut self) -> Result<(), DatabaseError> {
        self.query("BEGIN", &[]).await?;
        self.in_transaction = true;
        Ok(())
    }

    pub async fn commit(&mut self) -> Result<(), DatabaseError> {
        self.query("COMMIT", &[]).await?;
        self.in_transaction = false;
        Ok(())
    }

    pub async fn rollback(&mut self) -> Result<(), DatabaseError> {
        self.query("ROLLBACK", &[]).await?;
        self.in_transaction = false;
        Ok(())
    }

    /// The most recent statement issued through this client
    pub fn last_query(&self) -> Option<String> {
        self.last_query.lock().ok().and_then(|query| query.clone())
    }

    pub fn in_transaction(&self) -> bool {
        self.in_transaction
    }

    pub fn is_released(&self) -> bool {
        self.conn.is_none()
    }

    /// Return the connection to the pool. Later calls do nothing.
    pub fn release(&mut self) {
        let Some(conn) = self.conn.take() else {
            return;
        };
        self.watchdog.disarm();
        self.leased.fetch_sub(1, Ordering::SeqCst);

        if self.in_transaction {
            tracing::warn!(
                last_query = self.last_query().as_deref().unwrap_or("<none>"),
                "Client released inside an open transaction; closing the connection"
            );
            self.in_transaction = false;
            drop(conn.detach());
        } else {
            drop(conn);
        }
    }
}

impl Drop for TransactionalClient {
    fn drop(&mut self) {
        self.release();
    }
}
