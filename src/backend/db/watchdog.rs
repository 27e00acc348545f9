//! Checkout watchdog for leased clients.
//!
//! Diagnostic only: when a client is held past the threshold it logs a
//! warning with the last statement the client ran. It never reclaims the
//! connection.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;

/// How long a client may stay checked out before the watchdog warns
pub const CHECKOUT_WARN_AFTER: Duration = Duration::from_secs(5);

/// Last statement issued through a leased client, shared with its watchdog
pub(crate) type LastQuery = Arc<Mutex<Option<String>>>;

pub struct CheckoutWatchdog {
    handle: Option<JoinHandle<()>>,
    fired: Arc<AtomicBool>,
}

impl CheckoutWatchdog {
    /// Start the timer. Must be called inside a Tokio runtime.
    pub(crate) fn arm(threshold: Duration, last_query: LastQuery) -> Self {
        let fired = Arc::new(AtomicBool::new(false));
        let flag = fired.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(threshold).await;
            flag.store(true, Ordering::SeqCst);
            let last = last_query.lock().ok().and_then(|query| query.clone());
            tracing::warn!(
                threshold_ms = threshold.as_millis() as u64,
                last_query = last.as_deref().unwrap_or("<none>"),
                "A database client has been checked out for longer than the threshold"
            );
        });
        Self {
            handle: Some(handle),
            fired,
        }
    }

    /// Whether the warning has been emitted
    pub fn has_fired(&self) -> bool {
        self.fired.load(Ordering::SeqCst)
    }

    /// Whether the timer is still pending
    pub fn is_armed(&self) -> bool {
        self.handle.is_some()
    }

    /// Cancel the timer. Safe to call more than once.
    pub fn disarm(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

impl Drop for CheckoutWatchdog {
    fn drop(&mut self) {
        self.disarm();
    }
}
