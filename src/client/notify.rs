//! User-facing notifications
//!
//! The auth context reports outcomes through a `Notifier` so a UI can show
//! them as toasts. `TracingNotifier` just logs them.

pub trait Notifier: Send + Sync {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn success(&self, message: &str) {
        tracing::info!(target: "gymbook::notify", "{}", message);
    }

    fn error(&self, message: &str) {
        tracing::warn!(target: "gymbook::notify", "{}", message);
    }
}
