//! User-visible notifications.
//!
//! The remote layer reports the outcome of every call through a
//! [`Notifier`]. Front ends decide how to show them (toasts, stderr, ...);
//! callers that only need the result can ignore this entirely.

/// Sink for transient user notifications.
pub trait Notifier: Send + Sync {
    /// An operation succeeded.
    fn success(&self, message: &str);

    /// An operation failed.
    fn error(&self, message: &str);
}

/// Notifier that writes to the `tracing` log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn success(&self, message: &str) {
        tracing::info!(target: "notes::notify", "{}", message);
    }

    fn error(&self, message: &str) {
        tracing::warn!(target: "notes::notify", "{}", message);
    }
}
