//! User-facing notifications raised by a submission.

/// Where submission notifications go. Per-question errors are never
/// notified; they are shown inline.
pub trait Notifier: Send + Sync {
    fn success(&self, message: &str);

    /// All form-level messages of one batch, delivered together.
    fn bad_request(&self, messages: &[String]);

    fn failure(&self, message: &str);
}

/// Routes notifications to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn success(&self, message: &str) {
        tracing::info!("{message}");
    }

    fn bad_request(&self, messages: &[String]) {
        tracing::warn!(count = messages.len(), "{}", messages.join("\n"));
    }

    fn failure(&self, message: &str) {
        tracing::error!("{message}");
    }
}
