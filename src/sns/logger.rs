//! Log sink used by the confirmation handler.

/// Sink for confirmation progress messages.
///
/// Defaults to [`TracingLogger`]; swap it to capture or redirect output.
pub trait ConfirmLogger: Send + Sync {
    fn debug(&self, message: &str);
    fn info(&self, message: &str);
}

/// Forwards to the `tracing` subscriber installed by the binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl ConfirmLogger for TracingLogger {
    fn debug(&self, message: &str) {
        tracing::debug!(target: "sns_confirm::sns", "{}", message);
    }

    fn info(&self, message: &str) {
        tracing::info!(target: "sns_confirm::sns", "{}", message);
    }
}
