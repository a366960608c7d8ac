//! Logging sink contract.

use tracing::Span;

/// Hands out named loggers.
///
/// A named logger is a `tracing` span carrying the component name; events
/// recorded inside it are attributed to that component.
pub trait Logger: Send + Sync {
    /// Get the logger for the component `name`.
    fn named_logger(&self, name: &str) -> Span;
}

/// [`Logger`] backed by the globally installed `tracing` subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn named_logger(&self, name: &str) -> Span {
        tracing::info_span!("plugin", name = %name)
    }
}
