//! Diagnostic output for the reporter.
//!
//! The reporter never reads from its logger; it only reports problems it
//! recovered from. [`WarnSink`] is the seam hosts plug their own logging
//! into. [`LogWarnSink`] forwards to the `log` facade and is used when no
//! sink is supplied.

use std::error::Error;

/// Target used for every diagnostic emitted through the `log` facade.
pub const LOG_TARGET: &str = "reporter.json-to-file";

/// Trait implemented by diagnostic sinks.
///
/// Sinks are `Send + Sync` so a reporter can be shared across threads.
pub trait WarnSink: Send + Sync {
    /// Report a recovered problem, optionally with the underlying error.
    fn warn(&self, message: &str, error: Option<&dyn Error>);
}

/// Sink forwarding warnings to the `log` crate.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogWarnSink;

impl WarnSink for LogWarnSink {
    fn warn(&self, message: &str, error: Option<&dyn Error>) {
        match error {
            Some(err) => log::warn!(target: LOG_TARGET, "{message}: {err}"),
            None => log::warn!(target: LOG_TARGET, "{message}"),
        }
    }
}

/// Sink forwarding warnings to `tracing`, keeping the error as a field.
#[cfg(feature = "tracing-compat")]
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingWarnSink;

#[cfg(feature = "tracing-compat")]
impl WarnSink for TracingWarnSink {
    fn warn(&self, message: &str, error: Option<&dyn Error>) {
        match error {
            Some(err) => tracing::warn!(target: LOG_TARGET, error = %err, "{message}"),
            None => tracing::warn!(target: LOG_TARGET, "{message}"),
        }
    }
}

impl<T: WarnSink + ?Sized> WarnSink for std::sync::Arc<T> {
    fn warn(&self, message: &str, error: Option<&dyn Error>) {
        (**self).warn(message, error);
    }
}
