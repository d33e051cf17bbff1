//! A warning sink that accumulates diagnostics in memory for test assertions.
//!
//! Shared across unit test modules so each one does not need its own copy
//! of the same boilerplate.

use std::error::Error;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::warn_sink::WarnSink;

/// One captured warning.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CapturedWarning {
    pub message: String,
    pub error: Option<String>,
}

/// Sink that stores every warning it receives for later inspection.
#[derive(Clone, Default)]
pub struct CollectingWarnSink {
    warnings: Arc<Mutex<Vec<CapturedWarning>>>,
}

impl CollectingWarnSink {
    /// Create a new empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a snapshot of all warnings received so far.
    pub fn collected(&self) -> Vec<CapturedWarning> {
        self.warnings.lock().clone()
    }

    /// Return only the warning messages.
    pub fn messages(&self) -> Vec<String> {
        self.warnings
            .lock()
            .iter()
            .map(|w| w.message.clone())
            .collect()
    }
}

impl WarnSink for CollectingWarnSink {
    fn warn(&self, message: &str, error: Option<&dyn Error>) {
        self.warnings.lock().push(CapturedWarning {
            message: message.to_owned(),
            error: error.map(ToString::to_string),
        });
    }
}
