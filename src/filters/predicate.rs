//! Caller-supplied record predicates.

use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use thiserror::Error;

use crate::log_record::LogRecord;

/// Failure reported by a custom predicate.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct PredicateError(pub String);

impl From<&str> for PredicateError {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for PredicateError {
    fn from(value: String) -> Self {
        Self(value)
    }
}

type PredicateFn = dyn Fn(&LogRecord) -> Result<bool, PredicateError> + Send + Sync;

/// Shareable wrapper around a predicate closure.
#[derive(Clone)]
pub struct Predicate(Arc<PredicateFn>);

impl Predicate {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&LogRecord) -> Result<bool, PredicateError> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Wrap an infallible predicate.
    pub fn infallible<F>(f: F) -> Self
    where
        F: Fn(&LogRecord) -> bool + Send + Sync + 'static,
    {
        Self::new(move |record| Ok(f(record)))
    }

    /// Run the predicate, converting a panic into a [`PredicateError`].
    pub fn call(&self, record: &LogRecord) -> Result<bool, PredicateError> {
        match catch_unwind(AssertUnwindSafe(|| (self.0)(record))) {
            Ok(result) => result,
            Err(payload) => {
                let message = payload
                    .downcast_ref::<&str>()
                    .map(|s| (*s).to_owned())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "predicate panicked".to_owned());
                Err(PredicateError(message))
            }
        }
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Predicate(..)")
    }
}
