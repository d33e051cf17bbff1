//! Admission filters for log records.
//!
//! A configured filter is resolved once into a [`RecordFilter`] variant and
//! then evaluated per record. String filters come in two flavours which
//! intentionally behave differently:
//!
//! - a flat key (`"level"`) admits records whose value at that key is
//!   truthy;
//! - a path (`"a.b"`, `"items[0].id"`) admits records in which the last
//!   segment is present at all, even when it holds `null`, `0` or `false`.
//!
//! Custom predicates receive the record and decide for themselves. A
//! predicate that fails or panics rejects the record with a warning.

mod key_path;
mod predicate;

pub use key_path::KeyPath;
pub use predicate::{Predicate, PredicateError};

use crate::{
    log_record::{LogRecord, is_object_shaped, is_truthy, property},
    warn_sink::WarnSink,
};

/// Resolved admission rule.
#[derive(Clone, Debug, Default)]
pub enum RecordFilter {
    /// Admit every object-shaped record.
    #[default]
    NoFilter,
    /// Admit records in which the path resolves to a present value.
    KeyExistencePath(KeyPath),
    /// Admit records whose value at the key is truthy.
    KeyTruthy(String),
    /// Admit records the predicate accepts.
    Predicate(Predicate),
}

impl RecordFilter {
    /// Classify a string filter. Empty strings mean no filter.
    pub fn from_spec(spec: &str) -> Self {
        if spec.is_empty() {
            Self::NoFilter
        } else if key_path::is_path_syntax(spec) {
            Self::KeyExistencePath(KeyPath::parse(spec))
        } else {
            Self::KeyTruthy(spec.to_owned())
        }
    }

    /// Return `true` if `record` should be written.
    pub fn passes(&self, record: &LogRecord, sink: &dyn WarnSink) -> bool {
        if !is_object_shaped(record) {
            return false;
        }
        match self {
            Self::NoFilter => true,
            Self::KeyExistencePath(path) => path.exists_in(record),
            Self::KeyTruthy(key) => property(record, key).is_some_and(is_truthy),
            Self::Predicate(predicate) => match predicate.call(record) {
                Ok(verdict) => verdict,
                Err(err) => {
                    sink.warn("`filter` execution error", Some(&err));
                    false
                }
            },
        }
    }
}

impl From<Predicate> for RecordFilter {
    fn from(value: Predicate) -> Self {
        Self::Predicate(value)
    }
}
