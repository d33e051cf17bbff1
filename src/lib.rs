//! Capture browser console output as structured JSON records.
//!
//! Messages intercepted from browsers under test are normalised into
//! records, filtered, and appended to a JSON array file whose name is built
//! from a template. See [`JsonFileReporter`] for the entry point.

pub mod config;
pub mod file_naming;
pub mod filters;
pub mod log_record;
pub mod normalizer;
pub mod reporter;
pub mod store;
pub mod warn_sink;

#[cfg(test)]
mod test_utils;

pub use config::{
    ConfigError, FilterOption, IniSourceError, ReporterConfigBlock, ResolvedConfig,
    load_ini_block,
};
pub use file_naming::{DEFAULT_FILE_NAME, FileNamer};
pub use filters::{KeyPath, Predicate, PredicateError, RecordFilter};
pub use log_record::LogRecord;
pub use normalizer::{RawMessage, normalize};
pub use reporter::{IntakeOutcome, JsonFileReporter, REPORTER_NAME, SharedReporter};
pub use store::{AppendError, JsonArrayStore};
#[cfg(feature = "tracing-compat")]
pub use warn_sink::TracingWarnSink;
pub use warn_sink::{LogWarnSink, WarnSink};
