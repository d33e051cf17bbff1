//! Raw configuration block and configuration errors.
//!
//! The host hands over a loosely typed block; nothing is validated until the
//! block is resolved into a [`ResolvedConfig`](super::ResolvedConfig).

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use thiserror::Error;

use crate::filters::Predicate;

/// Key of the reporter section inside a whole host configuration.
pub const CONFIG_KEY: &str = "jsonToFileReporter";

/// Errors that prevent the reporter from being installed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// An option carried a value of the wrong type.
    #[error("`{option}` parameter should be {expected}")]
    InvalidType {
        /// Host-facing option name.
        option: &'static str,
        /// Human readable description of the accepted types.
        expected: &'static str,
    },
}

/// Value of the `filter` option.
#[derive(Clone, Debug)]
pub enum FilterOption {
    /// A value taken from a data configuration source.
    Value(Value),
    /// A predicate supplied by Rust code.
    Predicate(Predicate),
}

impl<'de> Deserialize<'de> for FilterOption {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer).map(Self::Value)
    }
}

/// Unvalidated reporter options as supplied by the host.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReporterConfigBlock {
    pub output_path: Option<Value>,
    pub file_name: Option<Value>,
    pub filter: Option<FilterOption>,
    pub overwrite: Option<Value>,
}

impl ReporterConfigBlock {
    /// Create an empty block; every option takes its default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Extract the reporter block from a whole host configuration object.
    ///
    /// A missing section yields an empty block.
    pub fn from_host_config(config: &Value) -> Result<Self, serde_json::Error> {
        match config.get(CONFIG_KEY) {
            Some(section) => Self::deserialize(section),
            None => Ok(Self::default()),
        }
    }

    /// Set the output directory.
    pub fn with_output_path(mut self, path: impl Into<String>) -> Self {
        self.output_path = Some(Value::String(path.into()));
        self
    }

    /// Set the file name template.
    pub fn with_file_name(mut self, pattern: impl Into<String>) -> Self {
        self.file_name = Some(Value::String(pattern.into()));
        self
    }

    /// Set a string filter.
    pub fn with_filter(mut self, spec: impl Into<String>) -> Self {
        self.filter = Some(FilterOption::Value(Value::String(spec.into())));
        self
    }

    /// Set a predicate filter.
    pub fn with_predicate(mut self, predicate: Predicate) -> Self {
        self.filter = Some(FilterOption::Predicate(predicate));
        self
    }

    /// Enable or disable removal of a stale file at start-up.
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = Some(Value::Bool(overwrite));
        self
    }
}
