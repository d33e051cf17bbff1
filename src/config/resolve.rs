//! Validation of a raw configuration block.

use std::path::PathBuf;

use serde_json::Value;

use super::types::{ConfigError, FilterOption, ReporterConfigBlock};
use crate::{file_naming::DEFAULT_FILE_NAME, filters::RecordFilter, log_record::is_truthy};

/// Validated, immutable reporter configuration.
#[derive(Clone, Debug)]
pub struct ResolvedConfig {
    pub output_path: PathBuf,
    pub file_name: String,
    pub filter: RecordFilter,
    pub overwrite: bool,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            output_path: PathBuf::new(),
            file_name: DEFAULT_FILE_NAME.to_owned(),
            filter: RecordFilter::NoFilter,
            overwrite: false,
        }
    }
}

impl ResolvedConfig {
    /// Validate `block`.
    ///
    /// Falsy values fall back to defaults. `overwrite` is only enabled by a
    /// literal `true`.
    pub fn resolve(block: &ReporterConfigBlock) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let output_path = string_option(block.output_path.as_ref(), "outputPath")?
            .map_or(defaults.output_path, PathBuf::from);
        let file_name =
            string_option(block.file_name.as_ref(), "fileName")?.unwrap_or(defaults.file_name);
        let filter = match &block.filter {
            None => RecordFilter::NoFilter,
            Some(FilterOption::Predicate(p)) => RecordFilter::Predicate(p.clone()),
            Some(FilterOption::Value(v)) if !is_truthy(v) => RecordFilter::NoFilter,
            Some(FilterOption::Value(Value::String(spec))) => RecordFilter::from_spec(spec),
            Some(FilterOption::Value(_)) => {
                return Err(ConfigError::InvalidType {
                    option: "filter",
                    expected: "string or function",
                });
            }
        };
        let overwrite = matches!(block.overwrite, Some(Value::Bool(true)));
        Ok(Self {
            output_path,
            file_name,
            filter,
            overwrite,
        })
    }
}

fn string_option(value: Option<&Value>, option: &'static str) -> Result<Option<String>, ConfigError> {
    match value {
        None => Ok(None),
        Some(v) if !is_truthy(v) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(ConfigError::InvalidType {
            option,
            expected: "string",
        }),
    }
}
