//! Read-modify-write persistence of records as a JSON array file.
//!
//! Every append reads the whole file, checks that it holds an array, pushes
//! the record and rewrites the file as pretty-printed JSON. A file that
//! exists but does not hold an array is never touched.
//!
//! There is no file locking. Two processes appending to the same path can
//! lose records; one reporter instance per output file is assumed.

use std::{
    fs::{self, OpenOptions},
    io::{self, Read},
    path::{Path, PathBuf},
};

use serde_json::Value;
use thiserror::Error;

use crate::log_record::{LogRecord, is_truthy, parse_relaxed};

/// Errors that abort a single append. The file is left as it was.
#[derive(Debug, Error)]
pub enum AppendError {
    /// Opening or reading the existing file failed.
    #[error("can not read file {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The existing content is not valid JSON5.
    #[error("can not parse json file {} to append new data", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: json5::Error,
    },
    /// The existing content parsed but is not an array.
    #[error("can not parse json file {} to append new data: not an array", path.display())]
    NotAnArray { path: PathBuf },
    /// Serialising the updated array failed.
    #[error("can not serialise records for {}", path.display())]
    Serialise {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// Writing the updated array failed.
    #[error("can not write file {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl AppendError {
    /// Path of the file the failed append targeted.
    pub fn path(&self) -> &Path {
        match self {
            Self::Read { path, .. }
            | Self::Parse { path, .. }
            | Self::NotAnArray { path }
            | Self::Serialise { path, .. }
            | Self::Write { path, .. } => path,
        }
    }
}

/// Appends records to JSON array files.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonArrayStore;

impl JsonArrayStore {
    pub fn new() -> Self {
        Self
    }

    /// Append `record` to the array stored at `path`, returning the new
    /// number of records in the file.
    pub fn append(&self, record: LogRecord, path: &Path) -> Result<usize, AppendError> {
        self.append_with(record, path, |path, text| fs::write(path, text))
    }

    fn append_with(
        &self,
        record: LogRecord,
        path: &Path,
        write: impl FnOnce(&Path, String) -> io::Result<()>,
    ) -> Result<usize, AppendError> {
        let mut records = read_existing(path)?;
        records.push(record);
        let count = records.len();
        let text =
            serde_json::to_string_pretty(&Value::Array(records)).map_err(|source| {
                AppendError::Serialise {
                    path: path.to_path_buf(),
                    source,
                }
            })?;
        write(path, text).map_err(|source| AppendError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(count)
    }
}

/// Load the records already stored at `path`, creating the file if absent.
fn read_existing(path: &Path) -> Result<Vec<Value>, AppendError> {
    let read_err = |source: io::Error| AppendError::Read {
        path: path.to_path_buf(),
        source,
    };
    #[expect(
        clippy::ineffective_open_options,
        reason = "Be explicit about write intent alongside append"
    )]
    let mut file = OpenOptions::new()
        .read(true)
        .write(true)
        .append(true)
        .create(true)
        .open(path)
        .map_err(read_err)?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes).map_err(read_err)?;
    if bytes.is_empty() {
        return Ok(Vec::new());
    }
    let text = String::from_utf8_lossy(&bytes);
    let existing = parse_relaxed(&text).map_err(|source| AppendError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    match existing {
        Value::Array(items) => Ok(items),
        other if !is_truthy(&other) => Ok(Vec::new()),
        _ => Err(AppendError::NotAnArray {
            path: path.to_path_buf(),
        }),
    }
}
