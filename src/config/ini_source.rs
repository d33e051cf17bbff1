//! Load the reporter block from an INI file.
//!
//! The `[jsonToFileReporter]` section maps onto [`ReporterConfigBlock`].
//! Files are decoded with the given encoding label (UTF-8 when none is
//! given) before `rust-ini` parses them.

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use encoding_rs::Encoding;
use ini::Ini;
use serde_json::Value;
use thiserror::Error;

use super::types::{CONFIG_KEY, FilterOption, ReporterConfigBlock};

/// Errors raised while loading an INI configuration file.
#[derive(Debug, Error)]
pub enum IniSourceError {
    #[error("{} doesn't exist", .0.display())]
    NotFound(PathBuf),
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{} is an empty file", .0.display())]
    Empty(PathBuf),
    #[error("unknown encoding {0}")]
    UnknownEncoding(String),
    #[error("{} is not valid {encoding}", path.display())]
    Decode {
        path: PathBuf,
        encoding: &'static str,
    },
    #[error("{} is invalid: {message}", path.display())]
    Parse { path: PathBuf, message: String },
}

/// Read `path` and build a block from its reporter section.
///
/// A file without the section yields an empty block.
pub fn load_ini_block(
    path: impl AsRef<Path>,
    encoding: Option<&str>,
) -> Result<ReporterConfigBlock, IniSourceError> {
    let path = path.as_ref();
    let bytes = read_file_bytes(path)?;
    if bytes.is_empty() {
        return Err(IniSourceError::Empty(path.to_path_buf()));
    }
    let text = decode_contents(path, &bytes, encoding)?;
    parse_block(path, &text)
}

fn read_file_bytes(path: &Path) -> Result<Vec<u8>, IniSourceError> {
    fs::read(path).map_err(|err| match err.kind() {
        ErrorKind::NotFound => IniSourceError::NotFound(path.to_path_buf()),
        _ => IniSourceError::Io {
            path: path.to_path_buf(),
            source: err,
        },
    })
}

fn decode_contents(
    path: &Path,
    bytes: &[u8],
    encoding: Option<&str>,
) -> Result<String, IniSourceError> {
    let encoding = match encoding {
        Some(label) => {
            let normalized_label = label.trim().to_ascii_lowercase();
            Encoding::for_label(normalized_label.as_bytes())
                .ok_or_else(|| IniSourceError::UnknownEncoding(label.to_owned()))?
        }
        None => encoding_rs::UTF_8,
    };
    let (decoded, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        return Err(IniSourceError::Decode {
            path: path.to_path_buf(),
            encoding: encoding.name(),
        });
    }
    Ok(decoded.into_owned())
}

fn parse_block(path: &Path, text: &str) -> Result<ReporterConfigBlock, IniSourceError> {
    let ini = Ini::load_from_str(text).map_err(|err| IniSourceError::Parse {
        path: path.to_path_buf(),
        message: err.to_string(),
    })?;
    let Some(section) = ini.section(Some(CONFIG_KEY)) else {
        return Ok(ReporterConfigBlock::default());
    };
    let string_value = |key: &str| section.get(key).map(|v| Value::String(v.to_owned()));
    Ok(ReporterConfigBlock {
        output_path: string_value("outputPath"),
        file_name: string_value("fileName"),
        filter: string_value("filter").map(FilterOption::Value),
        overwrite: section.get("overwrite").map(parse_flag),
    })
}

fn parse_flag(raw: &str) -> Value {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => Value::String(raw.to_owned()),
    }
}
