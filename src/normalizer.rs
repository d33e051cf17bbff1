//! Turn raw console payloads into structured records.
//!
//! Browsers hand over console output either as already structured values or
//! as text. Text is cleaned of two common artifacts (wrapping quotes and a
//! Chrome-style `Object{` prefix) and then parsed as JSON5, which accepts
//! unquoted keys, trailing commas and comments. Anything that does not yield
//! a truthy value is dropped; garbage on the console is expected traffic.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::log_record::{LogRecord, is_truthy, parse_relaxed};

const OBJECT_PREFIX: &str = "Object{";

static OBJECT_PREFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)Object\{").expect("object prefix pattern is valid"));

/// A console payload as delivered by the host.
#[derive(Clone, Debug, PartialEq)]
pub enum RawMessage {
    /// Nothing was logged.
    Absent,
    /// Textual console output.
    Text(String),
    /// An already structured object or array.
    Structured(Value),
    /// Any other scalar payload (numbers, booleans).
    Other(Value),
}

impl From<&str> for RawMessage {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for RawMessage {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Value> for RawMessage {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Absent,
            Value::String(s) => Self::Text(s),
            Value::Object(_) | Value::Array(_) => Self::Structured(value),
            other => Self::Other(other),
        }
    }
}

impl<T: Into<RawMessage>> From<Option<T>> for RawMessage {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Absent, Into::into)
    }
}

/// Normalise `raw` into a record, or `None` when it carries nothing usable.
pub fn normalize(raw: RawMessage) -> Option<LogRecord> {
    match raw {
        RawMessage::Structured(value) => Some(value),
        RawMessage::Text(text) => parse_text(&text),
        RawMessage::Absent | RawMessage::Other(_) => None,
    }
}

fn parse_text(text: &str) -> Option<LogRecord> {
    if text.is_empty() {
        return None;
    }
    let unquoted = strip_wrapping_quotes(text);
    let cleaned = if unquoted.starts_with(OBJECT_PREFIX) {
        OBJECT_PREFIX_RE.replace_all(unquoted, "{")
    } else {
        unquoted.into()
    };
    match parse_relaxed(&cleaned) {
        Ok(value) if is_truthy(&value) => Some(value),
        Ok(_) => None,
        Err(err) => {
            log::debug!(
                target: crate::warn_sink::LOG_TARGET,
                "dropping unparsable console message: {err}"
            );
            None
        }
    }
}

/// Remove one pair of matching `'` or `"` around `text`.
fn strip_wrapping_quotes(text: &str) -> &str {
    for quote in ['\'', '"'] {
        if text.len() >= 2 && text.starts_with(quote) && text.ends_with(quote) {
            return &text[1..text.len() - 1];
        }
    }
    text
}
