//! Record representation for captured browser log messages.
//!
//! A record is any JSON value derived from one console message. Only
//! object-shaped values (objects and arrays) are ever admitted to a log
//! file; the helpers here implement the lookups and truthiness rules the
//! filters rely on, plus the relaxed parser shared by intake and the
//! append store.

use serde_json::Value;

/// One structured log entry derived from a single intercepted message.
pub type LogRecord = Value;

/// Return `true` when `value` can hold properties.
pub fn is_object_shaped(value: &Value) -> bool {
    matches!(value, Value::Object(_) | Value::Array(_))
}

/// Truthiness of a JSON value.
///
/// `null`, `false`, `0` and `""` are falsy. Objects and arrays are always
/// truthy, even when empty.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Look up a single property of `value`.
///
/// Objects are indexed by key, arrays by decimal position. Any other value
/// has no properties.
pub fn property<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    match value {
        Value::Object(map) => map.get(key),
        Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    }
}

/// Parse JSON or JSON5 text.
///
/// Strict JSON is tried first. JSON5 input whose numbers fall outside the
/// `i64` range is retried with those literals widened: integers become
/// floats and literals that overflow a float become `null`. The error
/// returned is the one from the unmodified JSON5 attempt.
pub fn parse_relaxed(text: &str) -> Result<Value, json5::Error> {
    if let Ok(value) = serde_json::from_str(text) {
        return Ok(value);
    }
    match json5::from_str(text) {
        Ok(value) => Ok(value),
        Err(err) => match widen_numbers(text) {
            Some(widened) => json5::from_str(&widened).map_err(|_| err),
            None => Err(err),
        },
    }
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$' || !b.is_ascii()
}

/// Rewrite numeric literals that `json5` cannot represent. Returns `None`
/// when nothing needed rewriting.
fn widen_numbers(text: &str) -> Option<String> {
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len());
    let mut copied = 0;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            quote @ (b'"' | b'\'') => {
                i += 1;
                while i < bytes.len() && bytes[i] != quote {
                    i += if bytes[i] == b'\\' { 2 } else { 1 };
                }
                i += 1;
            }
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                i = text[i..].find('\n').map_or(bytes.len(), |n| i + n);
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                i = text[i + 2..].find("*/").map_or(bytes.len(), |n| i + n + 4);
            }
            b if is_ident_byte(b) && !b.is_ascii_digit() => {
                while i < bytes.len() && is_ident_byte(bytes[i]) {
                    i += 1;
                }
            }
            b'-' | b'+' | b'.' | b'0'..=b'9' => {
                let end = scan_number(bytes, i);
                if end < bytes.len() && is_ident_byte(bytes[end]) {
                    // hex literal or something json5 will reject anyway
                    i = end;
                    while i < bytes.len() && is_ident_byte(bytes[i]) {
                        i += 1;
                    }
                    continue;
                }
                if let Some(replacement) = widen_literal(&text[i..end]) {
                    out.push_str(&text[copied..i]);
                    out.push_str(&replacement);
                    copied = end;
                }
                i = end.max(i + 1);
            }
            _ => i += 1,
        }
    }
    if copied == 0 {
        return None;
    }
    out.push_str(&text[copied..]);
    Some(out)
}

/// End of the numeric literal starting at `start`.
fn scan_number(bytes: &[u8], start: usize) -> usize {
    let digits = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };
    let mut i = start;
    if matches!(bytes[i], b'-' | b'+') {
        i += 1;
    }
    let int_end = digits(i);
    let mut end = int_end;
    if bytes.get(end) == Some(&b'.') {
        end = digits(end + 1);
    }
    if end == i || (end == i + 1 && bytes[i] == b'.') {
        return start;
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'-' | b'+')) {
            exp += 1;
        }
        let exp_end = digits(exp);
        if exp_end > exp {
            end = exp_end;
        }
    }
    end
}

fn widen_literal(literal: &str) -> Option<String> {
    if literal.is_empty() {
        return None;
    }
    let as_float = literal.parse::<f64>().ok()?;
    if as_float.is_infinite() {
        return Some("null".to_owned());
    }
    let is_integer = !literal.contains(['.', 'e', 'E']);
    (is_integer && literal.parse::<i64>().is_err()).then(|| format!("{literal}.0"))
}
