//! Dotted property paths used by existence filters.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::log_record::property;

static BRACKET_INDEX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([A-Za-z0-9_]+)\]").expect("bracket index pattern is valid"));

/// Return `true` when `spec` should be read as a path rather than a flat key.
pub(crate) fn is_path_syntax(spec: &str) -> bool {
    spec.contains('.') || BRACKET_INDEX_RE.is_match(spec)
}

/// A property path such as `a.b` or `items[0].id`, split into segments.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyPath {
    segments: Vec<String>,
}

impl KeyPath {
    /// Parse `spec`, turning bracket indices into dotted segments and
    /// dropping one leading dot.
    pub fn parse(spec: &str) -> Self {
        let dotted = BRACKET_INDEX_RE.replace_all(spec, ".$1");
        let trimmed = dotted.strip_prefix('.').unwrap_or(&dotted);
        Self {
            segments: trimmed.split('.').map(str::to_owned).collect(),
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Walk `record` along the path.
    ///
    /// Intermediate segments must resolve to non-null values; the last one
    /// only has to be present, so `null`, `0` and `false` still resolve.
    pub fn resolve<'a>(&self, record: &'a Value) -> Option<&'a Value> {
        let (last, parents) = self.segments.split_last()?;
        let parent = parents.iter().try_fold(record, |acc, key| {
            property(acc, key).filter(|v| !v.is_null())
        })?;
        property(parent, last)
    }

    pub fn exists_in(&self, record: &Value) -> bool {
        self.resolve(record).is_some()
    }
}
