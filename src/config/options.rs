//! Raw option bags and the lookup strategies used to resolve them.
//!
//! Two lookup rules coexist:
//!
//! - [`supplied`]: a key counts as set whenever it is present and non-null. `0`, `false` and `""`
//!   are kept as given.
//! - [`first_truthy`]: the first candidate key holding a *truthy* value wins. `0`, `false`, `""`
//!   and `null` all count as unset, so `{"width": 0, "w": 999}` resolves to `999`. Aliased keys
//!   (`width`/`w`, `cacheDir`/`temp`, ...) and the frame-rate keys use this rule.

use serde::de::DeserializeOwned;
use serde_json::Value;

/// Untyped option bag supplied by the caller.
pub type RawOptions = serde_json::Map<String, Value>;

/// Canonical key of the generated job id.
pub const JOB_ID: &str = "jobId";

/// Virtual key computed as `cacheDir` joined with `jobId`.
pub const DETAILED_CACHE_DIR: &str = "detailedCacheDir";

/// Every canonical option key held by an effective configuration, `jobId` included.
pub const RECOGNIZED_KEYS: &[&str] = &[
    JOB_ID,
    "crf",
    "vb",
    "queue",
    "ext",
    "threads",
    "preset",
    "vprofile",
    "debug",
    "audioLoop",
    "upStreaming",
    "cacheFormat",
    "hasTransition",
    "defaultOutputOptions",
    "fps",
    "rfps",
    "width",
    "height",
    "outputDir",
    "cacheDir",
    "output",
];

/// Return `true` when `key` is a canonical option key (including the virtual
/// `detailedCacheDir`).
pub fn is_recognized(key: &str) -> bool {
    key == DETAILED_CACHE_DIR || RECOGNIZED_KEYS.contains(&key)
}

/// Truthiness of a raw value as seen by option bags coming from JSON/JS callers.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Value of `key` when present and non-null.
pub fn supplied<'a>(raw: &'a RawOptions, key: &str) -> Option<&'a Value> {
    raw.get(key).filter(|v| !v.is_null())
}

/// First truthy value among `keys`, in order.
pub fn first_truthy<'a>(raw: &'a RawOptions, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|k| raw.get(*k))
        .find(|v| is_truthy(v))
}

/// Render a value the way it reads on a command line: strings as-is, numbers without a
/// trailing `.0`.
pub(crate) fn plain_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => match n.as_i64() {
            Some(i) => i.to_string(),
            None => n.as_f64().map_or_else(|| n.to_string(), |f| f.to_string()),
        },
        other => other.to_string(),
    }
}

/// Result of looking up one canonical key.
#[derive(Debug, PartialEq)]
pub(crate) enum Lookup<T> {
    /// Nothing usable was supplied; the default applies.
    Absent,
    /// The supplied value fits the field type.
    Typed(T),
    /// The supplied value has another JSON type and is kept as given.
    Verbatim(Value),
}

/// Decode a looked-up value into the field type of `key`.
///
/// Values of another JSON type are never dropped: they come back as [`Lookup::Verbatim`] so the
/// configuration can hand them out unchanged.
pub(crate) fn decode<T: DeserializeOwned>(key: &str, value: Option<&Value>) -> Lookup<T> {
    let Some(value) = value else {
        return Lookup::Absent;
    };
    match T::deserialize(value) {
        Ok(v) => Lookup::Typed(v),
        Err(e) => {
            tracing::debug!(key, %value, error = %e, "keeping option with unexpected type verbatim");
            Lookup::Verbatim(value.clone())
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/options.rs"]
mod tests;
