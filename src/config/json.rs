//! JSON encoding of [`Config`]
//!
//! Writes camelCase. Reads are lenient: object keys are matched against the
//! schema's field names case-insensitively (so legacy PascalCase files load),
//! missing fields take their defaults and unknown fields are dropped.

use serde_json::{Map, Value};

use crate::core::Config;

/// Every field name in the config schema, as written.
const FIELD_NAMES: &[&str] = &[
    // Config
    "profiles",
    "defaultProfile",
    "cursorDetection",
    "window",
    "playback",
    // Profile
    "name",
    "processFilter",
    "bindings",
    // Binding
    "inputType",
    "key",
    "modifiers",
    "action",
    "enabled",
    // CursorDetectionSettings
    "processWhitelist",
    "intervalMs",
    "debugLog",
    "overrideKey",
    // WindowSettings
    "opacity",
    "opacityStep",
    "minOpacity",
    "clickThroughOpacity",
    // PlaybackSettings
    "seekSeconds",
    "rateStep",
    "minRate",
    "maxRate",
];

/// Canonical spelling for a key, if it names a schema field.
fn canonical_key(key: &str) -> Option<&'static str> {
    FIELD_NAMES
        .iter()
        .copied()
        .find(|name| name.eq_ignore_ascii_case(key))
}

/// Rewrites every object key to its canonical spelling, recursively.
///
/// Keys that match no schema field are left as they are; serde ignores them.
/// When two keys collapse to the same field the later one wins.
pub fn normalize_keys(value: &mut Value) {
    match value {
        Value::Object(map) => {
            let entries = std::mem::take(map);
            let mut normalized = Map::with_capacity(entries.len());
            for (key, mut child) in entries {
                normalize_keys(&mut child);
                let key = canonical_key(&key).map(str::to_string).unwrap_or(key);
                normalized.insert(key, child);
            }
            *map = normalized;
        }
        Value::Array(items) => items.iter_mut().for_each(normalize_keys),
        _ => {}
    }
}

/// Parses a config document.
///
/// # Errors
///
/// Returns the JSON error for malformed input or values of the wrong type.
pub fn from_str(content: &str) -> Result<Config, serde_json::Error> {
    let mut value: Value = serde_json::from_str(content)?;
    normalize_keys(&mut value);
    serde_json::from_value(value)
}

/// Pretty-prints a config document with a trailing newline.
pub fn to_string_pretty(config: &Config) -> Result<String, serde_json::Error> {
    let mut content = serde_json::to_string_pretty(config)?;
    content.push('\n');
    Ok(content)
}
