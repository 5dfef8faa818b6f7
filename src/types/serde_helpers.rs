//! Custom serde deserializers for flexible type handling
//!
//! The site is loose about JSON types: the same field arrives as a number on
//! one day and as a string on another.

use serde::{Deserialize, Deserializer};

/// Deserialize a display value that can be:
/// - String: used as-is (trimmed)
/// - Integer or float: rendered with `to_string`
/// - Boolean: rendered as `true`/`false`
/// - `null` or missing: `None`
///
/// Arrays and objects are rejected.
pub fn deserialize_display_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Display {
        String(String),
        Int(i64),
        Float(f64),
        Bool(bool),
    }

    let value: Option<Display> = Option::deserialize(deserializer)?;

    Ok(value.map(|value| match value {
        Display::String(s) => s.trim().to_string(),
        Display::Int(i) => i.to_string(),
        Display::Float(f) => f.to_string(),
        Display::Bool(b) => b.to_string(),
    }))
}

/// Deserialize any JSON value into text:
/// - String: used as-is
/// - Anything else: its JSON rendering (`1`, `true`, `["a"]`)
/// - `null` or missing: `None`
///
/// Never fails on a type mismatch.
pub fn deserialize_lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<serde_json::Value> = Option::deserialize(deserializer)?;

    Ok(value.map(|value| match value {
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    }))
}
