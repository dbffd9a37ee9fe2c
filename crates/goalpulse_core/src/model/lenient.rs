//! Lenient serde helpers for goal snapshots.
//!
//! Upstream records are known to carry `null`, missing, or wrong-shape nested
//! collections. These helpers absorb that at the deserialization boundary so
//! traversal code only ever sees well-formed vectors.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Deserializes a nested collection, treating anything but an array as empty.
///
/// Array elements that are not objects, or that fail to decode, are dropped.
pub(crate) fn collection<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let Some(Value::Array(items)) = value else {
        return Ok(Vec::new());
    };

    Ok(items
        .into_iter()
        .filter(Value::is_object)
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect())
}

/// Deserializes an identifier that may arrive as a string or a number.
pub(crate) fn identifier<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(raw)) => raw,
        Some(Value::Number(raw)) => raw.to_string(),
        _ => String::new(),
    })
}

/// Deserializes free text, mapping `null` and non-strings to empty.
pub(crate) fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(raw)) => raw,
        _ => String::new(),
    })
}

/// Deserializes an optional timestamp string; non-strings become `None`.
pub(crate) fn timestamp<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(raw)) if !raw.trim().is_empty() => Some(raw),
        _ => None,
    })
}

/// Deserializes a non-negative counter; anything else becomes `None`.
pub(crate) fn counter<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(Value::as_u64))
}
