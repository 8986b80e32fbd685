//! Lenient deserializers for manifest values.
//!
//! Manifest authors write YAML by hand, so a text field accepts any scalar
//! (`2024-05-01`, `42`, `true`) and list fields accept a single string.

use serde::de::{Deserialize, Deserializer, Error};
use serde_yaml::Value;

/// Optional text: any scalar, with null and blank strings mapped to `None`.
pub(crate) fn opt_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    scalar_text(value).map_err(D::Error::custom)
}

/// Optional text that may also be written as a list, joined with `", "`.
pub(crate) fn opt_joined<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Sequence(items) => {
            let parts = sequence_text(items).map_err(D::Error::custom)?;
            Ok((!parts.is_empty()).then(|| parts.join(", ")))
        }
        other => scalar_text(other).map_err(D::Error::custom),
    }
}

/// List of text: a single scalar becomes a one-element list, null an empty one.
pub(crate) fn list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Sequence(items) => sequence_text(items).map_err(D::Error::custom),
        other => scalar_text(other)
            .map(|text| text.into_iter().collect())
            .map_err(D::Error::custom),
    }
}

fn sequence_text(items: Vec<Value>) -> Result<Vec<String>, String> {
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        if let Some(text) = scalar_text(item)? {
            out.push(text);
        }
    }
    Ok(out)
}

fn scalar_text(value: Value) -> Result<Option<String>, String> {
    let text = match value {
        Value::Null => return Ok(None),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s,
        Value::Tagged(tagged) => return scalar_text(tagged.value),
        Value::Sequence(_) => return Err("expected a scalar value, found a list".to_owned()),
        Value::Mapping(_) => return Err("expected a scalar value, found a mapping".to_owned()),
    };
    Ok((!text.trim().is_empty()).then_some(text))
}
