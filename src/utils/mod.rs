// Utility functions and helpers

use serde::{Deserialize, Deserializer};

/// Deserialize a field that distinguishes "absent" from "explicit null".
///
/// Use together with `#[serde(default)]`:
/// - field omitted -> `None`
/// - field `null` -> `Some(None)`
/// - field present -> `Some(Some(value))`
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Apply a partial-update value to an optional field.
pub fn apply_patch<T>(slot: &mut Option<T>, patch: Option<Option<T>>) {
    if let Some(value) = patch {
        *slot = value;
    }
}

/// Trim surrounding whitespace, keeping the allocation when nothing changes.
pub fn trimmed(value: String) -> String {
    let trimmed = value.trim();
    if trimmed.len() == value.len() {
        value
    } else {
        trimmed.to_string()
    }
}

/// Trim an optional text field.
pub fn trimmed_opt(value: Option<String>) -> Option<String> {
    value.map(trimmed)
}

/// Trim a required text field, returning `None` when nothing is left.
pub fn required_text(value: Option<String>) -> Option<String> {
    value.map(trimmed).filter(|s| !s.is_empty())
}
