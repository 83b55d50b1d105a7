//! Serde helper functions for request deserialization.
//!
//! These functions handle the quirks of HTML form and loosely-typed JSON
//! submissions: empty strings are treated as `None`, and list fields accept
//! either an array or a newline-separated block of text.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};

/// Deserialize an optional string, treating empty strings as None.
pub fn deserialize_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    Ok(s.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()))
}

/// Deserialize an optional NaiveDate, treating empty strings as None.
/// Expects format: YYYY-MM-DD
pub fn deserialize_optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if !s.trim().is_empty() => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(Some)
            .map_err(serde::de::Error::custom),
        _ => Ok(None),
    }
}

/// Deserialize a field that may be cleared.
///
/// Only called for keys present in the input (pair it with
/// `#[serde(default)]`): `null` and empty strings become `Some(None)`, so an
/// absent key (`None`) stays distinguishable from an explicit clear.
pub fn deserialize_clearable_string<'de, D>(
    deserializer: D,
) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_optional_string(deserializer).map(Some)
}

/// Date counterpart of [`deserialize_clearable_string`].
pub fn deserialize_clearable_date<'de, D>(
    deserializer: D,
) -> Result<Option<Option<NaiveDate>>, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_optional_date(deserializer).map(Some)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ListInput {
    Items(Vec<String>),
    Text(String),
}

/// Deserialize an optional list of strings.
///
/// Accepts a JSON array or a single string with one item per line. Items are
/// trimmed and blank items dropped; order is preserved.
pub fn deserialize_optional_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let input: Option<ListInput> = Option::deserialize(deserializer)?;
    let items = match input {
        None => return Ok(None),
        Some(ListInput::Items(items)) => items,
        Some(ListInput::Text(text)) => text.lines().map(str::to_string).collect(),
    };

    Ok(Some(
        items
            .into_iter()
            .map(|item| item.trim().to_string())
            .filter(|item| !item.is_empty())
            .collect(),
    ))
}
