//! Todo payload validation and list filtering rules.
//!
//! Request bodies arrive as raw JSON objects so the API can report unknown
//! field names before anything is deserialized into a typed DTO. The checks
//! here run in the order the handlers need them; none of them touch the store.

use std::collections::BTreeSet;

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

/// Entity name used in not-found errors.
pub const ENTITY: &str = "Todo";

/// Every column of the `todos` table. Payload keys outside this set are rejected.
pub const TODO_COLUMNS: [&str; 7] = [
    "id",
    "title",
    "description",
    "completed",
    "deadline_at",
    "created_at",
    "updated_at",
];

/// Naive date-time layouts accepted for `deadline_at`, interpreted as UTC.
const NAIVE_DEADLINE_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

// ---------------------------------------------------------------------------
// Payload validation
// ---------------------------------------------------------------------------

/// Request bodies must be JSON objects.
pub fn into_object(body: Value) -> Result<Map<String, Value>, CoreError> {
    match body {
        Value::Object(map) => Ok(map),
        _ => Err(CoreError::Validation(
            "request body must be a JSON object".to_string(),
        )),
    }
}

/// Collect payload keys that are not todo columns, sorted by name.
pub fn unknown_fields(payload: &Map<String, Value>) -> BTreeSet<&str> {
    payload
        .keys()
        .map(String::as_str)
        .filter(|key| !TODO_COLUMNS.contains(key))
        .collect()
}

/// Fail with a validation error listing every unknown key in the payload.
pub fn reject_unknown_fields(payload: &Map<String, Value>) -> Result<(), CoreError> {
    let unknown = unknown_fields(payload);
    if unknown.is_empty() {
        return Ok(());
    }
    let names: Vec<&str> = unknown.into_iter().collect();
    Err(CoreError::Validation(format!(
        "Unknown fields in the request: {}",
        names.join(", ")
    )))
}

/// A create payload must carry a non-empty string `title`.
pub fn require_title(payload: &Map<String, Value>) -> Result<(), CoreError> {
    match payload.get("title") {
        None | Some(Value::Null) => Err(CoreError::Validation(
            "title is required".to_string(),
        )),
        Some(value) => validate_title(value),
    }
}

/// When an update payload sets a non-nullable column it must set a usable value.
///
/// `title` must stay a non-empty string and `completed` cannot be cleared.
pub fn validate_patch(payload: &Map<String, Value>) -> Result<(), CoreError> {
    if let Some(title) = payload.get("title") {
        validate_title(title)?;
    }
    if let Some(Value::Null) = payload.get("completed") {
        return Err(CoreError::Validation(
            "completed cannot be null".to_string(),
        ));
    }
    Ok(())
}

fn validate_title(value: &Value) -> Result<(), CoreError> {
    match value.as_str() {
        Some(title) if !title.is_empty() => Ok(()),
        _ => Err(CoreError::Validation(
            "title must be a non-empty string".to_string(),
        )),
    }
}

/// The `id` of an existing todo is immutable.
///
/// A payload may repeat the path id (or send `null`); any other value is rejected.
pub fn check_id_unchanged(payload: &Map<String, Value>, id: DbId) -> Result<(), CoreError> {
    match payload.get("id") {
        None | Some(Value::Null) => Ok(()),
        Some(value) if same_id(value, id) => Ok(()),
        Some(value) => Err(CoreError::Validation(format!(
            "id is immutable: cannot change todo {id} to {value}"
        ))),
    }
}

/// JSON numbers compare by value, so `1.0` names the same todo as `1`.
fn same_id(value: &Value, id: DbId) -> bool {
    if let Some(n) = value.as_i64() {
        return n == id;
    }
    value
        .as_f64()
        .is_some_and(|n| n.fract() == 0.0 && n == id as f64)
}

// ---------------------------------------------------------------------------
// Deadlines
// ---------------------------------------------------------------------------

/// Parse an ISO-8601 `deadline_at` value.
///
/// Accepts RFC 3339 timestamps with an offset, naive date-times (treated as
/// UTC) and plain dates (midnight UTC).
pub fn parse_deadline(raw: &str) -> Result<Timestamp, CoreError> {
    let raw = raw.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }

    for format in NAIVE_DEADLINE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(naive.and_utc());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN).and_utc());
    }

    Err(CoreError::Validation(format!(
        "deadline_at must be an ISO-8601 timestamp, got '{raw}'"
    )))
}

/// Serde adapter for an optional `deadline_at` string.
pub fn deserialize_deadline<'de, D>(deserializer: D) -> Result<Option<Timestamp>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)?
        .map(|raw| parse_deadline(&raw).map_err(serde::de::Error::custom))
        .transpose()
}

/// Serde adapter for a `deadline_at` patch field, see [`crate::nullable`].
pub fn deserialize_deadline_patch<'de, D>(
    deserializer: D,
) -> Result<Option<Option<Timestamp>>, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_deadline(deserializer).map(Some)
}

// ---------------------------------------------------------------------------
// List filtering
// ---------------------------------------------------------------------------

/// Resolved filters for listing todos.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TodoFilter {
    /// `Some(true)` restricts the listing to completed todos.
    pub completed: Option<bool>,
    /// Only todos with `deadline_at <= cutoff` are returned.
    pub deadline_cutoff: Option<Timestamp>,
}

impl TodoFilter {
    /// Build a filter from the raw `completed` query value and the `window` in days.
    pub fn from_query(completed: Option<&str>, window_days: u64, now: Timestamp) -> Self {
        Self {
            completed: completed_only(completed),
            deadline_cutoff: deadline_cutoff(now, window_days),
        }
    }
}

/// Only a case-insensitive `"true"` enables the completed filter.
pub fn completed_only(raw: Option<&str>) -> Option<bool> {
    raw.filter(|value| value.eq_ignore_ascii_case("true"))
        .map(|_| true)
}

/// Cutoff `now + window_days`. A zero window disables the deadline filter.
///
/// Cutoffs past the representable range clamp to the maximum timestamp.
pub fn deadline_cutoff(now: Timestamp, window_days: u64) -> Option<Timestamp> {
    if window_days == 0 {
        return None;
    }
    let cutoff = i64::try_from(window_days)
        .ok()
        .and_then(Duration::try_days)
        .and_then(|window| now.checked_add_signed(window))
        .unwrap_or(DateTime::<Utc>::MAX_UTC);
    Some(cutoff)
}
