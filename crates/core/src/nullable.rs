//! Serde support for `Option<Option<T>>` patch fields.
//!
//! By default serde collapses a missing field and an explicit `null` into the
//! same `None`. Partial updates need to tell them apart:
//!
//! | JSON                | Value              |
//! |---------------------|--------------------|
//! | field absent        | `None`             |
//! | `"field": null`     | `Some(None)`       |
//! | `"field": value`    | `Some(Some(value))`|
//!
//! Use together with `#[serde(default)]` so the absent case still produces `None`:
//!
//! ```ignore
//! #[serde(default, deserialize_with = "todo_core::nullable::deserialize")]
//! pub description: Option<Option<String>>,
//! ```

use serde::{Deserialize, Deserializer};

/// Deserialize a present field into `Some(inner)`, where `inner` is `None` for `null`.
pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "super::deserialize")]
        note: Option<Option<String>>,
    }

    #[test]
    fn absent_field_is_none() {
        let patch: Patch = serde_json::from_str("{}").unwrap();
        assert_eq!(patch.note, None);
    }

    #[test]
    fn explicit_null_is_some_none() {
        let patch: Patch = serde_json::from_str(r#"{"note": null}"#).unwrap();
        assert_eq!(patch.note, Some(None));
    }

    #[test]
    fn value_is_some_some() {
        let patch: Patch = serde_json::from_str(r#"{"note": "hi"}"#).unwrap();
        assert_eq!(patch.note, Some(Some("hi".to_string())));
    }

    #[test]
    fn wrong_type_is_rejected() {
        assert!(serde_json::from_str::<Patch>(r#"{"note": 3}"#).is_err());
    }
}
