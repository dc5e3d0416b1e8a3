//! Forgiving field decoders for records written by other clients.
//!
//! Account metadata and stored records are not under our control; a field we
//! cannot read falls back to its default instead of failing the whole record.

use super::user::PhysicalInfo;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Unknown, empty or mistyped values decode as `None`.
///
/// Used for enum-like fields such as the role or the stored preferences,
/// where `""` or a value from a newer client must not reject the record.
pub fn optional<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

/// Like [`optional`], with `T::default()` for anything unreadable.
pub fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    Ok(optional(deserializer)?.unwrap_or_default())
}

/// Anything but a JSON string decodes as `None`.
pub fn string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Ok(Some(s)),
        _ => Ok(None),
    }
}

/// Like [`string`], with `""` for anything unreadable.
pub fn string_or_default<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(string(deserializer)?.unwrap_or_default())
}

/// A questionnaire that does not match the current shape is dropped.
pub fn physical_info<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<PhysicalInfo>, D::Error> {
    let Some(value) = Option::<Value>::deserialize(deserializer)? else {
        return Ok(None);
    };
    match serde_json::from_value(value) {
        Ok(info) => Ok(Some(info)),
        Err(e) => {
            tracing::warn!(error = %e, "Ignoring unreadable physical info");
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Theme, UserRole};

    #[derive(Debug, Deserialize)]
    struct Fields {
        #[serde(default, deserialize_with = "optional")]
        role: Option<UserRole>,
        #[serde(default, deserialize_with = "optional")]
        theme: Option<Theme>,
        #[serde(default, deserialize_with = "string")]
        name: Option<String>,
        #[serde(default, deserialize_with = "physical_info")]
        info: Option<PhysicalInfo>,
    }

    fn parse(json: &str) -> Fields {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_unreadable_role_is_none() {
        assert_eq!(parse(r#"{"role":""}"#).role, None);
        assert_eq!(parse(r#"{"role":"admin"}"#).role, None);
        assert_eq!(parse(r#"{"role":7}"#).role, None);
        assert_eq!(parse(r#"{"role":null}"#).role, None);
        assert_eq!(
            parse(r#"{"role":"professional"}"#).role,
            Some(UserRole::Professional)
        );
    }

    #[test]
    fn test_unknown_theme_is_none() {
        assert_eq!(parse(r#"{"theme":"sepia"}"#).theme, None);
        assert_eq!(parse(r#"{"theme":"dark"}"#).theme, Some(Theme::Dark));
    }

    #[test]
    fn test_non_string_name_is_none() {
        assert_eq!(parse(r#"{"name":42}"#).name, None);
        assert_eq!(parse(r#"{"name":"Ana"}"#).name.as_deref(), Some("Ana"));
        assert_eq!(parse("{}").name, None);
    }

    #[test]
    fn test_bad_physical_info_is_dropped() {
        assert!(parse(r#"{"info":{"goals":["fly"]}}"#).info.is_none());
        assert!(parse(r#"{"info":"tall"}"#).info.is_none());
        let info = parse(r#"{"info":{"age":30.5}}"#).info.unwrap();
        assert_eq!(info.age, Some(30.5));
    }
}
