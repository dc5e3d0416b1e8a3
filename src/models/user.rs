//! User model for the session store, the local slot, and the profile table.

use super::lenient;
use super::preferences::{Appearance, FontSize, Theme};
use serde::{Deserialize, Serialize};

/// Account role, fixed at registration.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    User,
    Professional,
}

/// Fitness goals selectable at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum UserGoal {
    LoseWeight,
    GainMuscle,
    ImproveHealth,
    IncreaseFlexibility,
}

/// Optional physical and health questionnaire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhysicalInfo {
    /// Weight in kg
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    /// Height in cm
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub goals: Vec<UserGoal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_medical_conditions: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medical_conditions_details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub takes_medication: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medication_details: Option<String>,
}

/// The logged-in user as held by the session store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Identifier issued by the auth service
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub physical_info: Option<PhysicalInfo>,
    pub theme: Theme,
    pub font_size: FontSize,
    pub high_contrast: bool,
}

impl User {
    /// Build a freshly authenticated user with default preferences.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
        role: UserRole,
        physical_info: Option<PhysicalInfo>,
    ) -> Self {
        let appearance = Appearance::default();
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            role,
            physical_info,
            theme: appearance.theme,
            font_size: appearance.font_size,
            high_contrast: appearance.high_contrast,
        }
    }

    pub fn appearance(&self) -> Appearance {
        Appearance {
            theme: self.theme,
            font_size: self.font_size,
            high_contrast: self.high_contrast,
        }
    }

    /// Shallow merge of `update` into this record.
    ///
    /// `physical_info`, when present, replaces the stored value whole.
    pub fn merge(&mut self, update: &UserUpdate) {
        if let Some(name) = &update.name {
            self.name = name.clone();
        }
        if let Some(email) = &update.email {
            self.email = email.clone();
        }
        if let Some(info) = &update.physical_info {
            self.physical_info = Some(info.clone());
        }
        if let Some(theme) = update.theme {
            self.theme = theme;
        }
        if let Some(size) = update.font_size {
            self.font_size = size;
        }
        if let Some(enabled) = update.high_contrast {
            self.high_contrast = enabled;
        }
    }
}

/// Partial update applied by `SessionStore::update_user`.
///
/// There is no `id` or `role` field: both are immutable once issued.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub physical_info: Option<PhysicalInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<Theme>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<FontSize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high_contrast: Option<bool>,
}

impl UserUpdate {
    pub fn theme(theme: Theme) -> Self {
        Self {
            theme: Some(theme),
            ..Default::default()
        }
    }

    pub fn font_size(size: FontSize) -> Self {
        Self {
            font_size: Some(size),
            ..Default::default()
        }
    }

    pub fn high_contrast(enabled: bool) -> Self {
        Self {
            high_contrast: Some(enabled),
            ..Default::default()
        }
    }

    pub fn appearance(appearance: Appearance) -> Self {
        Self {
            theme: Some(appearance.theme),
            font_size: Some(appearance.font_size),
            high_contrast: Some(appearance.high_contrast),
            ..Default::default()
        }
    }
}

/// A user record as read back from the local slot.
///
/// Older records may lack preference fields; those stay `None` here so the
/// caller can tell "absent" from "default". Only `id` is required; any other
/// field that cannot be read is treated as absent.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredUser {
    pub id: String,
    #[serde(default, deserialize_with = "lenient::string_or_default")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::string_or_default")]
    pub email: String,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub role: Option<UserRole>,
    #[serde(default, deserialize_with = "lenient::physical_info")]
    pub physical_info: Option<PhysicalInfo>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub theme: Option<Theme>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub font_size: Option<FontSize>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub high_contrast: Option<bool>,
}

impl From<StoredUser> for User {
    fn from(stored: StoredUser) -> Self {
        let defaults = Appearance::default();
        Self {
            id: stored.id,
            name: stored.name,
            email: stored.email,
            role: stored.role.unwrap_or_default(),
            physical_info: stored.physical_info,
            theme: stored.theme.unwrap_or(defaults.theme),
            font_size: stored.font_size.unwrap_or(defaults.font_size),
            high_contrast: stored.high_contrast.unwrap_or(defaults.high_contrast),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> User {
        User::new("u-1", "Ana", "ana@x.com", UserRole::User, None)
    }

    #[test]
    fn test_record_uses_camel_case() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["fontSize"], "medium");
        assert_eq!(json["highContrast"], false);
        assert_eq!(json["theme"], "system");
        assert_eq!(json["role"], "user");
        assert!(json.get("physicalInfo").is_none());
    }

    #[test]
    fn test_merge_is_shallow() {
        let mut user = sample();
        user.physical_info = Some(PhysicalInfo {
            weight: Some(70.0),
            age: Some(30.0),
            ..Default::default()
        });

        user.merge(&UserUpdate {
            physical_info: Some(PhysicalInfo {
                height: Some(170.0),
                ..Default::default()
            }),
            ..Default::default()
        });

        let info = user.physical_info.unwrap();
        assert_eq!(info.height, Some(170.0));
        assert_eq!(info.weight, None);
        assert_eq!(info.age, None);
    }

    #[test]
    fn test_merge_leaves_unset_fields() {
        let mut user = sample();
        user.merge(&UserUpdate::high_contrast(true));
        assert!(user.high_contrast);
        assert_eq!(user.name, "Ana");
        assert_eq!(user.theme, Theme::System);
    }

    #[test]
    fn test_stored_user_fills_defaults() {
        let stored: StoredUser =
            serde_json::from_str(r#"{"id":"u-2","name":"Bo","email":"bo@x.com","role":"professional"}"#)
                .unwrap();
        assert!(stored.theme.is_none());

        let user = User::from(stored);
        assert_eq!(user.role, UserRole::Professional);
        assert_eq!(user.appearance(), Appearance::default());
    }

    #[test]
    fn test_stored_user_tolerates_foreign_fields() {
        let stored: StoredUser = serde_json::from_str(
            r#"{"id":"u-3","name":null,"role":"","theme":"sepia","fontSize":"large",
                "physicalInfo":{"age":"thirty"}}"#,
        )
        .unwrap();

        let user = User::from(stored);
        assert_eq!(user.name, "");
        assert_eq!(user.role, UserRole::User);
        assert_eq!(user.theme, Theme::System);
        assert_eq!(user.font_size, FontSize::Large);
        assert!(user.physical_info.is_none());
    }

    #[test]
    fn test_cli_names() {
        use clap::ValueEnum;
        assert_eq!(
            UserGoal::from_str("increase-flexibility", false),
            Ok(UserGoal::IncreaseFlexibility)
        );
        assert_eq!(
            UserRole::from_str("professional", false),
            Ok(UserRole::Professional)
        );
        assert!(UserRole::from_str("admin", false).is_err());
    }

    #[test]
    fn test_goals_wire_names() {
        let info: PhysicalInfo =
            serde_json::from_str(r#"{"goals":["lose_weight","increase_flexibility"]}"#).unwrap();
        assert_eq!(
            info.goals,
            vec![UserGoal::LoseWeight, UserGoal::IncreaseFlexibility]
        );
    }
}
