//! Appearance preferences and the document class tokens they map to.

use serde::{Deserialize, Serialize};

/// Color theme preference.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    /// Follow the platform dark-mode signal
    #[default]
    System,
}

impl Theme {
    /// Resolve to a concrete theme given the platform dark-mode signal.
    pub fn resolve(self, prefers_dark: bool) -> ResolvedTheme {
        match self {
            Theme::Light => ResolvedTheme::Light,
            Theme::Dark => ResolvedTheme::Dark,
            Theme::System if prefers_dark => ResolvedTheme::Dark,
            Theme::System => ResolvedTheme::Light,
        }
    }
}

/// A theme as actually rendered on the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedTheme {
    Light,
    Dark,
}

impl ResolvedTheme {
    pub const ALL_CLASSES: [&'static str; 2] = ["light", "dark"];

    pub fn class(self) -> &'static str {
        match self {
            ResolvedTheme::Light => "light",
            ResolvedTheme::Dark => "dark",
        }
    }
}

/// Base font size preference.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum FontSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl FontSize {
    pub const ALL_CLASSES: [&'static str; 3] = ["text-sm", "text-base", "text-lg"];

    pub fn class(self) -> &'static str {
        match self {
            FontSize::Small => "text-sm",
            FontSize::Medium => "text-base",
            FontSize::Large => "text-lg",
        }
    }
}

/// Class token present while high-contrast mode is on.
pub const HIGH_CONTRAST_CLASS: &str = "high-contrast";

/// All three appearance preferences together.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appearance {
    pub theme: Theme,
    pub font_size: FontSize,
    pub high_contrast: bool,
}
