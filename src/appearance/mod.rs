//! Pure appearance appliers.
//!
//! Each applier resets one class group on the document to exactly one
//! recognized value. Nothing here persists anything; the session store
//! composes these with `update_user` when a user is loaded.

pub mod color_scheme;
pub mod document;

pub use color_scheme::{ColorScheme, ColorSchemeSource};
pub use document::{ClassList, DocumentSurface};

use crate::models::{Appearance, FontSize, ResolvedTheme, Theme, HIGH_CONTRAST_CLASS};

/// Apply a theme, resolving `System` against the current dark-mode signal.
pub fn apply_theme(doc: &dyn DocumentSurface, scheme: &ColorScheme, theme: Theme) -> ResolvedTheme {
    let resolved = theme.resolve(scheme.prefers_dark());
    set_resolved_theme(doc, resolved);
    resolved
}

pub(crate) fn set_resolved_theme(doc: &dyn DocumentSurface, resolved: ResolvedTheme) {
    for class in ResolvedTheme::ALL_CLASSES {
        doc.remove_class(class);
    }
    doc.add_class(resolved.class());
}

pub fn apply_font_size(doc: &dyn DocumentSurface, size: FontSize) {
    for class in FontSize::ALL_CLASSES {
        doc.remove_class(class);
    }
    doc.add_class(size.class());
}

pub fn apply_high_contrast(doc: &dyn DocumentSurface, enabled: bool) {
    if enabled {
        doc.add_class(HIGH_CONTRAST_CLASS);
    } else {
        doc.remove_class(HIGH_CONTRAST_CLASS);
    }
}

/// Apply all three preferences.
pub fn apply_all(doc: &dyn DocumentSurface, scheme: &ColorScheme, appearance: Appearance) {
    apply_theme(doc, scheme, appearance.theme);
    apply_font_size(doc, appearance.font_size);
    apply_high_contrast(doc, appearance.high_contrast);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(doc: &ClassList, group: &[&str]) -> usize {
        group.iter().filter(|c| doc.has_class(c)).count()
    }

    #[test]
    fn test_theme_leaves_exactly_one_class() {
        let doc = ClassList::new();
        for prefers_dark in [false, true] {
            let scheme = ColorScheme::fixed(prefers_dark);
            for theme in [Theme::Light, Theme::Dark, Theme::System, Theme::Light] {
                apply_theme(&doc, &scheme, theme);
                assert_eq!(count(&doc, &ResolvedTheme::ALL_CLASSES), 1);
            }
        }
    }

    #[test]
    fn test_system_theme_resolves_at_call_time() {
        let doc = ClassList::new();
        let source = ColorSchemeSource::new(true);
        let scheme = source.subscribe();

        assert_eq!(apply_theme(&doc, &scheme, Theme::System), ResolvedTheme::Dark);
        assert!(doc.has_class("dark"));

        source.set_prefers_dark(false);
        assert_eq!(apply_theme(&doc, &scheme, Theme::System), ResolvedTheme::Light);
        assert!(doc.has_class("light"));
        assert!(!doc.has_class("dark"));
    }

    #[test]
    fn test_font_size_is_exclusive() {
        let doc = ClassList::new();
        for size in [FontSize::Small, FontSize::Large, FontSize::Medium, FontSize::Small] {
            apply_font_size(&doc, size);
            assert_eq!(count(&doc, &FontSize::ALL_CLASSES), 1);
            assert!(doc.has_class(size.class()));
        }
    }

    #[test]
    fn test_high_contrast_toggles() {
        let doc = ClassList::new();
        apply_high_contrast(&doc, true);
        apply_high_contrast(&doc, true);
        assert_eq!(doc.classes(), vec!["high-contrast".to_string()]);
        apply_high_contrast(&doc, false);
        assert!(doc.classes().is_empty());
    }

    #[test]
    fn test_apply_all_leaves_unrelated_classes() {
        let doc = ClassList::new();
        doc.add_class("antialiased");
        apply_all(
            &doc,
            &ColorScheme::fixed(false),
            Appearance {
                theme: Theme::Dark,
                font_size: FontSize::Large,
                high_contrast: true,
            },
        );
        assert_eq!(
            doc.classes(),
            vec!["antialiased", "dark", "high-contrast", "text-lg"]
        );
    }
}
