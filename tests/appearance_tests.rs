// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Appearance preferences applied through the session store.

use vivafit_session::appearance::DocumentSurface;
use vivafit_session::db::{keys, LocalStorage};
use vivafit_session::models::{Appearance, FontSize, Theme};
use vivafit_session::session::SessionStore;

mod common;
use common::{create_test_app, settle};

#[tokio::test]
async fn test_high_contrast_without_user_is_visual_only() {
    let app = create_test_app();
    app.store.initialize().unwrap();

    app.store.apply_high_contrast(true);

    assert!(app.document.has_class("high-contrast"));
    assert!(app.storage.get(keys::CURRENT_USER).unwrap().is_none());
    assert!(app.notifier.notifications().is_empty());
}

#[tokio::test]
async fn test_theme_never_leaves_both_classes() {
    let app = create_test_app();
    app.store.initialize().unwrap();

    for theme in [Theme::Dark, Theme::System, Theme::Light, Theme::Dark] {
        app.store.apply_theme(theme);
        let active = ["light", "dark"]
            .iter()
            .filter(|c| app.document.has_class(c))
            .count();
        assert_eq!(active, 1, "after {:?}", theme);
    }
}

#[tokio::test]
async fn test_font_size_classes_are_exclusive() {
    let app = create_test_app();
    app.store.initialize().unwrap();
    app.store.login("user@example.com", "pw").await.unwrap();

    for size in [FontSize::Large, FontSize::Small, FontSize::Medium, FontSize::Large] {
        app.store.apply_font_size(size);
        let active = FontSize::ALL_CLASSES
            .iter()
            .filter(|c| app.document.has_class(c))
            .count();
        assert_eq!(active, 1);
        assert!(app.document.has_class(size.class()));
    }
    assert_eq!(app.store.user().unwrap().font_size, FontSize::Large);
}

#[tokio::test]
async fn test_setter_with_user_persists_and_notifies() {
    let app = create_test_app();
    app.store.initialize().unwrap();
    app.store.login("user@example.com", "pw").await.unwrap();
    app.notifier.clear();

    app.store.apply_theme(Theme::Dark);

    assert_eq!(app.store.user().unwrap().theme, Theme::Dark);
    let raw = app.storage.get(keys::CURRENT_USER).unwrap().unwrap();
    assert!(raw.contains(r#""theme":"dark""#));
    assert_eq!(app.notifier.messages(), vec![SessionStore::PROFILE_UPDATED]);
}

#[tokio::test]
async fn test_update_appearance_saves_once() {
    let app = create_test_app();
    app.store.initialize().unwrap();
    app.store.login("user@example.com", "pw").await.unwrap();
    app.notifier.clear();

    let wanted = Appearance {
        theme: Theme::Light,
        font_size: FontSize::Small,
        high_contrast: true,
    };
    let user = app.store.update_appearance(wanted).unwrap();

    assert_eq!(user.appearance(), wanted);
    assert_eq!(app.notifier.messages().len(), 1);
    assert_eq!(
        app.document.classes(),
        vec!["high-contrast", "light", "text-sm"]
    );
}

#[tokio::test]
async fn test_update_appearance_anonymous() {
    let app = create_test_app();
    app.store.initialize().unwrap();

    let result = app.store.update_appearance(Appearance {
        theme: Theme::Dark,
        ..Default::default()
    });

    assert!(result.is_none());
    assert!(app.document.has_class("dark"));
    assert!(app.notifier.notifications().is_empty());
}

#[tokio::test]
async fn test_follows_platform_while_theme_is_system() {
    let app = create_test_app();
    app.store.initialize().unwrap();
    app.store.login("user@example.com", "pw").await.unwrap();
    assert!(app.document.has_class("light"));

    app.color_scheme.set_prefers_dark(true);
    assert!(settle(|| app.document.has_class("dark")).await);
    assert!(!app.document.has_class("light"));

    // Platform changes never touch the stored preference.
    assert_eq!(app.store.user().unwrap().theme, Theme::System);
}

#[tokio::test]
async fn test_explicit_theme_ignores_platform() {
    let app = create_test_app();
    app.store.initialize().unwrap();
    app.store.login("user@example.com", "pw").await.unwrap();
    app.store.apply_theme(Theme::Light);

    app.color_scheme.set_prefers_dark(true);
    for _ in 0..20 {
        tokio::task::yield_now().await;
    }
    assert!(app.document.has_class("light"));
    assert!(!app.document.has_class("dark"));
}

#[tokio::test]
async fn test_anonymous_ignores_platform() {
    let app = create_test_app();
    app.store.initialize().unwrap();

    app.color_scheme.set_prefers_dark(true);
    for _ in 0..20 {
        tokio::task::yield_now().await;
    }
    assert!(app.document.has_class("light"));
}

#[tokio::test]
async fn test_dispose_stops_following_platform() {
    let app = create_test_app();
    app.store.initialize().unwrap();
    app.store.login("user@example.com", "pw").await.unwrap();

    app.store.dispose();
    app.store.dispose();

    app.color_scheme.set_prefers_dark(true);
    for _ in 0..20 {
        tokio::task::yield_now().await;
    }
    assert!(app.document.has_class("light"));

    // Explicit applies still resolve against the live signal.
    app.store.apply_theme(Theme::System);
    assert!(app.document.has_class("dark"));
}
