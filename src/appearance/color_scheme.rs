// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Platform "prefers dark color scheme" signal.
//!
//! The platform side owns a [`ColorSchemeSource`] and pushes changes into it;
//! consumers hold a [`ColorScheme`] that can be read synchronously or awaited
//! for the next change.

use tokio::sync::watch;

/// Producer side of the dark-mode signal.
#[derive(Debug)]
pub struct ColorSchemeSource {
    tx: watch::Sender<bool>,
}

impl ColorSchemeSource {
    pub fn new(prefers_dark: bool) -> Self {
        let (tx, _rx) = watch::channel(prefers_dark);
        Self { tx }
    }

    /// Publish a new platform preference. Unchanged values are not re-broadcast.
    pub fn set_prefers_dark(&self, prefers_dark: bool) {
        self.tx.send_if_modified(|current| {
            if *current == prefers_dark {
                false
            } else {
                *current = prefers_dark;
                true
            }
        });
    }

    pub fn subscribe(&self) -> ColorScheme {
        ColorScheme {
            rx: self.tx.subscribe(),
        }
    }
}

/// Consumer side of the dark-mode signal.
#[derive(Debug, Clone)]
pub struct ColorScheme {
    rx: watch::Receiver<bool>,
}

impl ColorScheme {
    /// A signal that never changes.
    pub fn fixed(prefers_dark: bool) -> Self {
        let (_tx, rx) = watch::channel(prefers_dark);
        Self { rx }
    }

    /// Current platform preference.
    pub fn prefers_dark(&self) -> bool {
        *self.rx.borrow()
    }

    /// Wait for the next change. Returns `None` once the source is gone.
    pub async fn changed(&mut self) -> Option<bool> {
        self.rx.changed().await.ok()?;
        Some(*self.rx.borrow_and_update())
    }
}
