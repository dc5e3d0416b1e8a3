// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session & preference store.
//!
//! Owns the current user, mediates login/registration/logout against the
//! auth service, mirrors the user into the local slot on every mutation, and
//! applies appearance preferences to the document.
//!
//! Lifecycle: `Uninitialized -> Loading -> {Anonymous | Authenticated}`.
//! Overlapping `login`/`register` calls are not serialized; the last one to
//! finish wins, both in memory and in the slot.

use crate::appearance::{self, ColorScheme, DocumentSurface};
use crate::db::{keys, LocalStorage};
use crate::error::{AppError, Result};
use crate::models::{
    Appearance, FontSize, Registration, StoredUser, Theme, User, UserUpdate,
};
use crate::notify::Notifier;
use crate::services::{AccountMetadata, AuthBackend};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::task::JoinHandle;
use validator::Validate;

/// Observable lifecycle state of the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Uninitialized,
    Loading,
    Anonymous,
    Authenticated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Uninitialized,
    Loading,
    Ready,
}

#[derive(Debug)]
struct Inner {
    phase: Phase,
    user: Option<User>,
    /// Number of login/register calls in flight
    pending: usize,
}

/// Session store. Share it as `Arc<SessionStore>`.
pub struct SessionStore {
    backend: Arc<dyn AuthBackend>,
    storage: Arc<dyn LocalStorage>,
    document: Arc<dyn DocumentSurface>,
    color_scheme: ColorScheme,
    notifier: Arc<dyn Notifier>,
    inner: Mutex<Inner>,
    listener: Mutex<Option<JoinHandle<()>>>,
}

impl SessionStore {
    pub const LOGIN_OK: &'static str = "Login successful";
    pub const LOGIN_FAILED: &'static str = "Login failed";
    pub const REGISTER_OK: &'static str = "Registration successful";
    pub const REGISTER_FAILED: &'static str = "Registration failed";
    pub const PROFILE_UPDATED: &'static str = "Profile updated";
    pub const LOGGED_OUT: &'static str = "Logged out";

    /// Create a store. Nothing is read or applied until [`initialize`](Self::initialize).
    pub fn new(
        backend: Arc<dyn AuthBackend>,
        storage: Arc<dyn LocalStorage>,
        document: Arc<dyn DocumentSurface>,
        color_scheme: ColorScheme,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            backend,
            storage,
            document,
            color_scheme,
            notifier,
            inner: Mutex::new(Inner {
                phase: Phase::Uninitialized,
                user: None,
                pending: 0,
            }),
            listener: Mutex::new(None),
        }
    }

    // ─── Lifecycle ───────────────────────────────────────────────

    /// Hydrate from the local slot and start following the dark-mode signal.
    ///
    /// Runs once; later calls are ignored. A slot that cannot be parsed
    /// yields [`AppError::CorruptSession`]: the store still ends up anonymous
    /// with the system theme applied, and the slot is left as found.
    pub fn initialize(self: &Arc<Self>) -> Result<()> {
        {
            let mut inner = self.lock();
            if inner.phase != Phase::Uninitialized {
                tracing::warn!("Session store already initialized");
                return Ok(());
            }
            inner.phase = Phase::Loading;
        }

        let result = self.hydrate();
        self.lock().phase = Phase::Ready;
        self.start_listener();
        result
    }

    /// Stop following the dark-mode signal. Safe to call more than once.
    pub fn dispose(&self) {
        if let Some(handle) = self.listener_slot().take() {
            handle.abort();
            tracing::debug!("Color scheme listener stopped");
        }
    }

    fn hydrate(&self) -> Result<()> {
        let raw = match self.storage.get(keys::CURRENT_USER) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::error!(error = %e, "Failed to read stored session");
                appearance::apply_theme(self.document.as_ref(), &self.color_scheme, Theme::System);
                return Err(e);
            }
        };

        let Some(raw) = raw else {
            tracing::debug!("No stored session");
            appearance::apply_theme(self.document.as_ref(), &self.color_scheme, Theme::System);
            return Ok(());
        };

        let stored: StoredUser = match serde_json::from_str(&raw) {
            Ok(stored) => stored,
            Err(e) => {
                tracing::warn!(error = %e, "Stored session is corrupt; starting anonymous");
                appearance::apply_theme(self.document.as_ref(), &self.color_scheme, Theme::System);
                return Err(AppError::CorruptSession(e.to_string()));
            }
        };

        // Only preferences present in the record are applied.
        let doc = self.document.as_ref();
        if let Some(theme) = stored.theme {
            appearance::apply_theme(doc, &self.color_scheme, theme);
        }
        if let Some(size) = stored.font_size {
            appearance::apply_font_size(doc, size);
        }
        if let Some(enabled) = stored.high_contrast {
            appearance::apply_high_contrast(doc, enabled);
        }

        let user = User::from(stored);
        tracing::info!(user_id = %user.id, role = ?user.role, "Session restored");
        self.lock().user = Some(user);
        Ok(())
    }

    fn start_listener(self: &Arc<Self>) {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::warn!("No async runtime; system theme changes will not be followed");
            return;
        };

        let mut scheme = self.color_scheme.clone();
        let store = Arc::downgrade(self);
        let handle = runtime.spawn(async move {
            while let Some(prefers_dark) = scheme.changed().await {
                let Some(store) = store.upgrade() else {
                    break;
                };
                store.on_color_scheme_change(prefers_dark);
            }
        });

        if let Some(previous) = self.listener_slot().replace(handle) {
            previous.abort();
        }
    }

    /// Platform dark-mode flipped. Only matters while the user follows the system theme.
    fn on_color_scheme_change(&self, prefers_dark: bool) {
        let follows_system = self
            .lock()
            .user
            .as_ref()
            .is_some_and(|u| u.theme == Theme::System);
        if !follows_system {
            return;
        }

        let resolved = Theme::System.resolve(prefers_dark);
        appearance::set_resolved_theme(self.document.as_ref(), resolved);
        tracing::debug!(theme = resolved.class(), "System theme changed");
    }

    // ─── Accessors ───────────────────────────────────────────────

    pub fn user(&self) -> Option<User> {
        self.lock().user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.lock().user.is_some()
    }

    /// True while initializing or while a login/registration is in flight.
    pub fn is_loading(&self) -> bool {
        let inner = self.lock();
        inner.phase == Phase::Loading || inner.pending > 0
    }

    pub fn state(&self) -> SessionState {
        let inner = self.lock();
        match inner.phase {
            Phase::Uninitialized => SessionState::Uninitialized,
            Phase::Loading => SessionState::Loading,
            Phase::Ready if inner.user.is_some() => SessionState::Authenticated,
            Phase::Ready => SessionState::Anonymous,
        }
    }

    // ─── Authentication ──────────────────────────────────────────

    /// Sign in with email and password.
    ///
    /// On failure the previous session, if any, is left as it was.
    pub async fn login(&self, email: &str, password: &str) -> Result<User> {
        let _pending = self.begin_pending();

        let account = match self.backend.sign_in(email, password).await {
            Ok(res) => match (res.session, res.user) {
                (Some(_), Some(account)) => Ok(account),
                _ => Err(AppError::Authentication(
                    "Auth service returned no session".to_string(),
                )),
            },
            Err(e) => Err(e.into_authentication()),
        };

        let account = match account {
            Ok(account) => account,
            Err(e) => {
                tracing::warn!(error = %e, "Login failed");
                self.notifier.error(Self::LOGIN_FAILED);
                return Err(e);
            }
        };

        let metadata = account.user_metadata;
        let user = User::new(
            account.id,
            metadata.name.unwrap_or_default(),
            account.email.unwrap_or_default(),
            metadata.role.unwrap_or_default(),
            metadata.physical_info,
        );

        self.establish(user.clone());
        tracing::info!(user_id = %user.id, role = ?user.role, "User logged in");
        self.notifier.success(Self::LOGIN_OK);
        Ok(user)
    }

    /// Create an account and its profile row, then sign the new user in.
    ///
    /// If the profile row cannot be written, the freshly created auth account
    /// is deleted again before the error is returned.
    pub async fn register(&self, registration: Registration) -> Result<User> {
        let _pending = self.begin_pending();

        match self.create_account(&registration).await {
            Ok(user) => {
                self.establish(user.clone());
                tracing::info!(user_id = %user.id, role = ?user.role, "User registered");
                self.notifier.success(Self::REGISTER_OK);
                Ok(user)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Registration failed");
                self.notifier.error(Self::REGISTER_FAILED);
                Err(e)
            }
        }
    }

    async fn create_account(&self, reg: &Registration) -> Result<User> {
        reg.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let metadata = AccountMetadata {
            name: Some(reg.name.clone()),
            role: Some(reg.role),
            physical_info: reg.physical_info.clone(),
        };
        let created = self
            .backend
            .sign_up(&reg.email, &reg.password, &metadata)
            .await
            .map_err(AppError::into_registration)?;
        let account = created.user.ok_or_else(|| {
            AppError::Registration("Auth service returned no user".to_string())
        })?;

        let user = User::new(
            account.id,
            reg.name.clone(),
            reg.email.clone(),
            reg.role,
            reg.physical_info.clone(),
        );

        if let Err(e) = self
            .backend
            .insert_profile(&user, created.session.as_ref())
            .await
        {
            tracing::error!(user_id = %user.id, error = %e, "Profile insert failed; removing auth account");
            if let Err(undo) = self.backend.delete_user(&user.id).await {
                tracing::error!(user_id = %user.id, error = %undo, "Failed to remove orphaned auth account");
            }
            return Err(e.into_registration());
        }

        Ok(user)
    }

    /// Clear the session and the local slot. Always succeeds.
    pub fn logout(&self) {
        let previous = {
            let mut inner = self.lock();
            if let Err(e) = self.storage.remove(keys::CURRENT_USER) {
                tracing::error!(error = %e, "Failed to clear stored session");
            }
            inner.user.take()
        };

        // Anonymous views render with default appearance.
        appearance::apply_all(
            self.document.as_ref(),
            &self.color_scheme,
            Appearance::default(),
        );

        if let Some(user) = previous {
            tracing::info!(user_id = %user.id, "User logged out");
        }
        self.notifier.success(Self::LOGGED_OUT);
    }

    // ─── Profile & preferences ───────────────────────────────────

    /// Merge `update` into the current user and persist it.
    ///
    /// Returns `None` (and does nothing) when nobody is logged in. Preference
    /// fields in `update` are also reflected on the document.
    pub fn update_user(&self, update: &UserUpdate) -> Option<User> {
        let updated = self.commit(update)?;

        let doc = self.document.as_ref();
        if let Some(theme) = update.theme {
            appearance::apply_theme(doc, &self.color_scheme, theme);
        }
        if let Some(size) = update.font_size {
            appearance::apply_font_size(doc, size);
        }
        if let Some(enabled) = update.high_contrast {
            appearance::apply_high_contrast(doc, enabled);
        }
        Some(updated)
    }

    /// Apply a theme and, if logged in, save it.
    pub fn apply_theme(&self, theme: Theme) {
        appearance::apply_theme(self.document.as_ref(), &self.color_scheme, theme);
        self.commit(&UserUpdate::theme(theme));
    }

    /// Apply a font size and, if logged in, save it.
    pub fn apply_font_size(&self, size: FontSize) {
        appearance::apply_font_size(self.document.as_ref(), size);
        self.commit(&UserUpdate::font_size(size));
    }

    /// Toggle high contrast and, if logged in, save it.
    pub fn apply_high_contrast(&self, enabled: bool) {
        appearance::apply_high_contrast(self.document.as_ref(), enabled);
        self.commit(&UserUpdate::high_contrast(enabled));
    }

    /// Apply all appearance preferences at once with a single save.
    pub fn update_appearance(&self, wanted: Appearance) -> Option<User> {
        appearance::apply_all(self.document.as_ref(), &self.color_scheme, wanted);
        self.commit(&UserUpdate::appearance(wanted))
    }

    // ─── Internals ───────────────────────────────────────────────

    /// Merge, persist and notify. No-op without a user.
    ///
    /// The slot is written while `inner` is held so it always matches the
    /// in-memory user, whatever else runs concurrently.
    fn commit(&self, update: &UserUpdate) -> Option<User> {
        let updated = {
            let mut inner = self.lock();
            let user = inner.user.as_mut()?;
            user.merge(update);
            self.persist(user);
            user.clone()
        };

        tracing::debug!(user_id = %updated.id, "Profile updated");
        self.notifier.success(Self::PROFILE_UPDATED);
        Some(updated)
    }

    /// Make `user` current, mirror it to the slot and render its preferences.
    fn establish(&self, user: User) {
        let prefs = user.appearance();
        {
            let mut inner = self.lock();
            self.persist(&user);
            inner.user = Some(user);
        }
        appearance::apply_all(self.document.as_ref(), &self.color_scheme, prefs);
    }

    fn persist(&self, user: &User) {
        let result = serde_json::to_string(user)
            .map_err(AppError::from)
            .and_then(|json| self.storage.set(keys::CURRENT_USER, &json));
        if let Err(e) = result {
            tracing::error!(user_id = %user.id, error = %e, "Failed to persist session");
        }
    }

    fn begin_pending(&self) -> PendingGuard<'_> {
        self.lock().pending += 1;
        PendingGuard { store: self }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn listener_slot(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.listener.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Drop for SessionStore {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// Keeps `is_loading()` true for the lifetime of an auth call.
struct PendingGuard<'a> {
    store: &'a SessionStore,
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        let mut inner = self.store.lock();
        inner.pending = inner.pending.saturating_sub(1);
    }
}
