// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use std::sync::Arc;
use vivafit_session::appearance::{ClassList, ColorSchemeSource};
use vivafit_session::db::MemoryStorage;
use vivafit_session::notify::RecordingNotifier;
use vivafit_session::services::{AuthBackend, DemoAuthBackend};
use vivafit_session::session::SessionStore;

/// A store wired to in-memory collaborators, with handles to inspect them.
#[allow(dead_code)]
pub struct TestApp {
    pub store: Arc<SessionStore>,
    pub backend: DemoAuthBackend,
    pub storage: MemoryStorage,
    pub document: Arc<ClassList>,
    pub notifier: Arc<RecordingNotifier>,
    pub color_scheme: ColorSchemeSource,
}

/// Create a test app backed by the demo accounts.
#[allow(dead_code)]
pub fn create_test_app() -> TestApp {
    create_test_app_with(DemoAuthBackend::new(), MemoryStorage::new(), false)
}

/// Create a test app over an existing backend and storage (simulates a restart).
#[allow(dead_code)]
pub fn create_test_app_with(
    backend: DemoAuthBackend,
    storage: MemoryStorage,
    prefers_dark: bool,
) -> TestApp {
    let color_scheme = ColorSchemeSource::new(prefers_dark);
    let document = Arc::new(ClassList::new());
    let notifier = Arc::new(RecordingNotifier::new());

    let store = Arc::new(SessionStore::new(
        Arc::new(backend.clone()),
        Arc::new(storage.clone()),
        document.clone(),
        color_scheme.subscribe(),
        notifier.clone(),
    ));

    TestApp {
        store,
        backend,
        storage,
        document,
        notifier,
        color_scheme,
    }
}

/// Build a bare store over any backend.
#[allow(dead_code)]
pub fn store_with_backend(
    backend: Arc<dyn AuthBackend>,
    storage: MemoryStorage,
    notifier: Arc<RecordingNotifier>,
) -> Arc<SessionStore> {
    Arc::new(SessionStore::new(
        backend,
        Arc::new(storage),
        Arc::new(ClassList::new()),
        ColorSchemeSource::new(false).subscribe(),
        notifier,
    ))
}

/// Let spawned tasks run until `check` holds (or give up).
#[allow(dead_code)]
pub async fn settle(check: impl Fn() -> bool) -> bool {
    for _ in 0..100 {
        if check() {
            return true;
        }
        tokio::task::yield_now().await;
    }
    check()
}
