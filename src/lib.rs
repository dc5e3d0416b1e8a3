// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! VivaFit session store: who is logged in, and how the app should look.
//!
//! This crate provides the client-side session and preference state for the
//! VivaFit wellness app, backed by a Supabase-style auth/data service and a
//! local durable key-value slot.

pub mod appearance;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod notify;
pub mod services;
pub mod session;

use appearance::{ClassList, ColorSchemeSource};
use config::{BackendKind, Config};
use db::FileStorage;
use error::AppError;
use notify::TracingNotifier;
use services::{AuthBackend, DemoAuthBackend, SupabaseClient};
use session::SessionStore;
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub store: Arc<SessionStore>,
    pub document: Arc<ClassList>,
    pub color_scheme: ColorSchemeSource,
}

impl AppState {
    /// Wire up the store and its collaborators from configuration.
    pub fn from_config(config: Config) -> Result<Self, AppError> {
        let backend: Arc<dyn AuthBackend> = match config.backend {
            BackendKind::Demo => {
                tracing::info!("Using demo auth backend");
                Arc::new(DemoAuthBackend::new())
            }
            BackendKind::Supabase => {
                let (Some(url), Some(anon_key)) =
                    (&config.supabase_url, &config.supabase_anon_key)
                else {
                    return Err(AppError::Internal(anyhow::anyhow!(
                        "Supabase backend selected without URL and anon key"
                    )));
                };
                let mut client = SupabaseClient::new(url.as_str(), anon_key.as_str());
                if let Some(key) = &config.supabase_service_role_key {
                    client = client.with_service_role_key(key.as_str());
                }
                tracing::info!(url = %url, "Using Supabase auth backend");
                Arc::new(client)
            }
        };

        let storage = Arc::new(FileStorage::new(&config.storage_dir)?);
        let document = Arc::new(ClassList::new());
        let color_scheme = ColorSchemeSource::new(config.prefers_dark);

        let store = Arc::new(SessionStore::new(
            backend,
            storage,
            document.clone(),
            color_scheme.subscribe(),
            Arc::new(TracingNotifier),
        ));

        Ok(Self {
            config,
            store,
            document,
            color_scheme,
        })
    }
}
