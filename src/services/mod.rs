// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - external auth/data service clients.

pub mod auth;
pub mod demo;
pub mod supabase;

pub use auth::{
    AccountMetadata, AuthAccount, AuthBackend, AuthSession, SignInResponse, SignUpResponse,
};
pub use demo::DemoAuthBackend;
pub use supabase::SupabaseClient;
