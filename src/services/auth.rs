// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Contract with the external auth/data service.

use crate::error::AppError;
use crate::models::{lenient, PhysicalInfo, User, UserRole};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Issued credentials for an authenticated account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Lifetime in seconds
    #[serde(default)]
    pub expires_in: Option<u64>,
}

/// Metadata attached to an auth account at sign-up.
///
/// Other clients write to the same metadata, so fields that do not parse are
/// read as absent rather than rejecting the account.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountMetadata {
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub role: Option<UserRole>,
    #[serde(
        default,
        rename = "physicalInfo",
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::physical_info"
    )]
    pub physical_info: Option<PhysicalInfo>,
}

/// Auth account as returned by the service.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AuthAccount {
    pub id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub user_metadata: AccountMetadata,
}

/// Outcome of a password sign-in.
///
/// Either part may be missing; the store treats that as a failed login.
#[derive(Debug, Clone, Default)]
pub struct SignInResponse {
    pub session: Option<AuthSession>,
    pub user: Option<AuthAccount>,
}

/// Outcome of a sign-up. `session` is absent when email confirmation is pending.
#[derive(Debug, Clone, Default)]
pub struct SignUpResponse {
    pub session: Option<AuthSession>,
    pub user: Option<AuthAccount>,
}

/// Auth/data service used by the session store.
#[async_trait]
pub trait AuthBackend: Send + Sync {
    /// Verify credentials.
    async fn sign_in(&self, email: &str, password: &str) -> Result<SignInResponse, AppError>;

    /// Create an auth account carrying `metadata`.
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: &AccountMetadata,
    ) -> Result<SignUpResponse, AppError>;

    /// Insert a row into the `users` profile table.
    async fn insert_profile(
        &self,
        row: &User,
        session: Option<&AuthSession>,
    ) -> Result<(), AppError>;

    /// Delete an auth account. Used to undo a half-finished registration.
    async fn delete_user(&self, user_id: &str) -> Result<(), AppError>;
}
