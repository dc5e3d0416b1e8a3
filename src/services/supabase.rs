// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Supabase client for the auth (GoTrue) and REST (PostgREST) endpoints.
//!
//! Handles:
//! - Password sign-in
//! - Sign-up with account metadata
//! - Profile row insert into the `users` table
//! - Admin deletion of an auth account (needs the service-role key)

use super::auth::{
    AccountMetadata, AuthAccount, AuthBackend, AuthSession, SignInResponse, SignUpResponse,
};
use crate::error::AppError;
use crate::models::User;
use async_trait::async_trait;
use serde::Deserialize;

/// Profile table name.
pub const USERS_TABLE: &str = "users";

/// Supabase API client.
#[derive(Clone)]
pub struct SupabaseClient {
    http: reqwest::Client,
    base_url: String,
    anon_key: String,
    service_role_key: Option<String>,
}

impl SupabaseClient {
    /// Create a new client for a project URL and its public (anon) key.
    pub fn new(base_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            anon_key: anon_key.into(),
            service_role_key: None,
        }
    }

    /// Enable admin operations (account deletion).
    pub fn with_service_role_key(mut self, key: impl Into<String>) -> Self {
        self.service_role_key = Some(key.into());
        self
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path)
    }

    /// Check response status and return error if not successful.
    async fn check_response(&self, response: reqwest::Response) -> Result<(), AppError> {
        if response.status().is_success() {
            return Ok(());
        }
        Err(Self::error_from(response).await)
    }

    /// Check response and parse JSON body.
    async fn check_response_json<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, AppError> {
        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }

        response
            .json()
            .await
            .map_err(|e| AppError::Backend(format!("JSON parse error: {}", e)))
    }

    async fn error_from(response: reqwest::Response) -> AppError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(ErrorBody::into_message)
            .unwrap_or(body);

        if status.as_u16() == 429 {
            tracing::warn!("Supabase rate limit hit (429)");
        }
        AppError::Backend(format!("HTTP {}: {}", status, message))
    }
}

#[async_trait]
impl AuthBackend for SupabaseClient {
    async fn sign_in(&self, email: &str, password: &str) -> Result<SignInResponse, AppError> {
        let response = self
            .http
            .post(self.auth_url("token"))
            .query(&[("grant_type", "password")])
            .header("apikey", &self.anon_key)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(|e| AppError::Backend(format!("Sign-in request failed: {}", e)))?;

        let body: TokenResponse = self.check_response_json(response).await?;
        Ok(SignInResponse {
            session: body.session(),
            user: body.user,
        })
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: &AccountMetadata,
    ) -> Result<SignUpResponse, AppError> {
        let response = self
            .http
            .post(self.auth_url("signup"))
            .header("apikey", &self.anon_key)
            .json(&serde_json::json!({
                "email": email,
                "password": password,
                "data": metadata,
            }))
            .send()
            .await
            .map_err(|e| AppError::Backend(format!("Sign-up request failed: {}", e)))?;

        let body: serde_json::Value = self.check_response_json(response).await?;
        parse_sign_up(body)
    }

    async fn insert_profile(
        &self,
        row: &User,
        session: Option<&AuthSession>,
    ) -> Result<(), AppError> {
        let url = format!(
            "{}/rest/v1/{}",
            self.base_url,
            urlencoding::encode(USERS_TABLE)
        );
        let bearer = session
            .map(|s| s.access_token.as_str())
            .unwrap_or(&self.anon_key);

        let response = self
            .http
            .post(&url)
            .header("apikey", &self.anon_key)
            .header("Prefer", "return=minimal")
            .bearer_auth(bearer)
            .json(&[row])
            .send()
            .await
            .map_err(|e| AppError::Backend(format!("Profile insert failed: {}", e)))?;

        self.check_response(response).await?;
        tracing::debug!(user_id = %row.id, "Profile row inserted");
        Ok(())
    }

    async fn delete_user(&self, user_id: &str) -> Result<(), AppError> {
        let Some(service_key) = &self.service_role_key else {
            return Err(AppError::Backend(
                "Service role key not configured; cannot delete auth accounts".to_string(),
            ));
        };

        let url = self.auth_url(&format!("admin/users/{}", urlencoding::encode(user_id)));
        let response = self
            .http
            .delete(&url)
            .header("apikey", service_key)
            .bearer_auth(service_key)
            .send()
            .await
            .map_err(|e| AppError::Backend(format!("Account deletion failed: {}", e)))?;

        self.check_response(response).await?;
        tracing::info!(user_id, "Auth account deleted");
        Ok(())
    }
}

/// The sign-up endpoint returns either a session envelope (`{access_token, user}`)
/// or, when email confirmation is pending, the bare account.
fn parse_sign_up(body: serde_json::Value) -> Result<SignUpResponse, AppError> {
    if body.get("user").is_some_and(|u| u.is_object()) {
        let token: TokenResponse = serde_json::from_value(body)
            .map_err(|e| AppError::Backend(format!("JSON parse error: {}", e)))?;
        return Ok(SignUpResponse {
            session: token.session(),
            user: token.user,
        });
    }

    if body.get("id").is_some() {
        let user: AuthAccount = serde_json::from_value(body)
            .map_err(|e| AppError::Backend(format!("JSON parse error: {}", e)))?;
        return Ok(SignUpResponse {
            session: None,
            user: Some(user),
        });
    }

    Ok(SignUpResponse::default())
}

/// Token endpoint response.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<u64>,
    #[serde(default)]
    user: Option<AuthAccount>,
}

impl TokenResponse {
    fn session(&self) -> Option<AuthSession> {
        self.access_token.as_ref().map(|token| AuthSession {
            access_token: token.clone(),
            refresh_token: self.refresh_token.clone(),
            expires_in: self.expires_in,
        })
    }
}

/// Error bodies differ between GoTrue versions and PostgREST.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl ErrorBody {
    fn into_message(self) -> Option<String> {
        self.error_description
            .or(self.msg)
            .or(self.message)
            .or(self.error)
    }
}
