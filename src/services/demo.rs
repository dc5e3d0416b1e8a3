//! In-process auth/data service with the demo accounts shown on the login page.
//!
//! `user@example.com` and `pro@example.com` accept any password. Accounts
//! created through `sign_up` need the password they were registered with.

use super::auth::{
    AccountMetadata, AuthAccount, AuthBackend, AuthSession, SignInResponse, SignUpResponse,
};
use crate::error::AppError;
use crate::models::{User, UserRole};
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub const DEMO_USER_EMAIL: &str = "user@example.com";
pub const DEMO_PROFESSIONAL_EMAIL: &str = "pro@example.com";

#[derive(Debug, Clone)]
struct Account {
    id: String,
    /// `None` means any password is accepted
    password: Option<String>,
    metadata: AccountMetadata,
}

/// Demo backend. Clones share the same account and profile tables.
#[derive(Debug, Clone)]
pub struct DemoAuthBackend {
    /// Keyed by lowercase email
    accounts: Arc<DashMap<String, Account>>,
    /// Keyed by user id
    profiles: Arc<DashMap<String, User>>,
    fail_profile_inserts: Arc<AtomicBool>,
}

impl Default for DemoAuthBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl DemoAuthBackend {
    /// Create a backend seeded with the two demo accounts.
    pub fn new() -> Self {
        let backend = Self::empty();
        backend.seed(DEMO_USER_EMAIL, "Demo User", UserRole::User);
        backend.seed(DEMO_PROFESSIONAL_EMAIL, "Demo Professional", UserRole::Professional);
        backend
    }

    /// Create a backend with no accounts.
    pub fn empty() -> Self {
        Self {
            accounts: Arc::new(DashMap::new()),
            profiles: Arc::new(DashMap::new()),
            fail_profile_inserts: Arc::new(AtomicBool::new(false)),
        }
    }

    fn seed(&self, email: &str, name: &str, role: UserRole) {
        self.accounts.insert(
            email.to_string(),
            Account {
                id: uuid::Uuid::new_v4().to_string(),
                password: None,
                metadata: AccountMetadata {
                    name: Some(name.to_string()),
                    role: Some(role),
                    physical_info: None,
                },
            },
        );
    }

    /// Make every subsequent profile insert fail, as a database outage would.
    pub fn set_fail_profile_inserts(&self, fail: bool) {
        self.fail_profile_inserts.store(fail, Ordering::SeqCst);
    }

    pub fn has_account(&self, email: &str) -> bool {
        self.accounts.contains_key(&normalize(email))
    }

    pub fn profile(&self, user_id: &str) -> Option<User> {
        self.profiles.get(user_id).map(|p| p.value().clone())
    }

    fn account_view(email: &str, account: &Account) -> AuthAccount {
        AuthAccount {
            id: account.id.clone(),
            email: Some(email.to_string()),
            user_metadata: account.metadata.clone(),
        }
    }

    fn issue_session() -> AuthSession {
        AuthSession {
            access_token: format!("demo-{}", uuid::Uuid::new_v4()),
            refresh_token: None,
            expires_in: Some(3600),
        }
    }
}

fn normalize(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

#[async_trait]
impl AuthBackend for DemoAuthBackend {
    async fn sign_in(&self, email: &str, password: &str) -> Result<SignInResponse, AppError> {
        let key = normalize(email);
        let Some(account) = self.accounts.get(&key) else {
            return Err(AppError::Authentication("Invalid login credentials".to_string()));
        };

        if let Some(expected) = &account.password {
            if expected != password {
                return Err(AppError::Authentication("Invalid login credentials".to_string()));
            }
        }

        Ok(SignInResponse {
            session: Some(Self::issue_session()),
            user: Some(Self::account_view(&key, &account)),
        })
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: &AccountMetadata,
    ) -> Result<SignUpResponse, AppError> {
        let key = normalize(email);
        let account = match self.accounts.entry(key.clone()) {
            dashmap::mapref::entry::Entry::Occupied(_) => {
                return Err(AppError::Backend("User already registered".to_string()));
            }
            dashmap::mapref::entry::Entry::Vacant(slot) => slot
                .insert(Account {
                    id: uuid::Uuid::new_v4().to_string(),
                    password: Some(password.to_string()),
                    metadata: metadata.clone(),
                })
                .clone(),
        };

        tracing::debug!(user_id = %account.id, "Demo account created");
        Ok(SignUpResponse {
            session: Some(Self::issue_session()),
            user: Some(Self::account_view(&key, &account)),
        })
    }

    async fn insert_profile(
        &self,
        row: &User,
        _session: Option<&AuthSession>,
    ) -> Result<(), AppError> {
        if self.fail_profile_inserts.load(Ordering::SeqCst) {
            return Err(AppError::Backend("Profile table unavailable".to_string()));
        }
        if self.profiles.contains_key(&row.id) {
            return Err(AppError::Backend(format!(
                "Duplicate key: profile {} already exists",
                row.id
            )));
        }
        self.profiles.insert(row.id.clone(), row.clone());
        Ok(())
    }

    async fn delete_user(&self, user_id: &str) -> Result<(), AppError> {
        let before = self.accounts.len();
        self.accounts.retain(|_, account| account.id != user_id);
        if self.accounts.len() == before {
            return Err(AppError::Backend(format!("No account with id {}", user_id)));
        }
        self.profiles.remove(user_id);
        Ok(())
    }
}
