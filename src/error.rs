// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types shared by the session store and its collaborators.

/// Application error type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Registration failed: {0}")]
    Registration(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Stored session record is corrupt: {0}")]
    CorruptSession(String),

    #[error("Local storage error: {0}")]
    Storage(String),

    #[error("Auth service error: {0}")]
    Backend(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Short machine-readable code, used in log fields and CLI output.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Authentication(_) => "authentication_error",
            AppError::Registration(_) => "registration_error",
            AppError::Validation(_) => "validation_error",
            AppError::CorruptSession(_) => "corrupt_session",
            AppError::Storage(_) => "storage_error",
            AppError::Backend(_) => "backend_error",
            AppError::Internal(_) => "internal_error",
        }
    }

    /// Fold a lower-level failure into an authentication error.
    pub(crate) fn into_authentication(self) -> AppError {
        match self {
            AppError::Authentication(_) => self,
            other => AppError::Authentication(other.to_string()),
        }
    }

    /// Fold a lower-level failure into a registration error.
    pub(crate) fn into_registration(self) -> AppError {
        match self {
            AppError::Registration(_) | AppError::Validation(_) => self,
            other => AppError::Registration(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Internal(err.into())
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, AppError>;
