//! Application configuration loaded from environment variables.
//!
//! A `.env` file in the working directory is honored for local development.

use std::env;
use std::path::PathBuf;

/// Which auth/data service implementation to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// Hosted Supabase project.
    Supabase,
    /// In-process demo accounts.
    Demo,
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Selected backend
    pub backend: BackendKind,
    /// Supabase project URL, e.g. `https://xyz.supabase.co`
    pub supabase_url: Option<String>,
    /// Public (anon) API key
    pub supabase_anon_key: Option<String>,
    /// Service-role key, only needed to delete orphaned auth accounts
    pub supabase_service_role_key: Option<String>,
    /// Directory holding the local durable slot
    pub storage_dir: PathBuf,
    /// Initial value of the platform dark-mode signal
    pub prefers_dark: bool,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            backend: BackendKind::Demo,
            supabase_url: None,
            supabase_anon_key: None,
            supabase_service_role_key: None,
            storage_dir: PathBuf::from(".vivafit"),
            prefers_dark: false,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let backend = match env::var("VIVAFIT_BACKEND")
            .unwrap_or_else(|_| "demo".to_string())
            .trim()
            .to_ascii_lowercase()
            .as_str()
        {
            "demo" => BackendKind::Demo,
            "supabase" => BackendKind::Supabase,
            other => return Err(ConfigError::Invalid("VIVAFIT_BACKEND", other.to_string())),
        };

        let supabase_url = env::var("SUPABASE_URL")
            .ok()
            .map(|v| v.trim().trim_end_matches('/').to_string());
        let supabase_anon_key = env::var("SUPABASE_ANON_KEY")
            .ok()
            .map(|v| v.trim().to_string());

        if backend == BackendKind::Supabase {
            if supabase_url.is_none() {
                return Err(ConfigError::Missing("SUPABASE_URL"));
            }
            if supabase_anon_key.is_none() {
                return Err(ConfigError::Missing("SUPABASE_ANON_KEY"));
            }
        }

        Ok(Self {
            backend,
            supabase_url,
            supabase_anon_key,
            supabase_service_role_key: env::var("SUPABASE_SERVICE_ROLE_KEY")
                .ok()
                .map(|v| v.trim().to_string()),
            storage_dir: env::var("VIVAFIT_STORAGE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".vivafit")),
            prefers_dark: env::var("VIVAFIT_PREFERS_DARK")
                .map(|v| matches!(v.trim(), "1" | "true" | "yes"))
                .unwrap_or(false),
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    // Env vars are process-global, so everything lives in one test.
    #[test]
    fn test_config_from_env() {
        env::set_var("VIVAFIT_BACKEND", "supabase");
        env::remove_var("SUPABASE_URL");
        env::set_var("SUPABASE_ANON_KEY", "anon");
        assert!(matches!(
            Config::from_env(),
            Err(ConfigError::Missing("SUPABASE_URL"))
        ));

        env::set_var("SUPABASE_URL", "https://example.supabase.co/");
        env::set_var("VIVAFIT_PREFERS_DARK", "true");
        let config = Config::from_env().expect("Config should load");
        assert_eq!(config.backend, BackendKind::Supabase);
        assert_eq!(
            config.supabase_url.as_deref(),
            Some("https://example.supabase.co")
        );
        assert!(config.prefers_dark);

        env::set_var("VIVAFIT_BACKEND", "firebase");
        assert!(matches!(
            Config::from_env(),
            Err(ConfigError::Invalid("VIVAFIT_BACKEND", _))
        ));

        env::remove_var("VIVAFIT_BACKEND");
        env::remove_var("VIVAFIT_PREFERS_DARK");
        let config = Config::from_env().expect("Config should load");
        assert_eq!(config.backend, BackendKind::Demo);
        assert!(!config.prefers_dark);
    }
}
