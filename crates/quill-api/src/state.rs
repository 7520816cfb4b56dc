//! # Application State
//!
//! Shared state for the Axum application: the comment store, the token
//! service, request metrics, and the loaded configuration. Everything is
//! constructed once at startup and handed to handlers through Axum's
//! `State` extractor; there are no process-wide singletons.

use std::sync::Arc;

use quill_auth::TokenService;
use quill_core::CommentStore;
use thiserror::Error;
use zeroize::Zeroizing;

use crate::middleware::metrics::ApiMetrics;

/// Environment assumed when `ENVIRONMENT` is unset.
pub const DEFAULT_ENVIRONMENT: &str = "development";

/// Store location assumed when `DATABASE_URL` is unset. Informational only:
/// the store is always in memory.
pub const DEFAULT_DATABASE_URL: &str = "memory://";

/// Error loading configuration from the environment.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("JWT_SECRET environment variable is required")]
    MissingSecret,
}

/// Application configuration.
///
/// Custom `Debug` redacts the signing secret.
#[derive(Clone)]
pub struct AppConfig {
    /// HMAC secret used to sign and verify identity tokens.
    pub jwt_secret: Zeroizing<String>,
    /// Deployment environment name; `development` selects human-readable logs.
    pub environment: String,
    pub database_url: String,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("jwt_secret", &"[REDACTED]")
            .field("environment", &self.environment)
            .field("database_url", &self.database_url)
            .finish()
    }
}

impl AppConfig {
    /// Build a configuration from an explicit secret with default settings.
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: Zeroizing::new(secret.into()),
            environment: DEFAULT_ENVIRONMENT.to_string(),
            database_url: DEFAULT_DATABASE_URL.to_string(),
        }
    }

    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Load configuration through `getenv`.
    ///
    /// `JWT_SECRET` must be present and non-blank. Empty values for the
    /// other keys fall back to their defaults.
    pub fn from_env_with<F>(getenv: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let jwt_secret = getenv("JWT_SECRET")
            .filter(|s| !s.trim().is_empty())
            .map(Zeroizing::new)
            .ok_or(ConfigError::MissingSecret)?;

        let non_empty = |key: &str, default: &str| {
            getenv(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        Ok(Self {
            jwt_secret,
            environment: non_empty("ENVIRONMENT", DEFAULT_ENVIRONMENT),
            database_url: non_empty("DATABASE_URL", DEFAULT_DATABASE_URL),
        })
    }

    pub fn is_development(&self) -> bool {
        self.environment == DEFAULT_ENVIRONMENT
    }
}

/// Shared application state passed to all route handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub comments: CommentStore,
    pub tokens: Arc<TokenService>,
    pub metrics: ApiMetrics,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Create state with an empty store and a token service keyed by the
    /// configured secret.
    pub fn new(config: AppConfig) -> Self {
        Self::with_store(config, CommentStore::new())
    }

    /// Create state around an existing store.
    pub fn with_store(config: AppConfig, comments: CommentStore) -> Self {
        let tokens = TokenService::new(config.jwt_secret.as_bytes());
        Self {
            comments,
            tokens: Arc::new(tokens),
            metrics: ApiMetrics::new(),
            config: Arc::new(config),
        }
    }
}
