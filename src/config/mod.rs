//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `KRISHI_MITRA` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use krishi_mitra::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod ai;
mod auth;
mod database;
mod error;
mod profile;
mod server;
mod speech;

pub use ai::{AiConfig, AiProvider};
pub use auth::AuthConfig;
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use profile::ProfileConfig;
pub use server::{Environment, ServerConfig};
pub use speech::SpeechConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment, logging)
    #[serde(default)]
    pub server: ServerConfig,

    /// AI provider configuration (OpenAI/Anthropic/mock)
    #[serde(default)]
    pub ai: AiConfig,

    /// ID token validation
    #[serde(default)]
    pub auth: AuthConfig,

    /// Profile storage; in-memory when absent
    pub database: Option<DatabaseConfig>,

    /// Transcription and read-aloud
    #[serde(default)]
    pub speech: SpeechConfig,

    /// Defaults for new profiles
    #[serde(default)]
    pub profile: ProfileConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `KRISHI_MITRA` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    ///
    /// # Environment Variable Format
    ///
    /// - `KRISHI_MITRA__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `KRISHI_MITRA__AI__OPENAI_API_KEY=...` -> `ai.openai_api_key = ...`
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("KRISHI_MITRA")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.ai.validate(&self.server.environment)?;
        self.auth.validate(&self.server.environment)?;
        if let Some(database) = &self.database {
            database.validate()?;
        }
        self.speech.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
