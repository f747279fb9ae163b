//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `NVC_FACILITATOR` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use nvc_facilitator::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {}", config.server.socket_addr().unwrap());
//! ```

mod ai;
mod conversation;
mod error;
mod server;

pub use ai::{AiConfig, AiProvider};
pub use conversation::ConversationConfig;
pub use error::{ConfigError, ValidationError};
pub use server::{Environment, ServerConfig};

use serde::Deserialize;
use std::env;

/// Root application configuration
///
/// Every section has defaults, so an empty environment yields a working
/// rules-only server on port 8000.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment, logging)
    #[serde(default)]
    pub server: ServerConfig,

    /// AI provider configuration (OpenAI/Anthropic)
    #[serde(default)]
    pub ai: AiConfig,

    /// Completion thresholds and input limits
    #[serde(default)]
    pub conversation: ConversationConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `NVC_FACILITATOR` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Applies the platform `PORT` variable over `server.port`
    /// 5. Deserializes into typed configuration structs
    ///
    /// Bare `OPENAI_API_KEY` / `ANTHROPIC_API_KEY` are accepted as defaults
    /// for the prefixed keys.
    ///
    /// # Environment Variable Format
    ///
    /// - `NVC_FACILITATOR__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `NVC_FACILITATOR__AI__PRIMARY_PROVIDER=anthropic` -> `ai.primary_provider`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let mut builder = config::Config::builder();

        for (var, key) in [
            ("OPENAI_API_KEY", "ai.openai_api_key"),
            ("ANTHROPIC_API_KEY", "ai.anthropic_api_key"),
        ] {
            if let Ok(value) = env::var(var) {
                builder = builder.set_default(key, value)?;
            }
        }

        let config = builder
            .add_source(
                config::Environment::with_prefix("NVC_FACILITATOR")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .set_override_option("server.port", env::var("PORT").ok())?
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.ai.validate()?;
        self.conversation.validate()?;

        // The AI call must give up before the HTTP layer does
        if self.ai.timeout_secs >= self.server.request_timeout_secs {
            return Err(ValidationError::AiTimeoutExceedsRequest);
        }

        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
