//! AI provider configuration
//!
//! AI assistance is optional. With no API key configured the service runs in
//! rules-only mode.

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// AI provider configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    /// OpenAI API key
    pub openai_api_key: Option<String>,

    /// Anthropic API key
    pub anthropic_api_key: Option<String>,

    /// Primary AI provider
    #[serde(default = "default_provider")]
    pub primary_provider: AiProvider,

    /// Fallback AI provider
    pub fallback_provider: Option<AiProvider>,

    /// OpenAI model name
    #[serde(default = "default_openai_model")]
    pub openai_model: String,

    /// Anthropic model name
    #[serde(default = "default_anthropic_model")]
    pub anthropic_model: String,

    /// Total time allowed for one AI-assisted turn, in seconds
    ///
    /// Must stay below `server.request_timeout_secs` so the keyword fallback
    /// can still answer when the provider stalls.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Maximum retries on failure
    #[serde(default = "default_retries")]
    pub max_retries: u32,
}

/// AI provider type
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AiProvider {
    #[default]
    OpenAI,
    Anthropic,
}

impl AiConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Time the primary provider may use before failing over
    ///
    /// Half the turn budget when a fallback is configured, all of it otherwise.
    pub fn primary_budget(&self) -> Duration {
        if self.fallback_provider.is_some() {
            self.timeout() / 2
        } else {
            self.timeout()
        }
    }

    /// HTTP timeout for a single provider attempt
    ///
    /// Leaves room for every retry plus backoff inside the provider's budget.
    pub fn attempt_timeout(&self) -> Duration {
        self.primary_budget() / (self.max_retries.saturating_add(2))
    }

    /// Check if OpenAI is configured
    pub fn has_openai(&self) -> bool {
        self.openai_api_key.as_ref().is_some_and(|k| !k.is_empty())
    }

    /// Check if Anthropic is configured
    pub fn has_anthropic(&self) -> bool {
        self.anthropic_api_key.as_ref().is_some_and(|k| !k.is_empty())
    }

    /// Check if a provider has its API key
    pub fn has_key_for(&self, provider: AiProvider) -> bool {
        match provider {
            AiProvider::OpenAI => self.has_openai(),
            AiProvider::Anthropic => self.has_anthropic(),
        }
    }

    /// True when the primary provider can be used
    pub fn is_enabled(&self) -> bool {
        self.has_key_for(self.primary_provider)
    }

    /// Validate AI configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.timeout_secs == 0 || self.timeout_secs > 120 {
            return Err(ValidationError::InvalidAiTimeout);
        }

        // No keys at all means rules-only mode
        if !self.has_openai() && !self.has_anthropic() {
            return Ok(());
        }

        if !self.is_enabled() {
            return Err(ValidationError::MissingRequired(key_name(
                self.primary_provider,
            )));
        }

        if let Some(fallback) = self.fallback_provider {
            if fallback == self.primary_provider {
                return Err(ValidationError::FallbackSameAsPrimary);
            }
            if !self.has_key_for(fallback) {
                return Err(ValidationError::MissingRequired(key_name(fallback)));
            }
        }

        Ok(())
    }
}

fn key_name(provider: AiProvider) -> &'static str {
    match provider {
        AiProvider::OpenAI => "OPENAI_API_KEY",
        AiProvider::Anthropic => "ANTHROPIC_API_KEY",
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            anthropic_api_key: None,
            primary_provider: default_provider(),
            fallback_provider: None,
            openai_model: default_openai_model(),
            anthropic_model: default_anthropic_model(),
            timeout_secs: default_timeout(),
            max_retries: default_retries(),
        }
    }
}

fn default_provider() -> AiProvider {
    AiProvider::OpenAI
}

fn default_openai_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_anthropic_model() -> String {
    "claude-3-5-haiku-latest".to_string()
}

fn default_timeout() -> u64 {
    20
}

fn default_retries() -> u32 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ai_config_defaults() {
        let config = AiConfig::default();
        assert_eq!(config.primary_provider, AiProvider::OpenAI);
        assert_eq!(config.timeout_secs, 20);
        assert_eq!(config.max_retries, 1);
        assert!(!config.is_enabled());
    }

    #[test]
    fn test_timeout_duration() {
        let config = AiConfig {
            timeout_secs: 10,
            ..Default::default()
        };
        assert_eq!(config.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_attempt_budget_leaves_room_for_retries() {
        let config = AiConfig {
            timeout_secs: 20,
            max_retries: 1,
            ..Default::default()
        };
        assert_eq!(config.primary_budget(), Duration::from_secs(20));
        // two attempts plus one second of backoff fit in the budget
        assert!(config.attempt_timeout() * 2 + Duration::from_secs(1) < config.timeout());

        let config = AiConfig {
            fallback_provider: Some(AiProvider::Anthropic),
            ..config
        };
        assert_eq!(config.primary_budget(), Duration::from_secs(10));
        assert!(config.attempt_timeout() * 2 + Duration::from_secs(1) < config.primary_budget());
    }

    #[test]
    fn test_has_provider_checks() {
        let config = AiConfig {
            openai_api_key: Some("sk-xxx".to_string()),
            anthropic_api_key: Some(String::new()),
            ..Default::default()
        };
        assert!(config.has_openai());
        assert!(!config.has_anthropic());
        assert!(config.is_enabled());
    }

    #[test]
    fn test_validation_rules_only_mode() {
        assert!(AiConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validation_primary_missing_key() {
        let config = AiConfig {
            primary_provider: AiProvider::Anthropic,
            openai_api_key: Some("sk-xxx".to_string()),
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::MissingRequired("ANTHROPIC_API_KEY"))
        );
    }

    #[test]
    fn test_validation_with_fallback() {
        let config = AiConfig {
            primary_provider: AiProvider::Anthropic,
            anthropic_api_key: Some("sk-ant-xxx".to_string()),
            fallback_provider: Some(AiProvider::OpenAI),
            openai_api_key: Some("sk-xxx".to_string()),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_fallback_without_key() {
        let config = AiConfig {
            openai_api_key: Some("sk-xxx".to_string()),
            fallback_provider: Some(AiProvider::Anthropic),
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::MissingRequired("ANTHROPIC_API_KEY"))
        );
    }

    #[test]
    fn test_validation_fallback_same_as_primary() {
        let config = AiConfig {
            openai_api_key: Some("sk-xxx".to_string()),
            fallback_provider: Some(AiProvider::OpenAI),
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::FallbackSameAsPrimary));
    }

    #[test]
    fn test_validation_timeout_range() {
        let config = AiConfig {
            timeout_secs: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidAiTimeout));
    }
}
