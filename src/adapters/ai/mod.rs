//! AI Provider Adapters.
//!
//! Implementations of the AIProvider port for various LLM providers.
//!
//! ## Available Adapters
//!
//! - `MockAIProvider` - Configurable mock for testing
//! - `OpenAIProvider` - OpenAI chat completions (JSON mode)
//! - `AnthropicProvider` - Anthropic Claude models
//! - `FailoverAIProvider` - Wrapper with automatic failover between providers

mod anthropic_provider;
mod failover_provider;
mod mock_provider;
mod openai_provider;

pub use anthropic_provider::{AnthropicConfig, AnthropicProvider, DEFAULT_ANTHROPIC_MODEL};
pub use failover_provider::FailoverAIProvider;
pub use mock_provider::{MockAIProvider, MockError, MockResponse};
pub use openai_provider::{OpenAIConfig, OpenAIProvider, DEFAULT_OPENAI_MODEL};

use std::sync::Arc;

use crate::config::{AiConfig, AiProvider};
use crate::ports::{AIError, AIProvider};

/// Builds the provider chain described by `config`.
///
/// Returns `Ok(None)` when the primary provider has no API key, which puts
/// the service in rules-only mode. Each HTTP attempt gets a slice of the turn
/// budget so that retries and failover finish before the caller gives up.
pub fn build_ai_provider(config: &AiConfig) -> Result<Option<Arc<dyn AIProvider>>, AIError> {
    if !config.is_enabled() {
        tracing::info!("No AI provider key configured; running in rules-only mode");
        return Ok(None);
    }

    let primary = build_single(config, config.primary_provider)?;
    let mut chain = FailoverAIProvider::new(Arc::clone(&primary));

    if let Some(fallback) = config.fallback_provider {
        if fallback != config.primary_provider && config.has_key_for(fallback) {
            chain = chain
                .with_fallback(build_single(config, fallback)?)
                .with_primary_budget(config.primary_budget());
        }
    }

    let info = primary.provider_info();
    tracing::info!(
        provider = %info.name,
        model = %info.model,
        fallback = chain.has_fallback(),
        timeout_secs = config.timeout_secs,
        attempt_timeout_ms = config.attempt_timeout().as_millis() as u64,
        "AI provider initialized"
    );

    Ok(Some(Arc::new(chain)))
}

fn build_single(config: &AiConfig, kind: AiProvider) -> Result<Arc<dyn AIProvider>, AIError> {
    match kind {
        AiProvider::OpenAI => {
            let key = config.openai_api_key.clone().unwrap_or_default();
            let provider = OpenAIProvider::new(
                OpenAIConfig::new(key)
                    .with_model(&config.openai_model)
                    .with_timeout(config.attempt_timeout())
                    .with_max_retries(config.max_retries),
            )?;
            Ok(Arc::new(provider))
        }
        AiProvider::Anthropic => {
            let key = config.anthropic_api_key.clone().unwrap_or_default();
            let provider = AnthropicProvider::new(
                AnthropicConfig::new(key)
                    .with_model(&config.anthropic_model)
                    .with_timeout(config.attempt_timeout())
                    .with_max_retries(config.max_retries),
            )?;
            Ok(Arc::new(provider))
        }
    }
}
