//! Failover AI Provider - Wrapper that provides automatic failover between providers.
//!
//! When the primary provider fails with a transient error (rate limit,
//! unavailable, network, timeout), the request is retried once against the
//! fallback provider if one is configured. A primary budget bounds how long
//! the primary may run, so a hung primary still leaves time for the fallback.
//!
//! # Example
//!
//! ```ignore
//! let primary: Arc<dyn AIProvider> = Arc::new(OpenAIProvider::new(openai_config)?);
//! let fallback: Arc<dyn AIProvider> = Arc::new(AnthropicProvider::new(anthropic_config)?);
//!
//! let provider = FailoverAIProvider::new(primary)
//!     .with_fallback(fallback)
//!     .with_primary_budget(Duration::from_secs(10));
//! ```

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use crate::ports::{AIError, AIProvider, CompletionRequest, CompletionResponse, ProviderInfo};

/// AI provider wrapper with automatic failover support.
pub struct FailoverAIProvider {
    primary: Arc<dyn AIProvider>,
    fallback: Option<Arc<dyn AIProvider>>,
    primary_budget: Option<Duration>,
}

impl FailoverAIProvider {
    /// Creates a new failover provider with only a primary provider.
    pub fn new(primary: Arc<dyn AIProvider>) -> Self {
        Self {
            primary,
            fallback: None,
            primary_budget: None,
        }
    }

    /// Adds a fallback provider.
    pub fn with_fallback(mut self, fallback: Arc<dyn AIProvider>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    /// Bounds the primary call; running out counts as a retryable timeout.
    pub fn with_primary_budget(mut self, budget: Duration) -> Self {
        self.primary_budget = Some(budget);
        self
    }

    /// Returns true if a fallback is configured.
    pub fn has_fallback(&self) -> bool {
        self.fallback.is_some()
    }

    async fn call_primary(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        match self.primary_budget {
            Some(budget) => tokio::time::timeout(budget, self.primary.complete(request))
                .await
                .unwrap_or_else(|_| {
                    Err(AIError::Timeout {
                        timeout_secs: budget.as_secs() as u32,
                    })
                }),
            None => self.primary.complete(request).await,
        }
    }
}

#[async_trait]
impl AIProvider for FailoverAIProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        let err = match self.call_primary(request.clone()).await {
            Ok(response) => {
                tracing::debug!(
                    trace_id = %request.metadata.trace_id,
                    provider = %self.primary.provider_info().name,
                    prompt_tokens = response.usage.prompt_tokens,
                    completion_tokens = response.usage.completion_tokens,
                    "AI completion succeeded"
                );
                return Ok(response);
            }
            Err(err) => err,
        };

        match &self.fallback {
            Some(fallback) if err.is_retryable() => {
                tracing::warn!(
                    trace_id = %request.metadata.trace_id,
                    primary = %self.primary.provider_info().name,
                    fallback = %fallback.provider_info().name,
                    reason = %err,
                    "AI provider failover"
                );
                fallback.complete(request).await
            }
            _ => Err(err),
        }
    }

    fn provider_info(&self) -> ProviderInfo {
        self.primary.provider_info()
    }
}
