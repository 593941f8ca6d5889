//! Advisory text generation: the optional LLM commentary attached to evaluations.
//!
//! Defines the `AdvisoryProvider` trait, concrete adapters, and the
//! `AdvisoryClient` wrapper that bounds each call by a timeout and turns
//! every failure into "no commentary".

pub mod mock;
pub mod openai_compat;

use crate::config::{AdvisoryConfig, AdvisoryProviderKind};
use crate::error::LlmError;
use crate::types::{Completion, Message};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

pub use mock::MockAdvisoryProvider;
pub use openai_compat::OpenAiCompatibleProvider;

/// Trait for text-generation backends.
#[async_trait]
pub trait AdvisoryProvider: Send + Sync {
    /// Generate a reply for an ordered list of turns.
    async fn generate(&self, messages: &[Message]) -> Result<Completion, LlmError>;

    /// Return the model name.
    fn model_name(&self) -> &str;
}

/// Timeout-bounded handle on a provider. Cheap to clone.
#[derive(Clone)]
pub struct AdvisoryClient {
    provider: Arc<dyn AdvisoryProvider>,
    timeout: Duration,
}

impl std::fmt::Debug for AdvisoryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdvisoryClient")
            .field("model", &self.provider.model_name())
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl AdvisoryClient {
    pub fn new(provider: Arc<dyn AdvisoryProvider>, timeout: Duration) -> Self {
        Self { provider, timeout }
    }

    pub fn model_name(&self) -> &str {
        self.provider.model_name()
    }

    /// Ask for commentary with one system turn and one user turn.
    ///
    /// Errors, timeouts and empty replies all yield `None`; the caller's
    /// rule-based result is never affected.
    pub async fn advise(&self, system_prompt: &str, prompt: &str) -> Option<String> {
        let messages = [Message::system(system_prompt), Message::user(prompt)];
        match tokio::time::timeout(self.timeout, self.provider.generate(&messages)).await {
            Ok(Ok(completion)) => {
                debug!(
                    model = %completion.model,
                    input_tokens = completion.usage.input_tokens,
                    output_tokens = completion.usage.output_tokens,
                    "Advisory reply received"
                );
                let text = completion.content.trim();
                if text.is_empty() {
                    None
                } else {
                    Some(text.to_string())
                }
            }
            Ok(Err(e)) => {
                warn!(error = %e, "Advisory call failed; continuing without commentary");
                None
            }
            Err(_) => {
                let err = LlmError::Timeout {
                    timeout_secs: self.timeout.as_secs(),
                };
                warn!(error = %err, "Advisory call timed out; continuing without commentary");
                None
            }
        }
    }
}

/// Build the provider named in the configuration.
pub fn create_provider(config: &AdvisoryConfig) -> Result<Arc<dyn AdvisoryProvider>, LlmError> {
    match config.provider {
        AdvisoryProviderKind::Mock => Ok(Arc::new(MockAdvisoryProvider::new())),
        AdvisoryProviderKind::Openai => Ok(Arc::new(OpenAiCompatibleProvider::new(config)?)),
    }
}

/// Build an `AdvisoryClient` when advisory calls are enabled.
pub fn create_client(config: &AdvisoryConfig) -> Result<Option<AdvisoryClient>, LlmError> {
    if !config.enabled {
        return Ok(None);
    }
    let provider = create_provider(config)?;
    Ok(Some(AdvisoryClient::new(
        provider,
        Duration::from_secs(config.timeout_secs),
    )))
}
