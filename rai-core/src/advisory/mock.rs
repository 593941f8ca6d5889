//! A mock advisory provider for testing, demos, and offline runs.

use super::AdvisoryProvider;
use crate::error::LlmError;
use crate::types::{Completion, Message, TokenUsage};
use async_trait::async_trait;
use std::sync::Mutex;
use std::time::Duration;

/// Canned reply used when no responses are queued.
const DEFAULT_REPLY: &str = "Advisory analysis (offline): the rule-based findings cover the \
profile as documented. Validate governance ownership, stakeholder engagement and monitoring \
arrangements with the system owner before relying on this assessment.";

/// A mock provider that returns queued replies in order.
pub struct MockAdvisoryProvider {
    model: String,
    responses: Mutex<Vec<Completion>>,
    fail: bool,
    delay: Option<Duration>,
    calls: Mutex<Vec<Vec<Message>>>,
}

impl MockAdvisoryProvider {
    pub fn new() -> Self {
        Self {
            model: "mock-model".to_string(),
            responses: Mutex::new(Vec::new()),
            fail: false,
            delay: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Create a provider that always returns the given text.
    ///
    /// Queues multiple copies so a full six-principle run is covered.
    pub fn with_response(text: &str) -> Self {
        let provider = Self::new();
        for _ in 0..12 {
            provider.queue_response(Self::text_response(text));
        }
        provider
    }

    /// Create a provider whose every call fails with a connection error.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    /// Delay every reply, for exercising timeouts.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Queue a response to be returned by the next `generate` call.
    pub fn queue_response(&self, response: Completion) {
        self.responses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(response);
    }

    /// Create a simple text reply.
    pub fn text_response(text: &str) -> Completion {
        Completion {
            content: text.to_string(),
            usage: TokenUsage {
                input_tokens: 100,
                output_tokens: 50,
            },
            model: "mock-model".to_string(),
        }
    }

    /// Number of `generate` calls received so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Messages sent on each call, in order.
    pub fn recorded_calls(&self) -> Vec<Vec<Message>> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl Default for MockAdvisoryProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AdvisoryProvider for MockAdvisoryProvider {
    async fn generate(&self, messages: &[Message]) -> Result<Completion, LlmError> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(messages.to_vec());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail {
            return Err(LlmError::Connection {
                message: "mock provider configured to fail".to_string(),
            });
        }

        let mut responses = self.responses.lock().unwrap_or_else(|e| e.into_inner());
        if responses.is_empty() {
            Ok(Self::text_response(DEFAULT_REPLY))
        } else {
            Ok(responses.remove(0))
        }
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_queued_responses_in_order() {
        let provider = MockAdvisoryProvider::new();
        provider.queue_response(MockAdvisoryProvider::text_response("first"));
        provider.queue_response(MockAdvisoryProvider::text_response("second"));

        let msgs = [Message::user("hi")];
        assert_eq!(provider.generate(&msgs).await.unwrap().content, "first");
        assert_eq!(provider.generate(&msgs).await.unwrap().content, "second");
        assert_eq!(provider.generate(&msgs).await.unwrap().content, DEFAULT_REPLY);
        assert_eq!(provider.call_count(), 3);
    }

    #[tokio::test]
    async fn test_failing_provider() {
        let provider = MockAdvisoryProvider::failing();
        let err = provider.generate(&[Message::user("hi")]).await.unwrap_err();
        assert!(matches!(err, LlmError::Connection { .. }));
        assert_eq!(provider.call_count(), 1);
    }

    #[test]
    fn test_blocking_generate() {
        let provider = MockAdvisoryProvider::with_response("ok");
        let reply = tokio_test::block_on(provider.generate(&[Message::user("hi")])).unwrap();
        assert_eq!(reply.content, "ok");
        assert_eq!(reply.usage.total(), 150);
    }
}
