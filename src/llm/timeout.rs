//! Per-call deadline for an `LlmProvider`.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::LlmError;
use crate::llm::provider::{CompletionRequest, CompletionResponse, LlmProvider};

/// Wraps a provider and fails any call that outlives `timeout`.
///
/// The inner future is dropped on expiry, which cancels the outbound request.
pub struct TimeoutProvider {
    inner: Arc<dyn LlmProvider>,
    timeout: Duration,
}

impl TimeoutProvider {
    pub fn new(inner: Arc<dyn LlmProvider>, timeout: Duration) -> Self {
        Self { inner, timeout }
    }
}

#[async_trait]
impl LlmProvider for TimeoutProvider {
    fn model_name(&self) -> &str {
        self.inner.model_name()
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        match tokio::time::timeout(self.timeout, self.inner.complete(request)).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(
                    model = self.inner.model_name(),
                    timeout_ms = self.timeout.as_millis() as u64,
                    "LLM call timed out"
                );
                Err(LlmError::Timeout {
                    provider: self.inner.model_name().to_string(),
                    timeout: self.timeout,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::provider::ChatMessage;

    struct SlowLlm {
        delay: Duration,
    }

    #[async_trait]
    impl LlmProvider for SlowLlm {
        fn model_name(&self) -> &str {
            "slow"
        }

        async fn complete(&self, _request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
            tokio::time::sleep(self.delay).await;
            Ok(CompletionResponse {
                content: "done".into(),
                input_tokens: 0,
                output_tokens: 0,
            })
        }
    }

    fn request() -> CompletionRequest {
        CompletionRequest::new(vec![ChatMessage::user("hello")])
    }

    #[tokio::test]
    async fn passes_through_fast_calls() {
        let provider = TimeoutProvider::new(
            Arc::new(SlowLlm {
                delay: Duration::from_millis(1),
            }),
            Duration::from_secs(5),
        );
        let response = provider.complete(request()).await.unwrap();
        assert_eq!(response.content, "done");
        assert_eq!(provider.model_name(), "slow");
    }

    #[tokio::test]
    async fn slow_call_becomes_timeout_error() {
        let provider = TimeoutProvider::new(
            Arc::new(SlowLlm {
                delay: Duration::from_secs(10),
            }),
            Duration::from_millis(20),
        );
        let err = provider.complete(request()).await.unwrap_err();
        assert!(matches!(err, LlmError::Timeout { .. }));
    }
}
