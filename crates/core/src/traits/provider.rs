//! LLM provider adapter trait.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Error taxonomy a provider adapter classifies every failure into. The
/// orchestrator's retry policy branches on the kind, not the message:
/// rate limits and transient API errors retry with backoff, an unexpected
/// error retries exactly once, everything else breaks immediately.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ProviderCallError {
    #[error("rate limited: {0}")]
    RateLimited(String),

    #[error("transient API error: {0}")]
    TransientAPI(String),

    #[error("content blocked: {0}")]
    ContentBlocked(String),

    #[error("authentication failed: {0}")]
    AuthFailed(String),

    #[error("provider library missing: {0}")]
    LibraryMissing(String),

    #[error("malformed response: {0}")]
    ResponseMalformed(String),

    #[error("unexpected error: {0}")]
    Unexpected(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderRequest {
    pub model: String,
    pub system_prompt: String,
    pub prompt: String,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderResponse {
    pub text: String,
    pub model: String,
    pub finish_reason: String,
}

/// A single LLM provider, e.g. OpenAI, Anthropic, or a local Ollama
/// instance. The orchestrator retries and falls back across whatever
/// adapters are registered; an adapter itself performs a single call
/// with no retry logic of its own.
///
/// # Example
///
/// ```ignore
/// let provider: Box<dyn ProviderAdapter> = Box::new(OpenAiAdapter::new(api_key));
/// let response = provider.call(request).await?;
/// ```
#[async_trait]
pub trait ProviderAdapter: Send + Sync + 'static {
    async fn call(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderCallError>;

    /// Stable identifier used in logs and fallback-notification messages,
    /// e.g. `"openai"`.
    fn name(&self) -> &str;

    /// Whether this adapter can serve `model`, used by auto-discovery to
    /// route a request to the right adapter by model name prefix.
    fn supports_model(&self, model: &str) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockProvider;

    #[async_trait]
    impl ProviderAdapter for MockProvider {
        async fn call(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderCallError> {
            Ok(ProviderResponse {
                text: format!("echo: {}", request.prompt),
                model: request.model,
                finish_reason: "stop".to_string(),
            })
        }

        fn name(&self) -> &str {
            "mock"
        }

        fn supports_model(&self, model: &str) -> bool {
            model.starts_with("mock-")
        }
    }

    #[tokio::test]
    async fn mock_provider_echoes_prompt() {
        let provider = MockProvider;
        let response = provider
            .call(ProviderRequest {
                model: "mock-1".to_string(),
                system_prompt: String::new(),
                prompt: "hello".to_string(),
                max_tokens: None,
                temperature: None,
            })
            .await
            .unwrap();
        assert_eq!(response.text, "echo: hello");
        assert!(provider.supports_model("mock-1"));
    }
}
