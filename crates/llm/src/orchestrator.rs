//! Retry, backoff, and cross-provider fallback.

use std::sync::Arc;
use std::time::Duration;

use artist_pipeline_core::traits::{NotificationSink, ProviderCallError, ProviderRequest, ProviderResponse};
use uuid::Uuid;

use crate::registry::ProviderRegistry;
use crate::LlmError;

/// One provider call attempt, kept for the caller's own audit trail. Not
/// persisted by this crate; the Supervisor appends these to a release's
/// history when it wants a record of what it took to get a response.
#[derive(Debug, Clone)]
pub struct CallAttempt {
    pub provider: String,
    pub attempt: u32,
    pub error: Option<String>,
}

/// A successful `generate` call plus the log of every attempt it took,
/// including ones against providers that were eventually abandoned.
#[derive(Debug, Clone)]
pub struct GenerateOutcome {
    pub response: ProviderResponse,
    pub attempts: Vec<CallAttempt>,
}

#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Retries attempted against a single provider before falling back.
    pub max_retries: u32,
    /// Delay before the first retry; doubles on each subsequent attempt.
    pub base_delay: Duration,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(1000),
        }
    }
}

pub struct Orchestrator {
    registry: ProviderRegistry,
    config: OrchestratorConfig,
    notifier: Option<Arc<dyn NotificationSink>>,
}

impl Orchestrator {
    pub fn new(registry: ProviderRegistry, config: OrchestratorConfig) -> Self {
        Self {
            registry,
            config,
            notifier: None,
        }
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn NotificationSink>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Resolves `request.model` to a provider, retries transient failures
    /// with doubling backoff, and falls back to the next registered
    /// provider once the current one's retries are exhausted.
    pub async fn generate(&self, request: ProviderRequest) -> Result<ProviderResponse, LlmError> {
        self.generate_logged(request).await.map(|o| o.response)
    }

    /// Same as `generate`, but also returns every attempt it took to get
    /// there (including providers abandoned along the fallback chain).
    pub async fn generate_logged(&self, request: ProviderRequest) -> Result<GenerateOutcome, LlmError> {
        let chain = self.registry.fallback_chain(&request.model);
        if chain.is_empty() {
            return Err(LlmError::ModelNotFound(request.model));
        }

        let mut attempts = Vec::new();
        let mut last_error = None;

        for provider in &chain {
            match self.call_with_retry(provider.as_ref(), &request, &mut attempts).await {
                Ok(response) => return Ok(GenerateOutcome { response, attempts }),
                Err(e) => {
                    self.notify(&format!(
                        "provider {} exhausted retries, falling back: {e}",
                        provider.name()
                    ))
                    .await;
                    last_error = Some(e);
                }
            }
        }

        Err(LlmError::Exhausted(
            last_error.map(|e| e.to_string()).unwrap_or_default(),
        ))
    }

    /// Identical to `generate_logged`, with `session_id` threaded through
    /// the tracing span purely for cross-call log correlation. Has no
    /// effect on retry, fallback, or the returned outcome.
    pub async fn generate_for_session(
        &self,
        session_id: Option<Uuid>,
        request: ProviderRequest,
    ) -> Result<GenerateOutcome, LlmError> {
        let span = tracing::info_span!("llm_generate", session_id = ?session_id);
        let _entered = span.enter();
        self.generate_logged(request).await
    }

    /// Retries within a single provider. `RateLimited`/`TransientAPI` retry
    /// with doubling backoff up to `max_retries`; the first `Unexpected` is
    /// retried exactly once; every other kind (`ContentBlocked`,
    /// `AuthFailed`, `LibraryMissing`, `ResponseMalformed`) breaks out
    /// immediately so the caller can fall back to the next provider.
    async fn call_with_retry(
        &self,
        provider: &dyn artist_pipeline_core::traits::ProviderAdapter,
        request: &ProviderRequest,
        attempts: &mut Vec<CallAttempt>,
    ) -> Result<ProviderResponse, LlmError> {
        let mut delay = self.config.base_delay;
        let mut last_error: Option<ProviderCallError> = None;
        let mut unexpected_retried = false;
        let mut attempt = 0u32;

        loop {
            if attempt > 0 {
                tracing::warn!(
                    provider = provider.name(),
                    attempt,
                    ?delay,
                    "retrying provider call"
                );
                tokio::time::sleep(delay).await;
                delay *= 2;
            }

            match provider.call(request.clone()).await {
                Ok(response) => {
                    attempts.push(CallAttempt {
                        provider: provider.name().to_string(),
                        attempt,
                        error: None,
                    });
                    return Ok(response);
                }
                Err(err) => {
                    attempts.push(CallAttempt {
                        provider: provider.name().to_string(),
                        attempt,
                        error: Some(err.to_string()),
                    });

                    let should_retry = match &err {
                        ProviderCallError::RateLimited(_) | ProviderCallError::TransientAPI(_) => {
                            attempt < self.config.max_retries
                        }
                        ProviderCallError::Unexpected(_) if !unexpected_retried => {
                            unexpected_retried = true;
                            attempt < self.config.max_retries
                        }
                        _ => false,
                    };

                    last_error = Some(err);
                    if !should_retry {
                        break;
                    }
                    attempt += 1;
                }
            }
        }

        Err(LlmError::Provider(
            last_error.map(|e| e.to_string()).unwrap_or_else(|| "unknown failure".to_string()),
        ))
    }

    async fn notify(&self, message: &str) {
        if let Some(notifier) = &self.notifier {
            if let Err(e) = notifier.notify(message).await {
                tracing::error!(error = %e, "failed to send fallback notification");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use artist_pipeline_core::traits::ProviderAdapter;
    use async_trait::async_trait;
    use parking_lot::Mutex;

    struct FlakyThenOk {
        fails_remaining: Mutex<u32>,
    }

    #[async_trait]
    impl ProviderAdapter for FlakyThenOk {
        async fn call(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderCallError> {
            let mut remaining = self.fails_remaining.lock();
            if *remaining > 0 {
                *remaining -= 1;
                return Err(ProviderCallError::TransientAPI("transient".to_string()));
            }
            Ok(ProviderResponse {
                text: request.prompt,
                model: request.model,
                finish_reason: "stop".to_string(),
            })
        }

        fn name(&self) -> &str {
            "flaky"
        }

        fn supports_model(&self, model: &str) -> bool {
            model.starts_with("flaky-")
        }
    }

    struct AlwaysFails;

    #[async_trait]
    impl ProviderAdapter for AlwaysFails {
        async fn call(&self, _request: ProviderRequest) -> Result<ProviderResponse, ProviderCallError> {
            Err(ProviderCallError::TransientAPI("down".to_string()))
        }

        fn name(&self) -> &str {
            "always-fails"
        }

        fn supports_model(&self, model: &str) -> bool {
            model.starts_with("flaky-")
        }
    }

    /// Fails once with a given `ProviderCallError`, counting how many
    /// times it was actually called.
    struct FailsWith {
        error: fn() -> ProviderCallError,
        calls: Mutex<u32>,
    }

    #[async_trait]
    impl ProviderAdapter for FailsWith {
        async fn call(&self, _request: ProviderRequest) -> Result<ProviderResponse, ProviderCallError> {
            *self.calls.lock() += 1;
            Err((self.error)())
        }

        fn name(&self) -> &str {
            "fails-with"
        }

        fn supports_model(&self, model: &str) -> bool {
            model.starts_with("flaky-")
        }
    }

    fn request() -> ProviderRequest {
        ProviderRequest {
            model: "flaky-1".to_string(),
            system_prompt: String::new(),
            prompt: "hello".to_string(),
            max_tokens: None,
            temperature: None,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn retries_until_success_within_budget() {
        let mut registry = ProviderRegistry::new();
        registry.register(Arc::new(FlakyThenOk {
            fails_remaining: Mutex::new(2),
        }));
        let orchestrator = Orchestrator::new(
            registry,
            OrchestratorConfig {
                max_retries: 3,
                base_delay: Duration::from_millis(1),
            },
        );

        let response = orchestrator.generate(request()).await.unwrap();
        assert_eq!(response.text, "hello");
    }

    #[tokio::test(start_paused = true)]
    async fn falls_back_to_next_provider_after_exhaustion() {
        let mut registry = ProviderRegistry::new();
        registry.register(Arc::new(AlwaysFails));
        registry.register(Arc::new(FlakyThenOk {
            fails_remaining: Mutex::new(0),
        }));
        let orchestrator = Orchestrator::new(
            registry,
            OrchestratorConfig {
                max_retries: 1,
                base_delay: Duration::from_millis(1),
            },
        );

        let response = orchestrator.generate(request()).await.unwrap();
        assert_eq!(response.text, "hello");
    }

    #[tokio::test(start_paused = true)]
    async fn generate_logged_records_every_attempt() {
        let mut registry = ProviderRegistry::new();
        registry.register(Arc::new(FlakyThenOk {
            fails_remaining: Mutex::new(2),
        }));
        let orchestrator = Orchestrator::new(
            registry,
            OrchestratorConfig {
                max_retries: 3,
                base_delay: Duration::from_millis(1),
            },
        );

        let outcome = orchestrator.generate_logged(request()).await.unwrap();
        assert_eq!(outcome.attempts.len(), 3);
        assert!(outcome.attempts[0].error.is_some());
        assert!(outcome.attempts[1].error.is_some());
        assert!(outcome.attempts[2].error.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn generate_for_session_behaves_like_generate() {
        let mut registry = ProviderRegistry::new();
        registry.register(Arc::new(FlakyThenOk {
            fails_remaining: Mutex::new(0),
        }));
        let orchestrator = Orchestrator::new(
            registry,
            OrchestratorConfig {
                max_retries: 1,
                base_delay: Duration::from_millis(1),
            },
        );

        let outcome = orchestrator
            .generate_for_session(Some(Uuid::new_v4()), request())
            .await
            .unwrap();
        assert_eq!(outcome.response.text, "hello");
        assert_eq!(outcome.attempts.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn exhausted_when_every_provider_fails() {
        let mut registry = ProviderRegistry::new();
        registry.register(Arc::new(AlwaysFails));
        let orchestrator = Orchestrator::new(
            registry,
            OrchestratorConfig {
                max_retries: 1,
                base_delay: Duration::from_millis(1),
            },
        );

        assert!(orchestrator.generate(request()).await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn content_blocked_breaks_without_retrying() {
        let provider = Arc::new(FailsWith {
            error: || ProviderCallError::ContentBlocked("flagged".to_string()),
            calls: Mutex::new(0),
        });
        let mut registry = ProviderRegistry::new();
        registry.register(provider.clone());
        let orchestrator = Orchestrator::new(
            registry,
            OrchestratorConfig {
                max_retries: 3,
                base_delay: Duration::from_millis(1),
            },
        );

        assert!(orchestrator.generate(request()).await.is_err());
        assert_eq!(*provider.calls.lock(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn auth_failed_breaks_without_retrying() {
        let provider = Arc::new(FailsWith {
            error: || ProviderCallError::AuthFailed("bad key".to_string()),
            calls: Mutex::new(0),
        });
        let mut registry = ProviderRegistry::new();
        registry.register(provider.clone());
        let orchestrator = Orchestrator::new(
            registry,
            OrchestratorConfig {
                max_retries: 3,
                base_delay: Duration::from_millis(1),
            },
        );

        assert!(orchestrator.generate(request()).await.is_err());
        assert_eq!(*provider.calls.lock(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn unexpected_error_retries_exactly_once() {
        let provider = Arc::new(FailsWith {
            error: || ProviderCallError::Unexpected("panic-like".to_string()),
            calls: Mutex::new(0),
        });
        let mut registry = ProviderRegistry::new();
        registry.register(provider.clone());
        let orchestrator = Orchestrator::new(
            registry,
            OrchestratorConfig {
                max_retries: 3,
                base_delay: Duration::from_millis(1),
            },
        );

        assert!(orchestrator.generate(request()).await.is_err());
        assert_eq!(*provider.calls.lock(), 2);
    }
}
