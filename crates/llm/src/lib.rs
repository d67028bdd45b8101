//! Provider registry, auto-discovery, and retry/fallback core.
//!
//! Callers register one or more `ProviderAdapter`s with a `ProviderRegistry`
//! and then call `Orchestrator::generate`, which infers which provider owns
//! a model name, retries transient failures with exponential backoff, and
//! falls back to the next configured provider when one is exhausted.

pub mod registry;
pub mod orchestrator;

pub use registry::ProviderRegistry;
pub use orchestrator::{CallAttempt, GenerateOutcome, Orchestrator, OrchestratorConfig};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("no provider registered for model {0}")]
    ModelNotFound(String),

    #[error("provider error: {0}")]
    Provider(String),

    #[error("all providers exhausted: {0}")]
    Exhausted(String),

    #[error("request timed out")]
    Timeout,

    #[error("configuration error: {0}")]
    Configuration(String),
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        LlmError::Provider(err.to_string())
    }
}

impl From<LlmError> for artist_pipeline_core::Error {
    fn from(err: LlmError) -> Self {
        artist_pipeline_core::Error::Provider(err.to_string())
    }
}
