//! Validator trait for judging whether a generation step produced the
//! intended result, e.g. a screenshot after a browser action.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::traits::browser::BrowserAction;

/// Strict response contract: a validator must always return all three
/// fields. `suggested_fix` is `None`/empty when `approved` is true, and
/// otherwise a concrete list of actions to retry with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationOutcome {
    pub approved: bool,
    pub feedback: String,
    pub suggested_fix: Option<Vec<BrowserAction>>,
}

#[async_trait]
pub trait VisionValidator: Send + Sync + 'static {
    /// Judge `screenshot` against `expectation`. Implementations should
    /// not be called when the action that produced the screenshot itself
    /// failed; the caller is responsible for skipping validation in that
    /// case rather than asking the validator to rationalize a failure.
    async fn validate(&self, screenshot: &[u8], expectation: &str) -> Result<ValidationOutcome>;
}
