//! Browser automation driver trait: the fixed action grammar the
//! generation loop's UI translator emits and a concrete browser
//! implementation executes.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BrowserAction {
    Click { selector: String },
    TypeText { selector: String, text: String },
    WaitForSelector { selector: String, timeout_ms: u64 },
    GetElementText { selector: String },
    Screenshot,
    Navigate { url: String },
}

#[derive(Debug, Clone, Default)]
pub struct BrowserObservation {
    pub screenshot: Vec<u8>,
    pub action_succeeded: bool,
    pub error: Option<String>,
    /// Populated for `GetElementText`; empty for every other action kind.
    pub extracted_text: Option<String>,
}

#[async_trait]
pub trait BrowserDriver: Send + Sync + 'static {
    async fn execute(&self, action: BrowserAction) -> Result<BrowserObservation>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NoopDriver;

    #[async_trait]
    impl BrowserDriver for NoopDriver {
        async fn execute(&self, _action: BrowserAction) -> Result<BrowserObservation> {
            Ok(BrowserObservation {
                screenshot: vec![],
                action_succeeded: true,
                error: None,
                extracted_text: None,
            })
        }
    }

    #[tokio::test]
    async fn noop_driver_reports_success() {
        let driver = NoopDriver;
        let obs = driver
            .execute(BrowserAction::Click {
                selector: "#generate".to_string(),
            })
            .await
            .unwrap();
        assert!(obs.action_succeeded);
    }
}
