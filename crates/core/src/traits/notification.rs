//! Notification sink trait: where fallback/failure alerts go (e.g. a
//! provider falling back to a secondary, or a run hitting a terminal
//! error).

use async_trait::async_trait;

use crate::error::Result;

#[async_trait]
pub trait NotificationSink: Send + Sync + 'static {
    async fn notify(&self, message: &str) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    struct CapturingSink(Arc<Mutex<Vec<String>>>);

    #[async_trait]
    impl NotificationSink for CapturingSink {
        async fn notify(&self, message: &str) -> Result<()> {
            self.0.lock().push(message.to_string());
            Ok(())
        }
    }

    #[tokio::test]
    async fn notify_captures_message() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = CapturingSink(log.clone());
        sink.notify("provider fell back to secondary").await.unwrap();
        assert_eq!(log.lock().len(), 1);
    }
}
