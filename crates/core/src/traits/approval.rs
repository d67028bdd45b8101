//! Human approval channel trait: how the supervisor asks someone to
//! approve or reject a release preview, and polls for their decision.

use async_trait::async_trait;

use crate::error::Result;
use crate::release::ReleaseId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalDecision {
    Approved,
    Rejected,
    Pending,
}

#[async_trait]
pub trait ApprovalChannel: Send + Sync + 'static {
    /// Sends the preview out for review. Idempotent: calling this again
    /// for a release that already has a pending request should not send
    /// a second notification.
    async fn dispatch(&self, release_id: ReleaseId, preview_url: &str) -> Result<()>;

    /// Non-blocking poll of the current decision state.
    async fn poll(&self, release_id: ReleaseId) -> Result<ApprovalDecision>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct AutoApprove;

    #[async_trait]
    impl ApprovalChannel for AutoApprove {
        async fn dispatch(&self, _release_id: ReleaseId, _preview_url: &str) -> Result<()> {
            Ok(())
        }

        async fn poll(&self, _release_id: ReleaseId) -> Result<ApprovalDecision> {
            Ok(ApprovalDecision::Approved)
        }
    }

    #[tokio::test]
    async fn auto_approve_channel_reports_approved() {
        let channel = AutoApprove;
        let id = ReleaseId::new();
        channel.dispatch(id, "https://example.invalid/preview").await.unwrap();
        assert_eq!(channel.poll(id).await.unwrap(), ApprovalDecision::Approved);
    }
}
