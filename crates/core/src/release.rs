//! Release state machine and metadata.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::persona::PersonaId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReleaseId(pub Uuid);

impl ReleaseId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ReleaseId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ReleaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle of a single release, mirroring the stages a track goes
/// through from generation to publish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReleaseStatus {
    Initiated,
    PreviewReady,
    PendingApproval,
    Approved,
    Rejected,
    TimedOut,
    Uploading,
    Released,
    Failed,
}

impl ReleaseStatus {
    /// Statuses from which no further transition is permitted.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            ReleaseStatus::Rejected
                | ReleaseStatus::TimedOut
                | ReleaseStatus::Released
                | ReleaseStatus::Failed
        )
    }

    pub fn allowed_transitions(self) -> &'static [ReleaseStatus] {
        use ReleaseStatus::*;
        match self {
            Initiated => &[PreviewReady, Failed],
            PreviewReady => &[PendingApproval, Failed],
            PendingApproval => &[Approved, Rejected, TimedOut, Failed],
            Approved => &[Uploading, Failed],
            Uploading => &[Released, Failed],
            Rejected | TimedOut | Released | Failed => &[],
        }
    }

    pub fn can_transition_to(self, next: ReleaseStatus) -> bool {
        self.allowed_transitions().contains(&next)
    }
}

impl fmt::Display for ReleaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ReleaseStatus::Initiated => "initiated",
            ReleaseStatus::PreviewReady => "preview_ready",
            ReleaseStatus::PendingApproval => "pending_approval",
            ReleaseStatus::Approved => "approved",
            ReleaseStatus::Rejected => "rejected",
            ReleaseStatus::TimedOut => "timed_out",
            ReleaseStatus::Uploading => "uploading",
            ReleaseStatus::Released => "released",
            ReleaseStatus::Failed => "failed",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusChange {
    pub from: Option<ReleaseStatus>,
    pub to: ReleaseStatus,
    pub at: DateTime<Utc>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Release {
    pub id: ReleaseId,
    pub persona_id: PersonaId,
    pub title: String,
    pub status: ReleaseStatus,
    pub audio_path: Option<String>,
    pub video_path: Option<String>,
    pub history: Vec<StatusChange>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Release {
    pub fn new(persona_id: PersonaId, title: impl Into<String>) -> Self {
        Self::new_with_id(ReleaseId::new(), persona_id, title)
    }

    /// Like `new`, but with a caller-supplied id. Used when a release's
    /// id must be known before the record itself is created, e.g. to tag
    /// companion video clips selected ahead of the release row existing.
    pub fn new_with_id(id: ReleaseId, persona_id: PersonaId, title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            persona_id,
            title: title.into(),
            status: ReleaseStatus::Initiated,
            audio_path: None,
            video_path: None,
            history: vec![StatusChange {
                from: None,
                to: ReleaseStatus::Initiated,
                at: now,
                note: None,
            }],
            created_at: now,
            updated_at: now,
        }
    }

    /// Advances to `next`, appending to the append-only history. Rejects
    /// transitions not in the current status's allowed set.
    pub fn advance_to(
        &mut self,
        next: ReleaseStatus,
        note: Option<String>,
    ) -> Result<(), TransitionError> {
        if !self.status.can_transition_to(next) {
            return Err(TransitionError {
                from: self.status,
                to: next,
            });
        }
        let now = Utc::now();
        self.history.push(StatusChange {
            from: Some(self.status),
            to: next,
            at: now,
            note,
        });
        self.status = next;
        self.updated_at = now;
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("invalid release transition from {from} to {to}")]
pub struct TransitionError {
    pub from: ReleaseStatus,
    pub to: ReleaseStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_transition_chain_succeeds() {
        let mut release = Release::new(PersonaId::new(), "Midnight Run");
        release.advance_to(ReleaseStatus::PreviewReady, None).unwrap();
        release.advance_to(ReleaseStatus::PendingApproval, None).unwrap();
        release.advance_to(ReleaseStatus::Approved, None).unwrap();
        release.advance_to(ReleaseStatus::Uploading, None).unwrap();
        release.advance_to(ReleaseStatus::Released, None).unwrap();
        assert_eq!(release.status, ReleaseStatus::Released);
        assert_eq!(release.history.len(), 6);
    }

    #[test]
    fn terminal_status_rejects_further_transitions() {
        let mut release = Release::new(PersonaId::new(), "Midnight Run");
        release.advance_to(ReleaseStatus::Failed, None).ok();
        release.status = ReleaseStatus::Rejected;
        assert!(release.advance_to(ReleaseStatus::Approved, None).is_err());
    }

    #[test]
    fn skipping_a_stage_is_rejected() {
        let mut release = Release::new(PersonaId::new(), "Midnight Run");
        assert!(release.advance_to(ReleaseStatus::Approved, None).is_err());
    }

    #[test]
    fn pending_approval_and_approved_can_fail() {
        let mut release = Release::new(PersonaId::new(), "Midnight Run");
        release.advance_to(ReleaseStatus::PreviewReady, None).unwrap();
        release.advance_to(ReleaseStatus::PendingApproval, None).unwrap();
        release.advance_to(ReleaseStatus::Failed, None).unwrap();
        assert_eq!(release.status, ReleaseStatus::Failed);

        let mut release = Release::new(PersonaId::new(), "Midnight Run");
        release.advance_to(ReleaseStatus::PreviewReady, None).unwrap();
        release.advance_to(ReleaseStatus::PendingApproval, None).unwrap();
        release.advance_to(ReleaseStatus::Approved, None).unwrap();
        release.advance_to(ReleaseStatus::Failed, None).unwrap();
        assert_eq!(release.status, ReleaseStatus::Failed);
    }

    #[test]
    fn new_with_id_preserves_caller_supplied_id() {
        let id = ReleaseId::new();
        let release = Release::new_with_id(id, PersonaId::new(), "Midnight Run");
        assert_eq!(release.id, id);
    }
}
