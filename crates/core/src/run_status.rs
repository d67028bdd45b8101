//! Durable status of a single batch run, persisted to disk by the
//! supervisor so a restart can resume polling instead of re-running
//! generation from scratch.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::persona::PersonaId;
use crate::release::ReleaseId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    Started,
    PersonaSelected,
    ParametersAdapted,
    TrackGenerated,
    VideoSelected,
    AwaitingApproval,
    Approved,
    Rejected,
    TimedOut,
    Released,
    Failed,
}

impl RunState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            RunState::Rejected | RunState::TimedOut | RunState::Released | RunState::Failed
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunStatus {
    pub run_id: Uuid,
    pub persona_id: Option<PersonaId>,
    pub release_id: Option<ReleaseId>,
    pub state: RunState,
    pub poll_count: u32,
    pub last_error: Option<String>,
    pub started_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RunStatus {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            run_id: Uuid::new_v4(),
            persona_id: None,
            release_id: None,
            state: RunState::Started,
            poll_count: 0,
            last_error: None,
            started_at: now,
            updated_at: now,
        }
    }

    pub fn transition(&mut self, state: RunState) {
        self.state = state;
        self.updated_at = Utc::now();
    }

    pub fn record_poll(&mut self) {
        self.poll_count += 1;
        self.updated_at = Utc::now();
    }

    pub fn fail(&mut self, error: impl Into<String>) {
        self.last_error = Some(error.into());
        self.transition(RunState::Failed);
    }
}

impl Default for RunStatus {
    fn default() -> Self {
        Self::new()
    }
}
