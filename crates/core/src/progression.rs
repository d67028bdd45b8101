//! Append-only log of persona evolution decisions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::persona::{Persona, PersonaId};
use crate::release::ReleaseId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressionAction {
    Reinforce,
    Diversify,
    Experiment,
    /// Scores were analyzed but fell within the no-deviation band.
    Hold,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressionEntry {
    pub persona_id: PersonaId,
    pub action: ProgressionAction,
    pub keyword: String,
    pub score_at_decision: f64,
    pub releases_considered: u32,
    pub release_id: Option<ReleaseId>,
    pub decided_at: DateTime<Utc>,
    /// Human-readable account of what changed and why. Mirrored into the
    /// persona's own `evolution_log` when the decision is applied.
    pub description: String,
    /// Per-release score breakdown that fed the decision, joined into one
    /// string, e.g. `"release ..: score=12.30 | release ..: score=4.10"`.
    pub performance_summary: Option<String>,
    /// The persona's complete state immediately after this decision was
    /// applied, for audit trails that need to reconstruct history without
    /// replaying every prior decision.
    pub persona_snapshot: Option<Persona>,
}

impl ProgressionEntry {
    pub fn new(
        persona_id: PersonaId,
        action: ProgressionAction,
        keyword: impl Into<String>,
        score_at_decision: f64,
        releases_considered: u32,
        description: impl Into<String>,
    ) -> Self {
        Self {
            persona_id,
            action,
            keyword: keyword.into(),
            score_at_decision,
            releases_considered,
            release_id: None,
            decided_at: Utc::now(),
            description: description.into(),
            performance_summary: None,
            persona_snapshot: None,
        }
    }

    /// Attaches the release that triggered a reinforce/diversify decision.
    pub fn with_release(mut self, release_id: ReleaseId) -> Self {
        self.release_id = Some(release_id);
        self
    }

    pub fn with_performance_summary(mut self, summary: impl Into<String>) -> Self {
        self.performance_summary = Some(summary.into());
        self
    }

    pub fn with_persona_snapshot(mut self, persona: Persona) -> Self {
        self.persona_snapshot = Some(persona);
        self
    }
}
