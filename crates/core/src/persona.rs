//! Artist persona: the stable identity that generation, video selection,
//! and evolution all read from and (in evolution's case) mutate.

use std::fmt;

use chrono::{DateTime, Utc};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::progression::ProgressionAction;
use crate::release::ReleaseId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PersonaId(pub Uuid);

impl PersonaId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PersonaId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PersonaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A tempo/energy/mood envelope the generation loop draws parameters from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationProfile {
    pub tempo_min_bpm: u16,
    pub tempo_max_bpm: u16,
    pub energy: f32,
    pub mood: String,
}

impl Default for GenerationProfile {
    fn default() -> Self {
        Self {
            tempo_min_bpm: 90,
            tempo_max_bpm: 128,
            energy: 0.5,
            mood: "neutral".to_string(),
        }
    }
}

/// Operational knobs that shape how often and in what mix a persona's
/// content gets released. Grounded in a real artist profile's
/// `settings.release_strategy` block: a random window for track cadence
/// and a ratio deciding how often a release gets a companion video.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonaSettings {
    pub track_release_random_days: (u32, u32),
    pub video_release_ratio: f32,
}

impl Default for PersonaSettings {
    fn default() -> Self {
        Self {
            track_release_random_days: (1, 3),
            video_release_ratio: 0.5,
        }
    }
}

/// One entry in a persona's append-only prompt history: what an
/// evolution decision changed, and which release (if any) triggered it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptHistoryEntry {
    pub release_id: Option<ReleaseId>,
    pub action: ProgressionAction,
    pub score: f64,
    pub keywords_added: Vec<String>,
    pub keywords_removed: Vec<String>,
    pub recorded_at: DateTime<Utc>,
}

/// The artist identity. `style_keywords` behaves like an ordered set: new
/// keywords are appended, duplicates are ignored, and the original
/// insertion order is preserved so the most-established traits stay at
/// the front.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Persona {
    pub id: PersonaId,
    pub name: String,
    pub genre: String,
    pub subgenres: Vec<String>,
    pub style_keywords: IndexSet<String>,
    pub personality_traits: Vec<String>,
    pub voice_descriptor: String,
    pub audience_descriptor: String,
    pub visual_prompt: String,
    pub generation_profile: GenerationProfile,
    pub generation_count: u32,
    /// Human-readable evolution decisions, oldest first. Grown only
    /// through `push_evolution_entry`.
    pub evolution_log: Vec<String>,
    /// Structured counterpart to `evolution_log`, one entry per decision.
    pub prompt_history: Vec<PromptHistoryEntry>,
    pub settings: PersonaSettings,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Proof that the caller is allowed to apply an evolution mutation to a
/// persona. Only the evolution engine issues these; everyone else holds
/// personas read-only.
#[derive(Debug, Clone, Copy)]
pub struct PersonaMutationToken {
    _private: (),
}

impl PersonaMutationToken {
    /// Issued by the evolution engine immediately before it applies a
    /// reinforce/diversify decision. Not exported as part of the crate's
    /// public read API surface on purpose.
    pub fn issue() -> Self {
        Self { _private: () }
    }
}

impl Persona {
    pub fn new(name: impl Into<String>, genre: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: PersonaId::new(),
            name: name.into(),
            genre: genre.into(),
            subgenres: Vec::new(),
            style_keywords: IndexSet::new(),
            personality_traits: Vec::new(),
            voice_descriptor: String::new(),
            audience_descriptor: String::new(),
            visual_prompt: String::new(),
            generation_profile: GenerationProfile::default(),
            generation_count: 0,
            evolution_log: Vec::new(),
            prompt_history: Vec::new(),
            settings: PersonaSettings::default(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_keywords(mut self, keywords: impl IntoIterator<Item = String>) -> Self {
        for kw in keywords {
            self.style_keywords.insert(kw);
        }
        self
    }

    /// Append a keyword if not already present. Requires proof of mutation
    /// rights, which only the evolution engine holds.
    pub fn reinforce_keyword(&mut self, _token: PersonaMutationToken, keyword: impl Into<String>) {
        self.style_keywords.insert(keyword.into());
        self.touch();
    }

    /// Drop a keyword, used when a trait is found to correlate with
    /// underperforming releases.
    pub fn remove_keyword(&mut self, _token: PersonaMutationToken, keyword: &str) {
        self.style_keywords.shift_remove(keyword);
        self.touch();
    }

    pub fn set_mood(&mut self, _token: PersonaMutationToken, mood: impl Into<String>) {
        self.generation_profile.mood = mood.into();
        self.touch();
    }

    pub fn nudge_energy(&mut self, _token: PersonaMutationToken, delta: f32) {
        self.generation_profile.energy = (self.generation_profile.energy + delta).clamp(0.0, 1.0);
        self.touch();
    }

    pub fn record_generation(&mut self) {
        self.generation_count += 1;
        self.touch();
    }

    /// Appends one decision to both the evolution log and the prompt
    /// history. The only way either list grows; evolution decisions are
    /// never edited or removed once recorded.
    pub fn push_evolution_entry(
        &mut self,
        _token: PersonaMutationToken,
        log_message: impl Into<String>,
        prompt_entry: PromptHistoryEntry,
    ) {
        self.evolution_log.push(log_message.into());
        self.prompt_history.push(prompt_entry);
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
