//! Drives one production cycle: pick a persona, adapt its prompt, generate
//! a track, pick companion video clips, persist durable run state, dispatch
//! for human approval, poll until a terminal decision or timeout, then
//! promote the release.

use std::sync::Arc;
use std::time::Duration;

use artist_pipeline_core::persona::Persona;
use artist_pipeline_core::release::{Release, ReleaseId, ReleaseStatus};
use artist_pipeline_core::run_status::{RunState, RunStatus};
use artist_pipeline_core::settings::SupervisorSettings;
use artist_pipeline_core::traits::{
    ApprovalChannel, ApprovalDecision, AudioFeatureSource, ProviderRequest,
};
use artist_pipeline_evolution::EvolutionEngine;
use artist_pipeline_generation::{GenerationLoop, GenerationPrompt};
use artist_pipeline_llm::Orchestrator;
use artist_pipeline_store::{PersonaStore, ReleaseStore, RunStatusStore};
use artist_pipeline_video::{StockSuccessTracker, VideoSelection, VideoSelector};
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use crate::persona_selector::PersonaSelector;
use crate::SupervisorError;

/// How many companion clips a cycle asks Video Selection for.
const NUM_VIDEOS: u32 = 3;
/// Recency window handed to the tracker when refreshing source rankings.
const SOURCE_RANKING_WINDOW_DAYS: i64 = 30;

#[derive(Debug, Clone)]
pub enum SupervisorEvent {
    StateEntered(RunState),
    Approved { release_id: ReleaseId },
    Rejected { release_id: ReleaseId },
    TimedOut { release_id: ReleaseId },
    Failed(String),
}

struct AdaptedParams {
    prompt: GenerationPrompt,
    video_keywords: Vec<String>,
}

enum PollOutcome {
    Approved,
    Rejected,
    TimedOut,
}

pub struct Supervisor {
    orchestrator: Arc<Orchestrator>,
    generation_loop: Arc<GenerationLoop>,
    video_selector: Arc<VideoSelector>,
    stock_tracker: Arc<StockSuccessTracker>,
    evolution_engine: Arc<EvolutionEngine>,
    audio_features: Arc<dyn AudioFeatureSource>,
    approval_channel: Arc<dyn ApprovalChannel>,
    persona_selector: Arc<dyn PersonaSelector>,
    persona_store: Arc<PersonaStore>,
    release_store: Arc<ReleaseStore>,
    run_status_store: Arc<RunStatusStore>,
    settings: SupervisorSettings,
    events: broadcast::Sender<SupervisorEvent>,
}

impl Supervisor {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        orchestrator: Arc<Orchestrator>,
        generation_loop: Arc<GenerationLoop>,
        video_selector: Arc<VideoSelector>,
        stock_tracker: Arc<StockSuccessTracker>,
        evolution_engine: Arc<EvolutionEngine>,
        audio_features: Arc<dyn AudioFeatureSource>,
        approval_channel: Arc<dyn ApprovalChannel>,
        persona_selector: Arc<dyn PersonaSelector>,
        persona_store: Arc<PersonaStore>,
        release_store: Arc<ReleaseStore>,
        run_status_store: Arc<RunStatusStore>,
        settings: SupervisorSettings,
    ) -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            orchestrator,
            generation_loop,
            video_selector,
            stock_tracker,
            evolution_engine,
            audio_features,
            approval_channel,
            persona_selector,
            persona_store,
            release_store,
            run_status_store,
            settings,
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SupervisorEvent> {
        self.events.subscribe()
    }

    fn emit(&self, event: SupervisorEvent) {
        let _ = self.events.send(event);
    }

    async fn with_timeout<T>(
        &self,
        fut: impl std::future::Future<Output = Result<T, SupervisorError>>,
    ) -> Result<T, SupervisorError> {
        tokio::time::timeout(
            Duration::from_secs(self.settings.collaborator_timeout_secs),
            fut,
        )
        .await
        .map_err(|_| SupervisorError::Timeout)?
    }

    /// Runs one full production cycle, returning the terminal `Release`.
    /// `cancel` is checked between steps and during approval polling.
    pub async fn run_cycle(&self, cancel: CancellationToken) -> Result<Release, SupervisorError> {
        let mut run_status = RunStatus::new();
        self.run_status_store
            .create(&run_status)
            .map_err(|e| SupervisorError::Store(e.to_string()))?;

        let result = self.drive_cycle(&mut run_status, &cancel).await;

        if let Err(ref e) = result {
            run_status.fail(e.to_string());
            let _ = self.run_status_store.update(&run_status);
            if let Some(release_id) = run_status.release_id {
                let _ = self
                    .release_store
                    .advance_to(release_id, ReleaseStatus::Failed, Some(e.to_string()));
            }
            self.emit(SupervisorEvent::Failed(e.to_string()));
        }

        result
    }

    async fn drive_cycle(
        &self,
        run_status: &mut RunStatus,
        cancel: &CancellationToken,
    ) -> Result<Release, SupervisorError> {
        let mut persona = self.select_persona().await?;
        run_status.persona_id = Some(persona.id);
        self.advance_run(run_status, RunState::PersonaSelected)?;
        self.bail_if_cancelled(cancel)?;

        self.evolve_persona(&mut persona).await?;

        let params = self.adapt_parameters(&persona).await?;
        self.advance_run(run_status, RunState::ParametersAdapted)?;
        self.bail_if_cancelled(cancel)?;

        let outcome = self.generate_track(&params.prompt).await?;
        self.advance_run(run_status, RunState::TrackGenerated)?;
        self.bail_if_cancelled(cancel)?;

        let release_id = ReleaseId::new();
        run_status.release_id = Some(release_id);
        let selection = self
            .select_video(release_id, &outcome.track.track_url, &params.video_keywords)
            .await?;
        self.advance_run(run_status, RunState::VideoSelected)?;
        self.bail_if_cancelled(cancel)?;

        let release = self
            .release_store
            .initiate_with_id(release_id, persona.id, persona.name.clone())
            .map_err(|e| SupervisorError::Store(e.to_string()))?;
        let release = self
            .release_store
            .advance_to(release.id, ReleaseStatus::PreviewReady, None)
            .map_err(|e| SupervisorError::Store(e.to_string()))?;
        let release = self
            .release_store
            .advance_to(
                release.id,
                ReleaseStatus::PendingApproval,
                Some(format!("model {}", outcome.model_used)),
            )
            .map_err(|e| SupervisorError::Store(e.to_string()))?;

        self.persist_release_refs(release.id, &outcome.track.track_url, &selection);
        self.advance_run(run_status, RunState::AwaitingApproval)?;

        self.dispatch_approval(release.id, &outcome.track.track_url)
            .await?;
        self.bail_if_cancelled(cancel)?;

        match self.poll_approval(release.id, run_status, cancel).await? {
            PollOutcome::Approved => {
                self.release_store
                    .advance_to(release.id, ReleaseStatus::Approved, None)
                    .map_err(|e| SupervisorError::Store(e.to_string()))?;
                self.advance_run(run_status, RunState::Approved)?;
                self.emit(SupervisorEvent::Approved { release_id: release.id });

                let release = self.save_approved_content(release.id)?;
                let release = self.trigger_release(release.id)?;

                self.advance_run(run_status, RunState::Released)?;
                Ok(release)
            }
            PollOutcome::Rejected => {
                let release = self
                    .release_store
                    .advance_to(release.id, ReleaseStatus::Rejected, None)
                    .map_err(|e| SupervisorError::Store(e.to_string()))?;
                self.advance_run(run_status, RunState::Rejected)?;
                self.emit(SupervisorEvent::Rejected { release_id: release.id });
                Ok(release)
            }
            PollOutcome::TimedOut => {
                let release = self
                    .release_store
                    .advance_to(release.id, ReleaseStatus::TimedOut, None)
                    .map_err(|e| SupervisorError::Store(e.to_string()))?;
                self.advance_run(run_status, RunState::TimedOut)?;
                self.emit(SupervisorEvent::TimedOut { release_id: release.id });
                Ok(release)
            }
        }
    }

    fn bail_if_cancelled(&self, cancel: &CancellationToken) -> Result<(), SupervisorError> {
        if cancel.is_cancelled() {
            return Err(SupervisorError::Cancelled);
        }
        Ok(())
    }

    fn advance_run(&self, run_status: &mut RunStatus, state: RunState) -> Result<(), SupervisorError> {
        run_status.transition(state);
        self.run_status_store
            .update(run_status)
            .map_err(|e| SupervisorError::Store(e.to_string()))?;
        self.emit(SupervisorEvent::StateEntered(state));
        Ok(())
    }

    /// Best-effort: the run-status schema doesn't carry full track/video
    /// refs, so this logs them rather than dropping them silently.
    fn persist_release_refs(&self, release_id: ReleaseId, track_url: &str, selection: &VideoSelection) {
        tracing::info!(
            %release_id,
            track_url,
            query_used = %selection.query_used,
            clip_count = selection.clips.len(),
            "release preview assembled"
        );
    }

    async fn select_persona(&self) -> Result<Persona, SupervisorError> {
        self.persona_selector.select(&self.persona_store).await
    }

    /// Scores the persona's past releases and applies the resulting
    /// reinforce/diversify/hold decision before this cycle adapts
    /// parameters from it, then persists the mutated persona. Runs every
    /// cycle; a persona with no qualifying prior releases just nudges
    /// toward experimentation.
    async fn evolve_persona(&self, persona: &mut Persona) -> Result<(), SupervisorError> {
        let release_ids = self
            .release_store
            .ids_for_persona(persona.id)
            .map_err(|e| SupervisorError::Store(e.to_string()))?;

        self.evolution_engine
            .evolve(persona, &release_ids)
            .await
            .map_err(|e| SupervisorError::Evolution(e.to_string()))?;

        self.persona_store
            .save(persona)
            .map_err(|e| SupervisorError::Store(e.to_string()))
    }

    async fn adapt_parameters(&self, persona: &Persona) -> Result<AdaptedParams, SupervisorError> {
        let keywords: Vec<String> = persona.style_keywords.iter().cloned().collect();
        let request = ProviderRequest {
            model: self.settings.prompt_adaptation_model.clone(),
            system_prompt: "You adapt a music generation brief for a specific artist persona."
                .to_string(),
            prompt: format!(
                "Persona: {} ({}). Style keywords: {}. Mood: {}. Write a one-paragraph style prompt for a new track.",
                persona.name,
                persona.genre,
                keywords.join(", "),
                persona.generation_profile.mood,
            ),
            max_tokens: Some(400),
            temperature: Some(0.7),
        };

        let response = self
            .with_timeout(async {
                self.orchestrator
                    .generate(request)
                    .await
                    .map_err(|e| SupervisorError::ParameterAdaptation(e.to_string()))
            })
            .await?;

        Ok(AdaptedParams {
            prompt: GenerationPrompt::new(response.text, persona.name.clone()),
            video_keywords: keywords,
        })
    }

    async fn generate_track(
        &self,
        prompt: &GenerationPrompt,
    ) -> Result<artist_pipeline_generation::GenerationOutcome, SupervisorError> {
        self.with_timeout(async {
            self.generation_loop
                .run(prompt)
                .await
                .map_err(|e| SupervisorError::Generation(e.to_string()))
        })
        .await
    }

    async fn select_video(
        &self,
        release_id: ReleaseId,
        track_url: &str,
        keywords: &[String],
    ) -> Result<VideoSelection, SupervisorError> {
        let features = self
            .with_timeout(async {
                self.audio_features
                    .analyze(track_url)
                    .await
                    .map_err(|e| SupervisorError::Video(e.to_string()))
            })
            .await?;

        self.stock_tracker
            .refresh(SOURCE_RANKING_WINDOW_DAYS)
            .await
            .map_err(|e| SupervisorError::Video(e.to_string()))?;
        let stats = self.stock_tracker.snapshot().await;

        self.with_timeout(async {
            self.video_selector
                .select(release_id, features, keywords, NUM_VIDEOS, &stats)
                .await
                .map_err(|e| SupervisorError::Video(e.to_string()))
        })
        .await
    }

    async fn dispatch_approval(&self, release_id: ReleaseId, preview_url: &str) -> Result<(), SupervisorError> {
        self.with_timeout(async {
            self.approval_channel
                .dispatch(release_id, preview_url)
                .await
                .map_err(|e| SupervisorError::Approval(e.to_string()))
        })
        .await
    }

    async fn poll_approval(
        &self,
        release_id: ReleaseId,
        run_status: &mut RunStatus,
        cancel: &CancellationToken,
    ) -> Result<PollOutcome, SupervisorError> {
        let budget = Duration::from_secs(self.settings.run_timeout_secs);
        let poll_interval = Duration::from_secs(self.settings.poll_interval_secs);
        let deadline = tokio::time::Instant::now() + budget;

        loop {
            self.bail_if_cancelled(cancel)?;

            let decision = self
                .with_timeout(async {
                    self.approval_channel
                        .poll(release_id)
                        .await
                        .map_err(|e| SupervisorError::Approval(e.to_string()))
                })
                .await?;

            run_status.record_poll();
            self.run_status_store
                .update(run_status)
                .map_err(|e| SupervisorError::Store(e.to_string()))?;

            match decision {
                ApprovalDecision::Approved => return Ok(PollOutcome::Approved),
                ApprovalDecision::Rejected => return Ok(PollOutcome::Rejected),
                ApprovalDecision::Pending => {}
            }

            if tokio::time::Instant::now() >= deadline {
                return Ok(PollOutcome::TimedOut);
            }

            tokio::select! {
                _ = tokio::time::sleep(poll_interval) => {}
                _ = cancel.cancelled() => return Err(SupervisorError::Cancelled),
            }
        }
    }

    /// Idempotent by `release_id`: a release already past `Approved` is
    /// left untouched rather than re-transitioned.
    fn save_approved_content(&self, release_id: ReleaseId) -> Result<Release, SupervisorError> {
        let release = self
            .release_store
            .get(release_id)
            .map_err(|e| SupervisorError::Store(e.to_string()))?;
        if release.status == ReleaseStatus::Approved {
            return self
                .release_store
                .advance_to(release_id, ReleaseStatus::Uploading, None)
                .map_err(|e| SupervisorError::Store(e.to_string()));
        }
        Ok(release)
    }

    /// Idempotent by `release_id`: calling this twice for an already
    /// `Released` release returns the existing record rather than erroring.
    fn trigger_release(&self, release_id: ReleaseId) -> Result<Release, SupervisorError> {
        let release = self
            .release_store
            .get(release_id)
            .map_err(|e| SupervisorError::Store(e.to_string()))?;
        if release.status == ReleaseStatus::Released {
            return Ok(release);
        }
        self.release_store
            .advance_to(release_id, ReleaseStatus::Released, None)
            .map_err(|e| SupervisorError::Store(e.to_string()))
    }
}
