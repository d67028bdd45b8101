//! Ties scoring and rule application to a metrics source, and ensures
//! two evolution runs for the same persona never interleave.

use std::sync::Arc;

use artist_pipeline_core::persona::{Persona, PersonaMutationToken};
use artist_pipeline_core::progression::ProgressionEntry;
use artist_pipeline_core::release::ReleaseId;
use artist_pipeline_core::settings::EvolutionSettings;
use artist_pipeline_core::traits::MetricsSource;
use dashmap::DashMap;
use tokio::sync::Mutex as AsyncMutex;

use crate::rules::apply_evolution_rules;
use crate::scoring::score_release;
use crate::EvolutionError;

pub struct EvolutionEngine {
    metrics_source: Arc<dyn MetricsSource>,
    settings: EvolutionSettings,
    locks: DashMap<artist_pipeline_core::persona::PersonaId, Arc<AsyncMutex<()>>>,
}

impl EvolutionEngine {
    pub fn new(metrics_source: Arc<dyn MetricsSource>, settings: EvolutionSettings) -> Self {
        Self {
            metrics_source,
            settings,
            locks: DashMap::new(),
        }
    }

    fn lock_for(&self, persona: &Persona) -> Arc<AsyncMutex<()>> {
        self.locks
            .entry(persona.id)
            .or_insert_with(|| Arc::new(AsyncMutex::new(())))
            .clone()
    }

    /// Scores every release in `release_ids`, then applies the
    /// reinforce/diversify/hold rules to `persona`. Serialized per
    /// persona id so concurrent evolution runs for the same persona
    /// don't race on its mutation.
    pub async fn evolve(
        &self,
        persona: &mut Persona,
        release_ids: &[ReleaseId],
    ) -> Result<ProgressionEntry, EvolutionError> {
        let lock = self.lock_for(persona);
        let _guard = lock.lock().await;

        let now = chrono::Utc::now();
        let mut release_scores = Vec::new();

        for &release_id in release_ids {
            let metrics = self
                .metrics_source
                .release_metrics(release_id)
                .await
                .map_err(|e| EvolutionError::MetricsSource(e.to_string()))?;
            let score = score_release(&metrics, self.settings.decay_lambda, now);
            if score > 0.0 {
                release_scores.push((release_id, score));
            }
        }

        let token = PersonaMutationToken::issue();
        Ok(apply_evolution_rules(
            persona,
            token,
            &release_scores,
            self.settings.reinforce_multiplier,
            self.settings.diversify_multiplier,
        ))
    }
}
