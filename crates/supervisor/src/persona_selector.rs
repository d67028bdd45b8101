//! Pluggable policy for choosing which persona produces the next release.

use artist_pipeline_core::persona::Persona;
use artist_pipeline_store::PersonaStore;
use async_trait::async_trait;

use crate::SupervisorError;

#[async_trait]
pub trait PersonaSelector: Send + Sync + 'static {
    async fn select(&self, store: &PersonaStore) -> Result<Persona, SupervisorError>;
}

/// Default policy: the persona that has gone the longest without
/// producing a release, i.e. the one with the oldest `updated_at`.
pub struct LeastRecentlyProduced;

#[async_trait]
impl PersonaSelector for LeastRecentlyProduced {
    async fn select(&self, store: &PersonaStore) -> Result<Persona, SupervisorError> {
        let personas = store
            .list_all()
            .map_err(|e| SupervisorError::Store(e.to_string()))?;

        personas
            .into_iter()
            .min_by_key(|p| p.updated_at)
            .ok_or(SupervisorError::NoEligiblePersona)
    }
}
