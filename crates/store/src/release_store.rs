//! CRUD and transition enforcement over `Release`, backed by one JSON
//! file per release under a configured directory.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use artist_pipeline_core::fsutil::{read_json, write_json_atomic};
use artist_pipeline_core::persona::PersonaId;
use artist_pipeline_core::release::{Release, ReleaseId, ReleaseStatus};
use parking_lot::Mutex;

use crate::StoreError;

pub struct ReleaseStore {
    dir: PathBuf,
    cache: Mutex<HashMap<ReleaseId, Release>>,
}

impl ReleaseStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            cache: Mutex::new(HashMap::new()),
        }
    }

    fn path_for(&self, id: ReleaseId) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }

    pub fn initiate(&self, persona_id: PersonaId, title: impl Into<String>) -> Result<Release, StoreError> {
        self.initiate_with_id(ReleaseId::new(), persona_id, title)
    }

    /// Like `initiate`, but with a caller-supplied id. Used when other
    /// collaborators (video selection) must tag their own records with the
    /// release id before the release row itself exists.
    pub fn initiate_with_id(
        &self,
        id: ReleaseId,
        persona_id: PersonaId,
        title: impl Into<String>,
    ) -> Result<Release, StoreError> {
        let release = Release::new_with_id(id, persona_id, title);
        write_json_atomic(&self.path_for(release.id), &release)?;
        self.cache.lock().insert(release.id, release.clone());
        Ok(release)
    }

    pub fn advance_to(
        &self,
        id: ReleaseId,
        next: ReleaseStatus,
        note: Option<String>,
    ) -> Result<Release, StoreError> {
        let mut release = self.get(id)?;

        release
            .advance_to(next, note)
            .map_err(|e| StoreError::InvalidTransition(e.to_string()))?;

        write_json_atomic(&self.path_for(id), &release)?;
        self.cache.lock().insert(id, release.clone());
        Ok(release)
    }

    pub fn get_status(&self, id: ReleaseId) -> Result<ReleaseStatus, StoreError> {
        self.get(id).map(|r| r.status)
    }

    pub fn get(&self, id: ReleaseId) -> Result<Release, StoreError> {
        if let Some(release) = self.cache.lock().get(&id) {
            return Ok(release.clone());
        }
        let release: Release = read_json(&self.path_for(id))
            .map_err(|_| StoreError::ReleaseNotFound(id.to_string()))?;
        self.cache.lock().insert(id, release.clone());
        Ok(release)
    }

    /// Every release id persisted in the store's directory, read off
    /// disk rather than the in-memory cache so this reflects state from
    /// prior process runs too.
    pub fn list_ids(&self) -> Result<Vec<ReleaseId>, StoreError> {
        list_json_stems(&self.dir)
    }

    /// Release ids belonging to `persona_id`, used by the evolution engine
    /// to score a persona's past output before producing new content.
    pub fn ids_for_persona(&self, persona_id: PersonaId) -> Result<Vec<ReleaseId>, StoreError> {
        let mut ids = Vec::new();
        for id in self.list_ids()? {
            if self.get(id)?.persona_id == persona_id {
                ids.push(id);
            }
        }
        Ok(ids)
    }
}

fn list_json_stems(dir: &Path) -> Result<Vec<ReleaseId>, StoreError> {
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let mut ids = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if let Some(stem) = entry.path().file_stem().and_then(|s| s.to_str()) {
            if let Ok(uuid) = uuid::Uuid::parse_str(stem) {
                ids.push(ReleaseId(uuid));
            }
        }
    }
    Ok(ids)
}
