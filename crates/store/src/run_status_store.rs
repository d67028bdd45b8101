//! Durable batch-run status, one JSON file per run under a configured
//! directory. Creation is write-once: a second attempt to create the
//! same run id is rejected rather than silently overwriting progress
//! another process may already be polling against.

use std::path::PathBuf;

use artist_pipeline_core::fsutil::{read_json, write_json_atomic, write_json_if_absent};
use artist_pipeline_core::run_status::RunStatus;
use uuid::Uuid;

use crate::StoreError;

pub struct RunStatusStore {
    dir: PathBuf,
}

impl RunStatusStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, run_id: Uuid) -> PathBuf {
        self.dir.join(format!("{run_id}.json"))
    }

    /// Persists a freshly created `RunStatus`. Fails if a status for this
    /// run id already exists.
    pub fn create(&self, status: &RunStatus) -> Result<(), StoreError> {
        let created = write_json_if_absent(&self.path_for(status.run_id), status)?;
        if !created {
            return Err(StoreError::InvalidTransition(format!(
                "run {} already has a status file",
                status.run_id
            )));
        }
        Ok(())
    }

    /// Overwrites the run's status file. The caller is expected to be
    /// the sole writer for a given run (the supervisor owns one run at a
    /// time), so last-write-wins is sufficient; the timestamp on
    /// `RunStatus` still lets a reader detect staleness.
    pub fn update(&self, status: &RunStatus) -> Result<(), StoreError> {
        write_json_atomic(&self.path_for(status.run_id), status)?;
        Ok(())
    }

    pub fn load(&self, run_id: Uuid) -> Result<RunStatus, StoreError> {
        read_json(&self.path_for(run_id)).map_err(|_| StoreError::RunNotFound(run_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use artist_pipeline_core::run_status::RunState;

    #[test]
    fn create_then_update_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = RunStatusStore::new(dir.path());
        let mut status = RunStatus::new();
        store.create(&status).unwrap();

        status.transition(RunState::PersonaSelected);
        store.update(&status).unwrap();

        let loaded = store.load(status.run_id).unwrap();
        assert_eq!(loaded.state, RunState::PersonaSelected);
    }

    #[test]
    fn duplicate_create_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = RunStatusStore::new(dir.path());
        let status = RunStatus::new();
        store.create(&status).unwrap();
        assert!(store.create(&status).is_err());
    }
}
