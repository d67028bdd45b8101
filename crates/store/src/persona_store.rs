//! Durable persona records, one JSON file per persona under a configured
//! directory. Mirrors `release_store.rs`'s cache-plus-atomic-write shape;
//! unlike releases, writes here are whole-record overwrites rather than a
//! transition-checked state machine, since persona mutation rules live in
//! the evolution engine, not the store.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use artist_pipeline_core::fsutil::{read_json, write_json_atomic};
use artist_pipeline_core::persona::{Persona, PersonaId};
use parking_lot::Mutex;

use crate::StoreError;

pub struct PersonaStore {
    dir: PathBuf,
    cache: Mutex<HashMap<PersonaId, Persona>>,
}

impl PersonaStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            cache: Mutex::new(HashMap::new()),
        }
    }

    fn path_for(&self, id: PersonaId) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }

    pub fn save(&self, persona: &Persona) -> Result<(), StoreError> {
        write_json_atomic(&self.path_for(persona.id), persona)?;
        self.cache.lock().insert(persona.id, persona.clone());
        Ok(())
    }

    pub fn get(&self, id: PersonaId) -> Result<Persona, StoreError> {
        if let Some(persona) = self.cache.lock().get(&id) {
            return Ok(persona.clone());
        }
        let persona: Persona = read_json(&self.path_for(id))
            .map_err(|_| StoreError::PersonaNotFound(id.to_string()))?;
        self.cache.lock().insert(id, persona.clone());
        Ok(persona)
    }

    /// Every persona persisted under this store's directory, read fresh
    /// off disk so selection sees personas saved by other processes.
    pub fn list_all(&self) -> Result<Vec<Persona>, StoreError> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }
        let mut personas = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let entry = entry?;
            if is_persona_file(&entry.path()) {
                let persona: Persona = read_json(&entry.path())?;
                personas.push(persona);
            }
        }
        Ok(personas)
    }
}

fn is_persona_file(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_then_get_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = PersonaStore::new(dir.path());
        let persona = Persona::new("Nova", "synthwave");
        store.save(&persona).unwrap();
        assert_eq!(store.get(persona.id).unwrap().name, "Nova");
    }

    #[test]
    fn list_all_reflects_disk_state_after_cache_eviction() {
        let dir = tempfile::tempdir().unwrap();
        let store = PersonaStore::new(dir.path());
        store.save(&Persona::new("Nova", "synthwave")).unwrap();
        store.save(&Persona::new("Echo", "lofi")).unwrap();
        store.cache.lock().clear();
        assert_eq!(store.list_all().unwrap().len(), 2);
    }
}
