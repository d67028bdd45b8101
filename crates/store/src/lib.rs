//! Durable storage for releases and batch run status.
//!
//! Both stores keep an in-memory map guarded by a mutex for fast reads
//! and durably persist every mutation to disk with atomic writes, so a
//! process restart can rebuild its view by replaying the directory.

pub mod persona_store;
pub mod release_store;
pub mod run_status_store;

pub use persona_store::PersonaStore;
pub use release_store::ReleaseStore;
pub use run_status_store::RunStatusStore;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("release {0} not found")]
    ReleaseNotFound(String),

    #[error("persona {0} not found")]
    PersonaNotFound(String),

    #[error("run {0} not found")]
    RunNotFound(String),

    #[error("invalid transition: {0}")]
    InvalidTransition(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl From<StoreError> for artist_pipeline_core::Error {
    fn from(err: StoreError) -> Self {
        artist_pipeline_core::Error::Store(err.to_string())
    }
}
