//! Batch run supervisor.
//!
//! Ties the LLM orchestrator, browser-driven generation loop, video
//! selection, and durable release/run-status storage into one state
//! machine that drives a single persona's production cycle from
//! selection through human approval to a terminal release.

pub mod persona_selector;
pub mod supervisor;

pub use persona_selector::{LeastRecentlyProduced, PersonaSelector};
pub use supervisor::{Supervisor, SupervisorEvent};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SupervisorError {
    #[error("no eligible persona available")]
    NoEligiblePersona,

    #[error("parameter adaptation failed: {0}")]
    ParameterAdaptation(String),

    #[error("track generation failed: {0}")]
    Generation(String),

    #[error("video selection failed: {0}")]
    Video(String),

    #[error("persona evolution failed: {0}")]
    Evolution(String),

    #[error("store error: {0}")]
    Store(String),

    #[error("approval channel error: {0}")]
    Approval(String),

    #[error("collaborator call timed out")]
    Timeout,

    #[error("run was cancelled")]
    Cancelled,
}

impl From<SupervisorError> for artist_pipeline_core::Error {
    fn from(err: SupervisorError) -> Self {
        artist_pipeline_core::Error::Supervisor(err.to_string())
    }
}
