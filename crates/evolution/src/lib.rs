//! Persona evolution engine.
//!
//! Scores each release a persona has put out, then decides whether to
//! reinforce a trait that correlates with a standout release, diversify
//! away from a trait behind an underperformer, or hold if nothing
//! stands out. Concurrent evolutions of the same persona are serialized
//! so two runs never race on the same mutation.

pub mod scoring;
pub mod rules;
pub mod engine;

pub use scoring::score_release;
pub use rules::apply_evolution_rules;
pub use engine::EvolutionEngine;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EvolutionError {
    #[error("metrics source error: {0}")]
    MetricsSource(String),
}

impl From<EvolutionError> for artist_pipeline_core::Error {
    fn from(err: EvolutionError) -> Self {
        artist_pipeline_core::Error::Evolution(err.to_string())
    }
}
