//! Browser-driven generation loop.
//!
//! Translates a structured generation prompt into a sequence of browser
//! actions against a music-generation web UI, executes them one at a
//! time, validates the risky ones with a vision model, and retries with
//! a model-suggested fix up to a bounded number of rounds before giving
//! up.

pub mod prompt;
pub mod translator;
pub mod generation_loop;

pub use prompt::{GenerationPrompt, LyricsMode};
pub use translator::translate_prompt_to_actions;
pub use generation_loop::{GenerationLoop, GenerationOutcome, TrackRef};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("browser action failed: {0}")]
    ActionFailed(String),

    #[error("validation rejected after exhausting repair rounds: {0}")]
    ValidationExhausted(String),

    #[error("could not extract final output: {0}")]
    ExtractionFailed(String),
}

impl From<GenerationError> for artist_pipeline_core::Error {
    fn from(err: GenerationError) -> Self {
        artist_pipeline_core::Error::Generation(err.to_string())
    }
}
