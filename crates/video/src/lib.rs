//! Video selection: turns a track's audio features and a persona's
//! style keywords into a search query, ranks registered stock sources
//! by recent performance, and picks clips preferring the top sources.

pub mod query;
pub mod selector;
pub mod tracker;

pub use query::synthesize_query;
pub use selector::{VideoSelection, VideoSelector};
pub use tracker::StockSuccessTracker;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum VideoError {
    #[error("no clips found for query or any fallback query")]
    NoClipsFound,

    #[error("clip source error: {0}")]
    Source(String),
}

impl From<VideoError> for artist_pipeline_core::Error {
    fn from(err: VideoError) -> Self {
        artist_pipeline_core::Error::Video(err.to_string())
    }
}
