//! Audio feature extraction trait: tempo/energy/duration analysis of a
//! generated track, used to synthesize a stock-video search query.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AudioFeatures {
    pub tempo_bpm: f32,
    pub energy: f32,
    pub duration_secs: f32,
}

#[async_trait]
pub trait AudioFeatureSource: Send + Sync + 'static {
    async fn analyze(&self, audio_path: &str) -> Result<AudioFeatures>;
}
