//! Source-ranked clip selection.

use std::sync::Arc;

use artist_pipeline_core::release::ReleaseId;
use artist_pipeline_core::source_stats::SourceStats;
use artist_pipeline_core::traits::{AudioFeatures, StockClip, StockClipSource};
use rand::seq::SliceRandom;

use crate::query::{synthesize_query, FALLBACK_QUERIES};
use crate::tracker::StockSuccessTracker;
use crate::VideoError;

pub struct SelectedClip {
    pub source: String,
    pub clip: StockClip,
}

pub struct VideoSelection {
    pub query_used: String,
    pub clips: Vec<SelectedClip>,
}

pub struct VideoSelector {
    sources: Vec<Arc<dyn StockClipSource>>,
    tracker: Arc<StockSuccessTracker>,
}

impl VideoSelector {
    pub fn new(sources: Vec<Arc<dyn StockClipSource>>, tracker: Arc<StockSuccessTracker>) -> Self {
        Self { sources, tracker }
    }

    /// Search order: sources the tracker ranks highest over the trailing
    /// 30 days first (in ranked order), then every other registered
    /// source in randomized order.
    fn search_order(&self, stats: &SourceStats) -> Vec<Arc<dyn StockClipSource>> {
        let preferred_names: Vec<String> = stats
            .get_top_sources(30, chrono::Utc::now())
            .into_iter()
            .map(|(name, _)| name)
            .collect();

        let mut ordered = Vec::new();
        for name in &preferred_names {
            if let Some(src) = self.sources.iter().find(|s| s.name() == name) {
                ordered.push(src.clone());
            }
        }

        let mut remaining: Vec<Arc<dyn StockClipSource>> = self
            .sources
            .iter()
            .filter(|s| !preferred_names.iter().any(|n| n == s.name()))
            .cloned()
            .collect();
        remaining.shuffle(&mut rand::thread_rng());
        ordered.extend(remaining);
        ordered
    }

    async fn search_all(
        &self,
        order: &[Arc<dyn StockClipSource>],
        query: &str,
        per_source_limit: u32,
    ) -> Vec<SelectedClip> {
        let mut found = Vec::new();
        for source in order {
            match source.search(query, per_source_limit).await {
                Ok(clips) if !clips.is_empty() => {
                    for clip in clips {
                        found.push(SelectedClip {
                            source: source.name().to_string(),
                            clip,
                        });
                    }
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(source = source.name(), error = %e, "clip source search failed");
                }
            }
        }
        found
    }

    pub async fn select(
        &self,
        release_id: ReleaseId,
        features: AudioFeatures,
        persona_keywords: &[String],
        num_videos: u32,
        stats: &SourceStats,
    ) -> Result<VideoSelection, VideoError> {
        let order = self.search_order(stats);
        let preferred_names: Vec<String> = stats
            .get_top_sources(30, chrono::Utc::now())
            .into_iter()
            .map(|(name, _)| name)
            .collect();

        let query = synthesize_query(features, persona_keywords);
        let per_source_limit = (num_videos * 3).max(15);

        let mut pool = self.search_all(&order, &query, per_source_limit).await;
        let mut query_used = query;

        if pool.is_empty() {
            let mut fallbacks = FALLBACK_QUERIES.to_vec();
            fallbacks.shuffle(&mut rand::thread_rng());
            for fallback in fallbacks {
                let candidates = self.search_all(&order, fallback, per_source_limit).await;
                if !candidates.is_empty() {
                    pool = candidates;
                    query_used = fallback.to_string();
                    break;
                }
            }
        }

        if pool.is_empty() {
            return Err(VideoError::NoClipsFound);
        }

        let mut preferred_pool: Vec<SelectedClip> = pool
            .iter()
            .filter(|c| preferred_names.iter().any(|n| n == &c.source))
            .map(|c| SelectedClip {
                source: c.source.clone(),
                clip: c.clip.clone(),
            })
            .collect();
        let mut fallback_pool: Vec<SelectedClip> = std::mem::take(&mut pool)
            .into_iter()
            .filter(|c| !preferred_names.iter().any(|n| n == &c.source))
            .collect();

        preferred_pool.shuffle(&mut rand::thread_rng());
        fallback_pool.shuffle(&mut rand::thread_rng());

        preferred_pool.extend(fallback_pool);
        preferred_pool.truncate(num_videos as usize);

        for selected in &preferred_pool {
            self.tracker
                .log_clip_usage(release_id, &selected.source, &selected.clip.id)
                .await;
        }

        Ok(VideoSelection {
            query_used,
            clips: preferred_pool,
        })
    }
}
