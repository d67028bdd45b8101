//! Owns the one mutable copy of `SourceStats`, the way the release store
//! owns `Release` writes and the evolution engine owns persona mutation.

use std::sync::Arc;

use artist_pipeline_core::release::ReleaseId;
use artist_pipeline_core::source_stats::{ClipMetricRecord, SourceStats};
use artist_pipeline_core::traits::MetricsSource;
use tokio::sync::Mutex;

use crate::VideoError;

pub struct StockSuccessTracker {
    metrics_source: Arc<dyn MetricsSource>,
    stats: Mutex<SourceStats>,
}

impl StockSuccessTracker {
    pub fn new(metrics_source: Arc<dyn MetricsSource>) -> Self {
        Self {
            metrics_source,
            stats: Mutex::new(SourceStats::new()),
        }
    }

    pub async fn log_metric(&self, record: ClipMetricRecord) {
        self.stats.lock().await.log_metric(record);
    }

    /// Records that `clip_id` from `source` was selected into `release_id`.
    /// Called once per clip a selection picks, independent of `refresh`.
    pub async fn log_clip_usage(&self, release_id: ReleaseId, source: &str, clip_id: &str) {
        self.stats.lock().await.log_clip_usage(release_id, source, clip_id);
    }

    /// Pulls every clip performance record from the last `days` days and
    /// rebuilds the tracked stats from them. Safe to call repeatedly;
    /// each call fully replaces the prior snapshot rather than
    /// accumulating duplicates.
    pub async fn refresh(&self, days: i64) -> Result<(), VideoError> {
        let records = self
            .metrics_source
            .clip_metrics_since(days)
            .await
            .map_err(|e| VideoError::Source(e.to_string()))?;

        let mut stats = SourceStats::new();
        for record in records {
            stats.log_metric(record);
        }
        *self.stats.lock().await = stats;
        Ok(())
    }

    pub async fn snapshot(&self) -> SourceStats {
        self.stats.lock().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use artist_pipeline_core::release::ReleaseId;
    use async_trait::async_trait;

    struct FixedClips(Vec<ClipMetricRecord>);

    #[async_trait]
    impl MetricsSource for FixedClips {
        async fn release_metrics(
            &self,
            _release_id: ReleaseId,
        ) -> artist_pipeline_core::Result<Vec<artist_pipeline_core::metric::PerformanceMetric>> {
            Ok(vec![])
        }

        async fn clip_metrics_since(
            &self,
            _days: i64,
        ) -> artist_pipeline_core::Result<Vec<ClipMetricRecord>> {
            Ok(self.0.clone())
        }
    }

    fn record(source: &str, score_input: f64) -> ClipMetricRecord {
        ClipMetricRecord {
            clip_id: format!("{source}-clip"),
            source: source.to_string(),
            likes: score_input,
            retention_pct: score_input,
            watch_time_avg_sec: score_input,
            recorded_at: chrono::Utc::now(),
        }
    }

    #[tokio::test]
    async fn refresh_populates_snapshot_from_metrics_source() {
        let tracker = StockSuccessTracker::new(Arc::new(FixedClips(vec![record("pexels", 10.0)])));
        tracker.refresh(30).await.unwrap();
        let snapshot = tracker.snapshot().await;
        let top = snapshot.get_top_sources(30, chrono::Utc::now());
        assert_eq!(top[0].0, "pexels");
    }

    #[tokio::test]
    async fn refresh_replaces_rather_than_accumulates() {
        let tracker = StockSuccessTracker::new(Arc::new(FixedClips(vec![record("pexels", 10.0)])));
        tracker.refresh(30).await.unwrap();
        tracker.refresh(30).await.unwrap();
        let snapshot = tracker.snapshot().await;
        assert_eq!(snapshot.get_top_sources(30, chrono::Utc::now()).len(), 1);
    }

    #[tokio::test]
    async fn log_clip_usage_is_visible_in_the_next_snapshot() {
        let tracker = StockSuccessTracker::new(Arc::new(FixedClips(vec![])));
        let release_id = ReleaseId::new();
        tracker.log_clip_usage(release_id, "pexels", "clip-1").await;

        let snapshot = tracker.snapshot().await;
        let entry = snapshot.clip_stats("clip-1").unwrap();
        assert_eq!(entry.usage_count, 1);
        assert!(entry.release_ids.contains(&release_id));
    }
}
