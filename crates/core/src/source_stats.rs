//! Stock video source/clip performance tracking.
//!
//! Mirrors the scoring formula used to decide which stock footage
//! sources keep getting pulled from: a weighted blend of likes,
//! retention, and average watch time, recomputed every time a new
//! metric is logged.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::release::ReleaseId;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClipMetricRecord {
    pub clip_id: String,
    pub source: String,
    pub likes: f64,
    pub retention_pct: f64,
    pub watch_time_avg_sec: f64,
    pub recorded_at: DateTime<Utc>,
}

impl ClipMetricRecord {
    /// `likes * 0.2 + retention_pct * 0.5 + watch_time_avg_sec * 0.3`
    pub fn score(&self) -> f64 {
        self.likes * 0.2 + self.retention_pct * 0.5 + self.watch_time_avg_sec * 0.3
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ClipStats {
    pub clip_id: String,
    pub source: String,
    pub records: Vec<ClipMetricRecord>,
    /// Number of times this clip has been selected into a release.
    /// Always `>= release_ids.len()`, since a release can reuse the same
    /// clip at most once but a reselected clip across releases adds up.
    pub usage_count: u32,
    /// Releases this clip has been used in, deduplicated.
    pub release_ids: IndexSet<ReleaseId>,
}

impl ClipStats {
    pub fn average_score(&self) -> f64 {
        if self.records.is_empty() {
            return 0.0;
        }
        self.records.iter().map(ClipMetricRecord::score).sum::<f64>() / self.records.len() as f64
    }
}

/// Aggregate clip performance grouped by source, with a rolling
/// "top sources" ranking.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SourceStats {
    clips: HashMap<String, ClipStats>,
}

impl SourceStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log_metric(&mut self, record: ClipMetricRecord) {
        let entry = self.clip_entry(&record.clip_id, &record.source);
        entry.records.push(record);
    }

    /// Records that `clip_id` from `source` was selected into `release_id`.
    /// The only mutator that grows `usage_count`/`release_ids`.
    pub fn log_clip_usage(&mut self, release_id: ReleaseId, source: &str, clip_id: &str) {
        let entry = self.clip_entry(clip_id, source);
        entry.usage_count += 1;
        entry.release_ids.insert(release_id);
    }

    /// Read-only lookup of a single clip's tracked stats, used by callers
    /// that need usage counts without reaching into the full ranking.
    pub fn clip_stats(&self, clip_id: &str) -> Option<&ClipStats> {
        self.clips.get(clip_id)
    }

    fn clip_entry(&mut self, clip_id: &str, source: &str) -> &mut ClipStats {
        self.clips.entry(clip_id.to_string()).or_insert_with(|| ClipStats {
            clip_id: clip_id.to_string(),
            source: source.to_string(),
            records: Vec::new(),
            usage_count: 0,
            release_ids: IndexSet::new(),
        })
    }

    /// Sources ranked by average clip score over the trailing `days`
    /// window, highest first. Sources whose average score is exactly
    /// zero are excluded, matching the rule that a source with no
    /// positive signal yet shouldn't be preferred over an untried one.
    pub fn get_top_sources(&self, days: i64, now: DateTime<Utc>) -> Vec<(String, f64)> {
        let cutoff = now - Duration::days(days);
        let mut per_source: HashMap<String, Vec<f64>> = HashMap::new();

        for clip in self.clips.values() {
            for record in &clip.records {
                if record.recorded_at >= cutoff {
                    per_source
                        .entry(clip.source.clone())
                        .or_default()
                        .push(record.score());
                }
            }
        }

        let mut ranked: Vec<(String, f64)> = per_source
            .into_iter()
            .map(|(source, scores)| {
                let avg = scores.iter().sum::<f64>() / scores.len() as f64;
                (source, avg)
            })
            .filter(|(_, avg)| *avg != 0.0)
            .collect();

        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        ranked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(source: &str, likes: f64, retention: f64, watch: f64, at: DateTime<Utc>) -> ClipMetricRecord {
        ClipMetricRecord {
            clip_id: format!("{source}-clip"),
            source: source.to_string(),
            likes,
            retention_pct: retention,
            watch_time_avg_sec: watch,
            recorded_at: at,
        }
    }

    #[test]
    fn score_matches_weighted_formula() {
        let r = record("pexels", 10.0, 50.0, 20.0, Utc::now());
        assert!((r.score() - (10.0 * 0.2 + 50.0 * 0.5 + 20.0 * 0.3)).abs() < 1e-9);
    }

    #[test]
    fn top_sources_excludes_zero_score_and_orders_descending() {
        let now = Utc::now();
        let mut stats = SourceStats::new();
        stats.log_metric(record("good", 10.0, 80.0, 30.0, now));
        stats.log_metric(record("zero", 0.0, 0.0, 0.0, now));
        stats.log_metric(record("mid", 5.0, 40.0, 10.0, now));

        let top = stats.get_top_sources(30, now);
        let names: Vec<&str> = top.iter().map(|(s, _)| s.as_str()).collect();
        assert_eq!(names, vec!["good", "mid"]);
    }

    #[test]
    fn old_metrics_fall_outside_window() {
        let now = Utc::now();
        let mut stats = SourceStats::new();
        stats.log_metric(record("stale", 10.0, 80.0, 30.0, now - Duration::days(90)));
        let top = stats.get_top_sources(30, now);
        assert!(top.is_empty());
    }

    #[test]
    fn log_clip_usage_tracks_count_and_distinct_releases() {
        let mut stats = SourceStats::new();
        let release_a = ReleaseId::new();
        let release_b = ReleaseId::new();

        stats.log_clip_usage(release_a, "pexels", "clip-1");
        stats.log_clip_usage(release_b, "pexels", "clip-1");
        stats.log_clip_usage(release_a, "pexels", "clip-1");

        let entry = stats.clip_stats("clip-1").unwrap();
        assert_eq!(entry.usage_count, 3);
        assert_eq!(entry.release_ids.len(), 2);
        assert!(entry.usage_count as usize >= entry.release_ids.len());
    }
}
