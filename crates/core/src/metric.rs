//! Performance metrics recorded against released tracks, consumed by the
//! persona evolution engine's scoring pass.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::release::ReleaseId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricType {
    Likes,
    Saves,
    Views,
    Streams,
    /// A platform-specific metric with no standard weighting. Recorded
    /// for completeness but skipped by the scoring pass rather than
    /// assigned an arbitrary weight.
    Other(String),
}

impl MetricType {
    /// Weight applied to this metric type when computing a release's
    /// composite score. Likes and saves are engagement signals weighted
    /// lighter than reach (views/streams). `Other` carries no weight
    /// since the scoring pass skips it entirely.
    pub fn weight(&self) -> f64 {
        match self {
            MetricType::Likes | MetricType::Saves => 0.3,
            MetricType::Views | MetricType::Streams => 0.7,
            MetricType::Other(_) => 0.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceMetric {
    pub id: Uuid,
    pub release_id: ReleaseId,
    pub metric_type: MetricType,
    pub value: f64,
    pub recorded_at: DateTime<Utc>,
    pub platform: String,
    pub source_url: Option<String>,
    pub notes: Option<String>,
}

impl PerformanceMetric {
    pub fn new(release_id: ReleaseId, metric_type: MetricType, value: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            release_id,
            metric_type,
            value,
            recorded_at: Utc::now(),
            platform: String::new(),
            source_url: None,
            notes: None,
        }
    }

    pub fn with_recorded_at(mut self, recorded_at: DateTime<Utc>) -> Self {
        self.recorded_at = recorded_at;
        self
    }

    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = platform.into();
        self
    }
}
