//! Analytics source trait: where the evolution engine and video
//! selection pull performance numbers from.

use async_trait::async_trait;

use crate::error::Result;
use crate::metric::PerformanceMetric;
use crate::release::ReleaseId;
use crate::source_stats::ClipMetricRecord;

#[async_trait]
pub trait MetricsSource: Send + Sync + 'static {
    async fn release_metrics(&self, release_id: ReleaseId) -> Result<Vec<PerformanceMetric>>;

    async fn clip_metrics_since(&self, days: i64) -> Result<Vec<ClipMetricRecord>>;
}
