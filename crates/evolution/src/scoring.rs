//! Release effectiveness scoring: a time-decayed, metric-weighted
//! average.

use chrono::{DateTime, Utc};

use artist_pipeline_core::metric::{MetricType, PerformanceMetric};

/// Weighted average of `metric.value * metric.metric_type.weight()`
/// across `metrics`, each discounted by `exp(-decay_lambda * days_old)`.
/// Returns 0.0 when there are no metrics, matching the "nothing to
/// score yet" case rather than treating it as an error.
pub fn score_release(metrics: &[PerformanceMetric], decay_lambda: f64, now: DateTime<Utc>) -> f64 {
    if metrics.is_empty() {
        return 0.0;
    }

    let mut total_weighted = 0.0;
    let mut total_weight = 0.0;

    for metric in metrics {
        if matches!(metric.metric_type, MetricType::Other(_)) {
            continue;
        }
        let days_old = (now - metric.recorded_at).num_days().max(0) as f64;
        let weight = (-decay_lambda * days_old).exp();
        let raw = metric.value * metric.metric_type.weight();
        total_weighted += raw * weight;
        total_weight += weight;
    }

    if total_weight > 0.0 {
        total_weighted / total_weight
    } else {
        0.0
    }
}
