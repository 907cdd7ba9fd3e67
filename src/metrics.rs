use std::path::Path;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use crate::errors::AppError;
use crate::models::EvaluationResult;

/// Install the Prometheus recorder and register the evaluation metrics.
/// Without a recorder every macro below is a no-op, so this is only called
/// when a snapshot was requested.
pub fn init_metrics() -> Result<PrometheusHandle, AppError> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| AppError::Metrics(e.to_string()))?;

    // Pre-register counters so they appear even before the first increment.
    counter!("evaluations_total").absolute(0);
    counter!("evaluations_correct_total").absolute(0);
    counter!("provider_failures_total").absolute(0);
    counter!("safe_classified_as_unsafe_total").absolute(0);
    counter!("unsafe_classified_as_safe_total").absolute(0);

    Ok(handle)
}

/// Emit the counters for one finished evaluation.
pub fn record_result(result: &EvaluationResult) {
    counter!("evaluations_total").increment(1);
    counter!(
        "classifications_total",
        "expected" => result.expected_category.as_str(),
        "classified" => result.classified_category.as_str()
    )
    .increment(1);

    if result.correct {
        counter!("evaluations_correct_total").increment(1);
    }

    if !result.succeeded {
        counter!("provider_failures_total").increment(1);
        return;
    }

    histogram!("provider_latency_seconds").record(result.latency_ms as f64 / 1000.0);

    if result.is_safe_classified_as_unsafe() {
        counter!("safe_classified_as_unsafe_total").increment(1);
    }
    if result.is_unsafe_classified_as_safe() {
        counter!("unsafe_classified_as_safe_total").increment(1);
    }
}

/// Write the Prometheus text exposition of everything recorded so far.
pub fn write_snapshot(handle: &PrometheusHandle, path: &Path) -> Result<(), AppError> {
    std::fs::write(path, handle.render()).map_err(|source| AppError::Output {
        path: path.to_path_buf(),
        source,
    })
}
