//! Logging and metrics wiring for the server process.

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use ranker::{RankError, RankMetrics};
use std::sync::Arc;
use std::time::Duration;

/// Forwards ranker observations to the `metrics` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct PrometheusRankMetrics;

impl RankMetrics for PrometheusRankMetrics {
    fn record_recommendation(&self, latency: Duration, outcome: Result<usize, &RankError>) {
        let label = match outcome {
            Ok(_) => "ok",
            Err(err) => err.kind(),
        };
        metrics::counter!("restrec_recommend_total", "outcome" => label).increment(1);
        metrics::histogram!("restrec_recommend_latency_seconds").record(latency.as_secs_f64());
        if let Ok(hits) = outcome {
            metrics::histogram!("restrec_recommend_hits").record(hits as f64);
        }
    }
}

/// Install the process-wide Prometheus recorder and hook the ranker into it.
pub fn install_prometheus() -> anyhow::Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    ranker::set_rank_metrics(Some(Arc::new(PrometheusRankMetrics)));
    Ok(handle)
}

/// Structured JSON logging filtered by `log_level` (an `EnvFilter` directive).
pub fn init_tracing(log_level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_target(false)
        .with_thread_ids(true)
        .with_thread_names(true)
        .json()
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use store::LookupMiss;

    #[test]
    fn rank_observations_are_rendered() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();

        metrics::with_local_recorder(&recorder, || {
            let sink = PrometheusRankMetrics;
            sink.record_recommendation(Duration::from_millis(3), Ok(20));
            sink.record_recommendation(
                Duration::from_millis(1),
                Err(&RankError::NotFound {
                    user_id: 1,
                    reason: LookupMiss::Missing,
                }),
            );
        });

        let rendered = handle.render();
        assert!(rendered.contains("restrec_recommend_total"));
        assert!(rendered.contains("outcome=\"ok\""));
        assert!(rendered.contains("outcome=\"not_found\""));
        assert!(rendered.contains("restrec_recommend_latency_seconds"));
    }
}
