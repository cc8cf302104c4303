// Metrics hooks for the `ranker` crate.
//
// Callers install a global `RankMetrics` implementation via [`set_rank_metrics`];
// every call to [`Ranker::recommend`](crate::Ranker::recommend) then reports its
// latency and outcome. The crate itself stays independent of any metrics backend.
use std::sync::{Arc, RwLock};
use std::time::Duration;

use once_cell::sync::OnceCell;

use crate::types::RankError;

/// Metrics observer for recommendation requests.
pub trait RankMetrics: Send + Sync {
    /// Record the outcome of one recommendation.
    ///
    /// `outcome` carries the number of records returned on success, or the
    /// error that ended the request.
    fn record_recommendation(&self, latency: Duration, outcome: Result<usize, &RankError>);
}

fn metrics_lock() -> &'static RwLock<Option<Arc<dyn RankMetrics>>> {
    static METRICS: OnceCell<RwLock<Option<Arc<dyn RankMetrics>>>> = OnceCell::new();
    METRICS.get_or_init(|| RwLock::new(None))
}

pub(crate) fn metrics_recorder() -> Option<Arc<dyn RankMetrics>> {
    let guard = metrics_lock()
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    guard.clone()
}

/// Install or clear the global rank metrics recorder.
///
/// Typically called once during service startup.
pub fn set_rank_metrics(recorder: Option<Arc<dyn RankMetrics>>) {
    let lock = metrics_lock();
    let mut guard = lock
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    *guard = recorder;
}
