use crate::config::ServerConfig;
use crate::error::ServerResult;
use metrics_exporter_prometheus::PrometheusHandle;
use ranker::Ranker;
use serde::Serialize;
use std::sync::Arc;
use store::EmbeddingStore;

/// Shared application state
///
/// Built once at startup and only read afterwards; handlers receive it as
/// `State<Arc<ServerState>>`.
#[derive(Clone)]
pub struct ServerState {
    /// Server configuration
    pub config: Arc<ServerConfig>,

    /// Ranker over the loaded embedding store (shared across requests)
    pub ranker: Arc<Ranker>,

    /// Prometheus render handle when metrics are enabled
    pub metrics: Option<PrometheusHandle>,
}

impl ServerState {
    /// Load the snapshot files named in the config and build the state.
    pub fn new(config: ServerConfig) -> ServerResult<Self> {
        let store = EmbeddingStore::load(&config.store_config())?;
        Ok(Self::with_store(config, store))
    }

    /// Build state around an already constructed store.
    pub fn with_store(config: ServerConfig, store: EmbeddingStore) -> Self {
        Self {
            config: Arc::new(config),
            ranker: Arc::new(Ranker::new(store)),
            metrics: None,
        }
    }

    pub fn with_metrics_handle(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    /// Number of recommendations served per request.
    pub fn top_k(&self) -> usize {
        self.config.top_k
    }

    pub fn store_stats(&self) -> StoreStats {
        let store = self.ranker.store();
        StoreStats {
            users: store.user_count(),
            items: store.item_count(),
            restaurants: store.restaurant_count(),
            dimension: store.dimension(),
        }
    }
}

/// Loaded snapshot sizes, reported by readiness and startup logs.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct StoreStats {
    pub users: usize,
    pub items: usize,
    pub restaurants: usize,
    pub dimension: usize,
}
