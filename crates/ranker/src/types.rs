use serde::{Deserialize, Serialize};
use store::{ItemId, LookupMiss, RestaurantRecord, StoreError, UserId};
use thiserror::Error;

/// Number of recommendations served per request unless configured otherwise.
pub const DEFAULT_TOP_K: usize = 20;

/// Service-level ranking configuration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct RankConfig {
    /// How many items a recommendation returns.
    #[serde(default = "RankConfig::default_top_k")]
    pub top_k: usize,
}

impl RankConfig {
    pub(crate) fn default_top_k() -> usize {
        DEFAULT_TOP_K
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// A configured default of zero would silently serve empty results, so it
    /// is refused here. Per-call `k = 0` stays legal on [`crate::Ranker`].
    pub fn validate(&self) -> Result<(), RankError> {
        if self.top_k == 0 {
            return Err(RankError::InvalidConfig(
                "top_k must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

impl Default for RankConfig {
    fn default() -> Self {
        Self {
            top_k: Self::default_top_k(),
        }
    }
}

/// An item id with its inner-product score.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct ScoredItem {
    pub item_id: ItemId,
    pub score: f32,
}

/// Restaurant records in descending score order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    pub data: Vec<RestaurantRecord>,
}

impl Recommendation {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// `rest_id`s in result order.
    pub fn item_ids(&self) -> Vec<ItemId> {
        self.data.iter().map(|record| record.rest_id).collect()
    }
}

/// Errors produced by the ranking layer.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RankError {
    /// The user has no embedding record, or more than one.
    #[error("user {user_id} not found: {reason}")]
    NotFound { user_id: UserId, reason: LookupMiss },
    /// A ranked item has no restaurant metadata record.
    #[error("item {0} was ranked but has no restaurant metadata")]
    DataIntegrity(ItemId),
    /// Invalid service configuration.
    #[error("invalid rank config: {0}")]
    InvalidConfig(String),
    /// Any other store failure.
    #[error("store error: {0}")]
    Store(StoreError),
}

impl RankError {
    /// Short stable label, used for metrics and error codes.
    pub fn kind(&self) -> &'static str {
        match self {
            RankError::NotFound { .. } => "not_found",
            RankError::DataIntegrity(_) => "data_integrity",
            RankError::InvalidConfig(_) => "invalid_config",
            RankError::Store(_) => "store",
        }
    }
}

impl From<StoreError> for RankError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { user_id, reason } => RankError::NotFound { user_id, reason },
            other => RankError::Store(other),
        }
    }
}
