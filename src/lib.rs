//! Workspace umbrella crate for the restaurant recommender.
//!
//! Re-exports the store, ranker and server crates so callers can load
//! snapshots, rank restaurants and serve the HTTP API from one dependency.
//!
//! ```rust,no_run
//! use restrec::{EmbeddingStore, Ranker, StoreConfig, DEFAULT_TOP_K};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = StoreConfig::new(
//!     "data/lightgcn/user_embedding.jsonl",
//!     "data/lightgcn/item_embedding.jsonl",
//!     "data/cleaned/restaurants.jsonl",
//! );
//! let store = EmbeddingStore::load(&config)?;
//! let ranker = Ranker::new(store);
//! let recommendation = ranker.recommend(42, DEFAULT_TOP_K)?;
//! println!("{} restaurants", recommendation.len());
//! # Ok(())
//! # }
//! ```

pub use ranker::{
    select_top_k, set_rank_metrics, RankConfig, RankError, RankMetrics, Ranker, Recommendation,
    ScoredItem, DEFAULT_TOP_K,
};
pub use server::{build_router, start_server, ServerConfig, ServerError, ServerState};
pub use store::{
    read_records, EmbeddingStore, ItemEmbeddings, ItemId, ItemRecord, LookupMiss,
    RestaurantRecord, SnapshotCodec, StoreConfig, StoreError, UserId, UserRecord,
};
