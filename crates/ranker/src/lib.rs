//! # Restaurant Ranker (`ranker`)
//!
//! ## Purpose
//!
//! `ranker` sits on top of the embedding store (`store`). For a user id it
//! scores every item by inner product with the user's embedding, keeps the
//! K best, and joins each selected item with its restaurant record.
//!
//! ## Core Types
//!
//! - [`Ranker`]: holds the shared, read-only [`store::EmbeddingStore`] and
//!   serves [`Ranker::recommend`], [`Ranker::rank`] and
//!   [`Ranker::score_items`].
//! - [`RankConfig`]: service-level `top_k` (20 by default).
//! - [`ScoredItem`]: item id plus score, in rank order.
//! - [`Recommendation`]: the `{ "data": [...] }` response payload.
//! - [`RankError`]: `NotFound` for a missing or ambiguous user,
//!   `DataIntegrity` when a ranked item has no metadata.
//!
//! ## Ordering
//!
//! Results are in descending score order. Equal scores keep the order of the
//! item collection, so identical inputs always produce identical output.
//!
//! ## Example Usage
//!
//! ```
//! use ranker::Ranker;
//! use store::{EmbeddingStore, ItemRecord, RestaurantRecord, UserRecord};
//!
//! let store = EmbeddingStore::from_records(
//!     vec![UserRecord::new(1, vec![1.0, 0.0])],
//!     vec![ItemRecord::new(10, vec![0.2, 0.9]), ItemRecord::new(11, vec![0.8, 0.1])],
//!     vec![
//!         RestaurantRecord::new(10).with_field("name", "Bistro"),
//!         RestaurantRecord::new(11).with_field("name", "Cantina"),
//!     ],
//! )
//! .expect("valid snapshot");
//!
//! let ranker = Ranker::new(store);
//! let rec = ranker.recommend(1, 20).expect("known user");
//! assert_eq!(rec.item_ids(), vec![11, 10]);
//! ```
//!
//! ## Observability
//!
//! Install a [`RankMetrics`] implementation via [`set_rank_metrics`] to record
//! per-request latency and hit counts.

pub mod engine;
pub mod metrics;
pub mod types;

pub use crate::engine::{select_top_k, Ranker};
pub use crate::metrics::{set_rank_metrics, RankMetrics};
pub use crate::types::{RankConfig, RankError, Recommendation, ScoredItem, DEFAULT_TOP_K};
