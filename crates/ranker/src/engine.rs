use std::cmp::Ordering;
use std::sync::Arc;
use std::time::Instant;

use ndarray::{Array1, ArrayView1};
use store::{EmbeddingStore, UserId};

use crate::metrics::metrics_recorder;
use crate::types::{RankError, Recommendation, ScoredItem};


/// Ranks every item for a user by inner product and joins restaurant metadata.
pub struct Ranker {
    store: Arc<EmbeddingStore>,
}

impl Ranker {
    /// Construct a ranker that owns its store.
    pub fn new(store: EmbeddingStore) -> Self {
        Self::with_store_arc(Arc::new(store))
    }

    /// Construct a ranker over a shared store handle.
    pub fn with_store_arc(store: Arc<EmbeddingStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &EmbeddingStore {
        &self.store
    }

    /// Score every item against the user's vector.
    ///
    /// Item vectors are the rows of a matrix and the user vector is the column,
    /// so the scores are one matrix-vector product, aligned with
    /// `store.item_embeddings().ids()`.
    pub fn score_items(&self, user_id: UserId) -> Result<Array1<f32>, RankError> {
        let user = self.store.user_embedding(user_id)?;
        let items = self.store.item_embeddings();
        Ok(items.matrix().dot(&user))
    }

    /// The `k` best items for the user, highest score first.
    ///
    /// `k` larger than the item count returns every item.
    pub fn rank(&self, user_id: UserId, k: usize) -> Result<Vec<ScoredItem>, RankError> {
        let scores = self.score_items(user_id)?;
        let ids = self.store.item_embeddings().ids();

        Ok(select_top_k(scores.view(), k)
            .into_iter()
            .map(|pos| ScoredItem {
                item_id: ids[pos],
                score: scores[pos],
            })
            .collect())
    }

    /// Rank items for the user and materialize their restaurant records.
    ///
    /// Fails with [`RankError::NotFound`] for an unknown or ambiguous user, and
    /// with [`RankError::DataIntegrity`] if any ranked item lacks metadata.
    pub fn recommend(&self, user_id: UserId, k: usize) -> Result<Recommendation, RankError> {
        let start = Instant::now();
        let result = self.recommend_inner(user_id, k);
        let latency = start.elapsed();

        match &result {
            Ok(rec) => tracing::debug!(
                user_id,
                k,
                hits = rec.len(),
                latency_us = latency.as_micros() as u64,
                "recommendation served"
            ),
            Err(err) => tracing::warn!(user_id, k, error = %err, "recommendation failed"),
        }

        if let Some(recorder) = metrics_recorder() {
            recorder.record_recommendation(latency, result.as_ref().map(Recommendation::len));
        }

        result
    }

    fn recommend_inner(&self, user_id: UserId, k: usize) -> Result<Recommendation, RankError> {
        let ranked = self.rank(user_id, k)?;
        let data = ranked
            .iter()
            .map(|hit| {
                self.store
                    .restaurant(hit.item_id)
                    .cloned()
                    .ok_or(RankError::DataIntegrity(hit.item_id))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Recommendation { data })
    }
}

/// Positions of the `k` highest scores, best first.
///
/// Equal scores keep their original relative order (lower position first), so
/// the selection is fully deterministic. NaN scores sort after every number.
/// `k` is clamped to the number of scores.
pub fn select_top_k(scores: ArrayView1<'_, f32>, k: usize) -> Vec<usize> {
    let k = k.min(scores.len());
    if k == 0 {
        return Vec::new();
    }

    let cmp = |a: &usize, b: &usize| by_score_desc(scores[*a], scores[*b]).then_with(|| a.cmp(b));

    let mut order: Vec<usize> = (0..scores.len()).collect();
    if k < order.len() {
        // Partition so the first k positions hold the winners, then order only those.
        order.select_nth_unstable_by(k - 1, &cmp);
        order.truncate(k);
    }
    order.sort_unstable_by(&cmp);
    order
}

#[inline]
fn by_score_desc(a: f32, b: f32) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
    }
}
