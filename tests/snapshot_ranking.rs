//! Ranking over the bundled sample snapshots under `data/`.

use restrec::{
    EmbeddingStore, LookupMiss, RankError, Ranker, StoreConfig, StoreError, DEFAULT_TOP_K,
};
use std::io::Write;
use std::path::PathBuf;

fn data_path(relative: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(relative)
}

fn sample_config() -> StoreConfig {
    StoreConfig::new(
        data_path("data/lightgcn/user_embedding.jsonl"),
        data_path("data/lightgcn/item_embedding.jsonl"),
        data_path("data/cleaned/restaurants.jsonl"),
    )
}

fn sample_ranker() -> Ranker {
    Ranker::new(EmbeddingStore::load(&sample_config()).expect("sample snapshots load"))
}

#[test]
fn sample_snapshots_load() {
    let ranker = sample_ranker();
    let store = ranker.store();
    assert_eq!(store.user_count(), 10);
    assert_eq!(store.item_count(), 30);
    assert_eq!(store.restaurant_count(), 30);
    assert_eq!(store.dimension(), 8);
}

#[test]
fn every_sample_user_gets_twenty_ordered_restaurants() {
    let ranker = sample_ranker();

    for user_id in 1..=10 {
        let rec = ranker.recommend(user_id, DEFAULT_TOP_K).unwrap();
        assert_eq!(rec.len(), DEFAULT_TOP_K);

        let scores = ranker.score_items(user_id).unwrap();
        let ids = ranker.store().item_embeddings().ids().to_vec();
        let score_of = |item| scores[ids.iter().position(|&id| id == item).unwrap()];

        let ranked = rec.item_ids();
        for pair in ranked.windows(2) {
            assert!(score_of(pair[0]) >= score_of(pair[1]));
        }

        // Nothing left out scores above the last returned restaurant.
        let floor = score_of(*ranked.last().unwrap());
        for id in ids.iter().filter(|id| !ranked.contains(id)) {
            assert!(score_of(*id) <= floor);
        }
    }
}

#[test]
fn recommendation_matches_manual_inner_products() {
    let ranker = sample_ranker();
    let store = ranker.store();
    let user = store.user_embedding(4).unwrap().to_owned();

    let mut manual: Vec<(i64, f32)> = store
        .item_embeddings()
        .iter()
        .map(|(id, row)| (id, row.iter().zip(user.iter()).map(|(a, b)| a * b).sum::<f32>()))
        .collect();
    manual.sort_by(|a, b| b.1.total_cmp(&a.1));

    let ranked = ranker.rank(4, 5).unwrap();
    for (hit, (id, score)) in ranked.iter().zip(&manual) {
        assert_eq!(hit.item_id, *id);
        assert!((hit.score - score).abs() < 1e-5);
    }
}

#[test]
fn unknown_sample_user_is_not_found() {
    let err = sample_ranker().recommend(11, DEFAULT_TOP_K).unwrap_err();
    assert_eq!(
        err,
        RankError::NotFound {
            user_id: 11,
            reason: LookupMiss::Missing,
        }
    );
}

#[test]
fn dimension_mismatch_in_snapshot_fails_load() {
    let dir = tempfile::tempdir().unwrap();
    let users = dir.path().join("users.jsonl");
    let mut file = std::fs::File::create(&users).unwrap();
    writeln!(file, r#"{{"userID": 1, "embedding": [0.1, 0.2, 0.3]}}"#).unwrap();

    let config = StoreConfig::new(
        &users,
        data_path("data/lightgcn/item_embedding.jsonl"),
        data_path("data/cleaned/restaurants.jsonl"),
    );
    let err = EmbeddingStore::load(&config).unwrap_err();
    assert!(matches!(
        err,
        StoreError::DimensionMismatch {
            expected: 8,
            actual: 3,
            ..
        }
    ));
}
