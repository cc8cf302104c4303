//! # Restaurant Store
//!
//! Read-only, in-memory store of the precomputed embeddings and restaurant
//! metadata the recommender serves from. It is loaded once at process start
//! and never mutated afterwards, so it can be shared across request handlers
//! behind an `Arc` without any locking.
//!
//! ## Core Types
//!
//! - [`UserRecord`] / [`ItemRecord`]: an id paired with its embedding vector.
//! - [`RestaurantRecord`]: `rest_id` plus an open set of descriptive fields.
//! - [`EmbeddingStore`]: keyed user lookup, the stacked item matrix, and the
//!   restaurant metadata table.
//! - [`StoreConfig`]: locations of the JSONL snapshot files read by
//!   [`EmbeddingStore::load`].
//!
//! ## Lookup contract
//!
//! A user id must resolve to exactly one record. Zero matches and duplicate
//! matches both fail with [`StoreError::NotFound`]; duplicates are never
//! resolved by picking one of them.
//!
//! ## Example Usage
//!
//! ```
//! use store::{EmbeddingStore, ItemRecord, RestaurantRecord, UserRecord};
//!
//! let store = EmbeddingStore::from_records(
//!     vec![UserRecord::new(7, vec![1.0, 0.0])],
//!     vec![ItemRecord::new(1, vec![0.5, 0.5]), ItemRecord::new(2, vec![1.0, 0.0])],
//!     vec![RestaurantRecord::new(1), RestaurantRecord::new(2)],
//! )
//! .unwrap();
//!
//! let user = store.user_embedding(7).unwrap();
//! let items = store.item_embeddings();
//! let scores = items.matrix().dot(&user);
//! assert_eq!(scores.to_vec(), vec![0.5, 1.0]);
//! assert_eq!(items.ids(), &[1, 2]);
//! ```

mod loader;
mod records;

pub use loader::{read_records, SnapshotCodec, StoreConfig};
pub use records::{ItemId, ItemRecord, RestaurantRecord, UserId, UserRecord};

use hashbrown::hash_map::Entry;
use hashbrown::HashMap;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use std::fmt;
use std::path::Path;
use thiserror::Error;

/// Why a user lookup did not resolve to exactly one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupMiss {
    /// No record carries the id.
    Missing,
    /// More than one record carries the id.
    Ambiguous(usize),
}

impl fmt::Display for LookupMiss {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupMiss::Missing => write!(f, "no embedding record"),
            LookupMiss::Ambiguous(count) => write!(f, "{count} embedding records share this id"),
        }
    }
}

/// Errors raised while building or querying the store.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("user {user_id} not found: {reason}")]
    NotFound { user_id: UserId, reason: LookupMiss },
    #[error("{entity} {id} has an empty embedding")]
    EmptyEmbedding { entity: &'static str, id: i64 },
    #[error("{entity} {id} has embedding dimension {actual}, expected {expected}")]
    DimensionMismatch {
        entity: &'static str,
        id: i64,
        expected: usize,
        actual: usize,
    },
    #[error("{entity} {id} has a non-finite embedding component")]
    NonFiniteEmbedding { entity: &'static str, id: i64 },
    #[error("duplicate item id {0}")]
    DuplicateItem(ItemId),
    #[error("duplicate restaurant rest_id {0}")]
    DuplicateRestaurant(ItemId),
    #[error("failed to read snapshot {path}: {message}")]
    Io { path: String, message: String },
    #[error("malformed record in {path} at line {line}: {message}")]
    Parse {
        path: String,
        line: usize,
        message: String,
    },
    #[error("item matrix shape error: {0}")]
    Shape(String),
    #[error("invalid store config: {0}")]
    InvalidConfig(String),
}

impl StoreError {
    pub(crate) fn io<E: fmt::Display>(path: &Path, err: E) -> Self {
        Self::Io {
            path: path.display().to_string(),
            message: err.to_string(),
        }
    }

    /// True for both the missing and the ambiguous user lookup.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

/// A user slot. Duplicated ids keep only their multiplicity so lookups can
/// report the ambiguity.
#[derive(Debug, Clone)]
enum UserSlot {
    Unique(Array1<f32>),
    Duplicated(usize),
}

/// Borrowed view over every item: one matrix row per item, rows aligned with
/// [`ItemEmbeddings::ids`].
#[derive(Debug, Clone, Copy)]
pub struct ItemEmbeddings<'a> {
    ids: &'a [ItemId],
    matrix: ArrayView2<'a, f32>,
}

impl<'a> ItemEmbeddings<'a> {
    pub fn ids(&self) -> &'a [ItemId] {
        self.ids
    }

    pub fn matrix(&self) -> ArrayView2<'a, f32> {
        self.matrix
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Iterate `(item_id, embedding)` pairs in backing order.
    pub fn iter(&self) -> impl Iterator<Item = (ItemId, ArrayView1<'a, f32>)> + 'a {
        let ids = self.ids;
        let matrix = self.matrix;
        (0..ids.len()).map(move |row| (ids[row], matrix.index_axis_move(Axis(0), row)))
    }
}

/// Immutable embedding and metadata store.
#[derive(Debug, Clone)]
pub struct EmbeddingStore {
    dimension: usize,
    users: HashMap<UserId, UserSlot>,
    user_records: usize,
    item_ids: Vec<ItemId>,
    item_matrix: Array2<f32>,
    restaurants: HashMap<ItemId, RestaurantRecord>,
}

impl EmbeddingStore {
    /// Build a store from already-decoded records.
    ///
    /// All embeddings must share one non-zero dimension and contain only finite
    /// values. Item ids and restaurant ids must be unique. Duplicate user ids
    /// are accepted here and rejected per lookup.
    pub fn from_records(
        users: Vec<UserRecord>,
        items: Vec<ItemRecord>,
        restaurants: Vec<RestaurantRecord>,
    ) -> Result<Self, StoreError> {
        let dimension = items
            .first()
            .map(|item| item.embedding.len())
            .or_else(|| users.first().map(|user| user.embedding.len()))
            .unwrap_or(0);

        let mut item_ids = Vec::with_capacity(items.len());
        let mut flat = Vec::with_capacity(items.len() * dimension);
        let mut seen_items = hashbrown::HashSet::with_capacity(items.len());
        for item in items {
            check_embedding("item", item.item_id, &item.embedding, dimension)?;
            if !seen_items.insert(item.item_id) {
                return Err(StoreError::DuplicateItem(item.item_id));
            }
            item_ids.push(item.item_id);
            flat.extend_from_slice(&item.embedding);
        }
        let item_matrix = Array2::from_shape_vec((item_ids.len(), dimension), flat)
            .map_err(|e| StoreError::Shape(e.to_string()))?;

        let user_records = users.len();
        let mut user_slots: HashMap<UserId, UserSlot> = HashMap::with_capacity(users.len());
        for user in users {
            check_embedding("user", user.user_id, &user.embedding, dimension)?;
            match user_slots.entry(user.user_id) {
                Entry::Vacant(slot) => {
                    slot.insert(UserSlot::Unique(Array1::from_vec(user.embedding)));
                }
                Entry::Occupied(mut slot) => {
                    let count = match slot.get() {
                        UserSlot::Unique(_) => 2,
                        UserSlot::Duplicated(count) => count + 1,
                    };
                    slot.insert(UserSlot::Duplicated(count));
                }
            }
        }

        let mut restaurant_map = HashMap::with_capacity(restaurants.len());
        for restaurant in restaurants {
            let rest_id = restaurant.rest_id;
            if restaurant_map.insert(rest_id, restaurant).is_some() {
                return Err(StoreError::DuplicateRestaurant(rest_id));
            }
        }

        let ambiguous = user_slots
            .values()
            .filter(|slot| matches!(slot, UserSlot::Duplicated(_)))
            .count();
        if ambiguous > 0 {
            log::warn!("{ambiguous} user ids appear more than once; lookups for them will fail");
        }

        Ok(Self {
            dimension,
            users: user_slots,
            user_records,
            item_ids,
            item_matrix,
            restaurants: restaurant_map,
        })
    }

    /// Read the three snapshot files and build the store.
    pub fn load(config: &StoreConfig) -> Result<Self, StoreError> {
        config.validate()?;

        let users: Vec<UserRecord> = read_records(&config.users_path)?;
        let items: Vec<ItemRecord> = read_records(&config.items_path)?;
        let restaurants: Vec<RestaurantRecord> = read_records(&config.restaurants_path)?;

        let store = Self::from_records(users, items, restaurants)?;
        log::info!(
            "loaded embedding store: {} users, {} items, {} restaurants, dimension {}",
            store.user_count(),
            store.item_count(),
            store.restaurant_count(),
            store.dimension()
        );
        Ok(store)
    }

    /// Resolve a user's embedding, requiring exactly one matching record.
    pub fn user_embedding(&self, user_id: UserId) -> Result<ArrayView1<'_, f32>, StoreError> {
        match self.users.get(&user_id) {
            Some(UserSlot::Unique(embedding)) => Ok(embedding.view()),
            Some(UserSlot::Duplicated(count)) => Err(StoreError::NotFound {
                user_id,
                reason: LookupMiss::Ambiguous(*count),
            }),
            None => Err(StoreError::NotFound {
                user_id,
                reason: LookupMiss::Missing,
            }),
        }
    }

    /// Every item embedding stacked as matrix rows, with the aligned ids.
    pub fn item_embeddings(&self) -> ItemEmbeddings<'_> {
        ItemEmbeddings {
            ids: &self.item_ids,
            matrix: self.item_matrix.view(),
        }
    }

    pub fn restaurant(&self, item_id: ItemId) -> Option<&RestaurantRecord> {
        self.restaurants.get(&item_id)
    }

    /// Shared embedding dimensionality (0 for an empty store).
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of user records loaded, duplicates included.
    pub fn user_count(&self) -> usize {
        self.user_records
    }

    pub fn item_count(&self) -> usize {
        self.item_ids.len()
    }

    pub fn restaurant_count(&self) -> usize {
        self.restaurants.len()
    }
}

fn check_embedding(
    entity: &'static str,
    id: i64,
    embedding: &[f32],
    dimension: usize,
) -> Result<(), StoreError> {
    if embedding.is_empty() {
        return Err(StoreError::EmptyEmbedding { entity, id });
    }
    if embedding.len() != dimension {
        return Err(StoreError::DimensionMismatch {
            entity,
            id,
            expected: dimension,
            actual: embedding.len(),
        });
    }
    if embedding.iter().any(|v| !v.is_finite()) {
        return Err(StoreError::NonFiniteEmbedding { entity, id });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn sample_store() -> EmbeddingStore {
        EmbeddingStore::from_records(
            vec![
                UserRecord::new(1, vec![1.0, 2.0]),
                UserRecord::new(2, vec![0.0, 1.0]),
                UserRecord::new(2, vec![1.0, 0.0]),
                UserRecord::new(2, vec![1.0, 1.0]),
            ],
            vec![
                ItemRecord::new(30, vec![1.0, 0.0]),
                ItemRecord::new(10, vec![0.0, 1.0]),
                ItemRecord::new(20, vec![1.0, 1.0]),
            ],
            vec![
                RestaurantRecord::new(10).with_field("name", "Dumpling House"),
                RestaurantRecord::new(20),
                RestaurantRecord::new(30),
            ],
        )
        .expect("valid records")
    }

    #[test]
    fn unique_user_resolves_to_its_vector() {
        let store = sample_store();
        let emb = store.user_embedding(1).unwrap();
        assert_eq!(emb.to_vec(), vec![1.0, 2.0]);
    }

    #[test]
    fn missing_user_is_not_found() {
        let store = sample_store();
        let err = store.user_embedding(99).unwrap_err();
        assert_eq!(
            err,
            StoreError::NotFound {
                user_id: 99,
                reason: LookupMiss::Missing
            }
        );
        assert!(err.is_not_found());
    }

    #[test]
    fn duplicated_user_is_not_found_rather_than_first_match() {
        let store = sample_store();
        let err = store.user_embedding(2).unwrap_err();
        assert_eq!(
            err,
            StoreError::NotFound {
                user_id: 2,
                reason: LookupMiss::Ambiguous(3)
            }
        );
        assert!(err.to_string().contains("3 embedding records"));
        assert_eq!(store.user_count(), 4);
    }

    #[test]
    fn item_rows_stay_aligned_with_ids_in_backing_order() {
        let store = sample_store();
        let items = store.item_embeddings();
        assert_eq!(items.ids(), &[30, 10, 20]);
        assert_eq!(items.matrix().shape(), &[3, 2]);

        let pairs: Vec<(ItemId, Vec<f32>)> =
            items.iter().map(|(id, row)| (id, row.to_vec())).collect();
        assert_eq!(
            pairs,
            vec![
                (30, vec![1.0, 0.0]),
                (10, vec![0.0, 1.0]),
                (20, vec![1.0, 1.0]),
            ]
        );
    }

    #[test]
    fn restaurant_lookup_by_item_id() {
        let store = sample_store();
        let record = store.restaurant(10).unwrap();
        assert_eq!(record.field("name").unwrap(), "Dumpling House");
        assert!(store.restaurant(11).is_none());
        assert_eq!(store.restaurant_count(), 3);
    }

    #[test]
    fn dimension_mismatch_is_rejected() {
        let err = EmbeddingStore::from_records(
            vec![UserRecord::new(1, vec![1.0, 0.0, 0.0])],
            vec![ItemRecord::new(1, vec![1.0, 0.0])],
            vec![],
        )
        .unwrap_err();
        assert_eq!(
            err,
            StoreError::DimensionMismatch {
                entity: "user",
                id: 1,
                expected: 2,
                actual: 3
            }
        );
    }

    #[test]
    fn empty_and_non_finite_embeddings_are_rejected() {
        let err = EmbeddingStore::from_records(vec![], vec![ItemRecord::new(4, vec![])], vec![])
            .unwrap_err();
        assert!(matches!(err, StoreError::EmptyEmbedding { id: 4, .. }));

        let err = EmbeddingStore::from_records(
            vec![],
            vec![ItemRecord::new(5, vec![f32::NAN, 1.0])],
            vec![],
        )
        .unwrap_err();
        assert!(matches!(err, StoreError::NonFiniteEmbedding { id: 5, .. }));
    }

    #[test]
    fn duplicate_items_and_restaurants_are_rejected() {
        let err = EmbeddingStore::from_records(
            vec![],
            vec![ItemRecord::new(1, vec![1.0]), ItemRecord::new(1, vec![2.0])],
            vec![],
        )
        .unwrap_err();
        assert_eq!(err, StoreError::DuplicateItem(1));

        let err = EmbeddingStore::from_records(
            vec![],
            vec![ItemRecord::new(1, vec![1.0])],
            vec![RestaurantRecord::new(1), RestaurantRecord::new(1)],
        )
        .unwrap_err();
        assert_eq!(err, StoreError::DuplicateRestaurant(1));
    }

    #[test]
    fn empty_store_has_zero_dimension() {
        let store = EmbeddingStore::from_records(vec![], vec![], vec![]).unwrap();
        assert_eq!(store.dimension(), 0);
        assert!(store.item_embeddings().is_empty());
    }

    #[test]
    fn load_reads_all_three_snapshots() {
        let dir = tempfile::tempdir().unwrap();
        let users = dir.path().join("users.jsonl");
        let items = dir.path().join("items.jsonl.zst");
        let restaurants = dir.path().join("restaurants.jsonl");

        std::fs::write(&users, "{\"userID\": 5, \"embedding\": [1.0, 0.0]}\n").unwrap();
        let item_body = "{\"itemID\": 1, \"embedding\": [0.5, 0.5]}\n\
                         {\"itemID\": 2, \"embedding\": [1.0, 0.0]}\n";
        let mut item_file = std::fs::File::create(&items).unwrap();
        item_file
            .write_all(&zstd::encode_all(item_body.as_bytes(), 3).unwrap())
            .unwrap();
        std::fs::write(
            &restaurants,
            "{\"rest_id\": 1, \"name\": \"A\"}\n{\"rest_id\": 2, \"name\": \"B\"}\n",
        )
        .unwrap();

        let store = EmbeddingStore::load(&StoreConfig::new(users, items, restaurants)).unwrap();
        assert_eq!(store.user_count(), 1);
        assert_eq!(store.item_count(), 2);
        assert_eq!(store.restaurant_count(), 2);
        assert_eq!(store.dimension(), 2);
    }
}
