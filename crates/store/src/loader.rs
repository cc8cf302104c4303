use crate::StoreError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Locations of the three snapshot files the store is built from.
///
/// Every file is newline-delimited JSON, one record per line. A path ending in
/// `.zst` is read through a zstd decoder.
///
/// # Example
/// ```
/// use store::StoreConfig;
///
/// let config = StoreConfig::new(
///     "data/lightgcn/user_embedding.jsonl",
///     "data/lightgcn/item_embedding.jsonl.zst",
///     "data/cleaned/restaurants.jsonl",
/// );
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// User embeddings (`{"userID": .., "embedding": [..]}`).
    pub users_path: PathBuf,
    /// Item embeddings (`{"itemID": .., "embedding": [..]}`).
    pub items_path: PathBuf,
    /// Restaurant metadata (`{"rest_id": .., ...}`).
    pub restaurants_path: PathBuf,
}

impl StoreConfig {
    pub fn new<U, I, R>(users_path: U, items_path: I, restaurants_path: R) -> Self
    where
        U: Into<PathBuf>,
        I: Into<PathBuf>,
        R: Into<PathBuf>,
    {
        Self {
            users_path: users_path.into(),
            items_path: items_path.into(),
            restaurants_path: restaurants_path.into(),
        }
    }

    pub fn validate(&self) -> Result<(), StoreError> {
        for (name, path) in [
            ("users_path", &self.users_path),
            ("items_path", &self.items_path),
            ("restaurants_path", &self.restaurants_path),
        ] {
            if path.as_os_str().is_empty() {
                return Err(StoreError::InvalidConfig(format!(
                    "{name} must not be empty"
                )));
            }
        }
        Ok(())
    }
}

/// Compression applied to a snapshot file, chosen by extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SnapshotCodec {
    None,
    Zstd,
}

impl SnapshotCodec {
    pub fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("zst") | Some("zstd") => SnapshotCodec::Zstd,
            _ => SnapshotCodec::None,
        }
    }

    fn open(self, path: &Path) -> Result<Box<dyn BufRead>, StoreError> {
        let file = File::open(path).map_err(|e| StoreError::io(path, e))?;
        match self {
            SnapshotCodec::None => Ok(Box::new(BufReader::new(file))),
            SnapshotCodec::Zstd => {
                let decoder = zstd::Decoder::new(file).map_err(|e| StoreError::io(path, e))?;
                Ok(Box::new(BufReader::new(decoder)))
            }
        }
    }
}

/// Read every record of a JSONL snapshot file in file order.
///
/// Blank lines are skipped. The first malformed line aborts the read and is
/// reported with its 1-based line number.
pub fn read_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, StoreError> {
    let reader = SnapshotCodec::for_path(path).open(path)?;
    let mut records = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| StoreError::io(path, e))?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let record = serde_json::from_str(trimmed).map_err(|e| StoreError::Parse {
            path: path.display().to_string(),
            line: idx + 1,
            message: e.to_string(),
        })?;
        records.push(record);
    }

    log::debug!("read {} records from {}", records.len(), path.display());
    Ok(records)
}
