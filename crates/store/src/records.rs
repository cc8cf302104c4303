use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Identifier of a user in the embedding snapshot.
pub type UserId = i64;

/// Identifier of an item. Restaurants share this id space (`rest_id`).
pub type ItemId = i64;

/// A user and its learned embedding.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct UserRecord {
    #[serde(rename = "userID")]
    pub user_id: UserId,
    pub embedding: Vec<f32>,
}

impl UserRecord {
    pub fn new(user_id: UserId, embedding: Vec<f32>) -> Self {
        Self { user_id, embedding }
    }
}

/// An item and its learned embedding.
///
/// The id and vector travel together so that score rows can never drift out of
/// alignment with the ids they belong to.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ItemRecord {
    #[serde(rename = "itemID")]
    pub item_id: ItemId,
    pub embedding: Vec<f32>,
}

impl ItemRecord {
    pub fn new(item_id: ItemId, embedding: Vec<f32>) -> Self {
        Self { item_id, embedding }
    }
}

/// Descriptive restaurant fields keyed by `rest_id`.
///
/// Apart from the id the field set is open: whatever columns the snapshot
/// carries (name, address, cuisine, ...) are kept verbatim and serialized back
/// out next to `rest_id`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct RestaurantRecord {
    pub rest_id: ItemId,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl RestaurantRecord {
    pub fn new(rest_id: ItemId) -> Self {
        Self {
            rest_id,
            fields: Map::new(),
        }
    }

    pub fn with_field<K: Into<String>, V: Into<Value>>(mut self, key: K, value: V) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Look up a descriptive field by name.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn user_and_item_records_use_snapshot_column_names() {
        let user: UserRecord =
            serde_json::from_value(json!({ "userID": 20, "embedding": [0.5, -1.0] })).unwrap();
        assert_eq!(user, UserRecord::new(20, vec![0.5, -1.0]));

        let item: ItemRecord =
            serde_json::from_value(json!({ "itemID": 3, "embedding": [1.0] })).unwrap();
        assert_eq!(item.item_id, 3);
    }

    #[test]
    fn restaurant_record_keeps_open_fields() {
        let raw = json!({
            "rest_id": 42,
            "name": "Noodle Bar",
            "location": { "city": "Taipei" },
            "rating": 4.5
        });
        let record: RestaurantRecord = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(record.rest_id, 42);
        assert_eq!(record.field("name"), Some(&json!("Noodle Bar")));
        assert!(!record.fields.contains_key("rest_id"));

        let back = serde_json::to_value(&record).unwrap();
        assert_eq!(back, raw);
    }

    #[test]
    fn restaurant_fields_keep_snapshot_column_order() {
        let line = r#"{"rest_id":5,"zeta":1,"alpha":2,"name":"Corner Grill"}"#;
        let record: RestaurantRecord = serde_json::from_str(line).unwrap();
        assert_eq!(serde_json::to_string(&record).unwrap(), line);

        let built = RestaurantRecord::new(5)
            .with_field("zeta", 1)
            .with_field("alpha", 2);
        assert_eq!(
            serde_json::to_string(&built).unwrap(),
            r#"{"rest_id":5,"zeta":1,"alpha":2}"#
        );
    }
}
