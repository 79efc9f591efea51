//! Data models for the Raindrop.io REST API.
//!
//! Read models tolerate missing fields (the API omits plenty depending on
//! the endpoint); write models skip `None` fields so a PATCH-style update
//! only sends what the caller set.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reference to a parent collection, `{"$id": 123}` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentRef {
    #[serde(rename = "$id")]
    pub id: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Collection {
    #[serde(rename = "_id")]
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub count: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<ParentRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expanded: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
    #[serde(default, rename = "lastUpdate", skip_serializing_if = "Option::is_none")]
    pub last_update: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollectionCreate {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<ParentRef>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollectionUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<ParentRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expanded: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Raindrop {
    #[serde(rename = "_id")]
    pub id: i64,
    pub link: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
    #[serde(default, rename = "lastUpdate", skip_serializing_if = "Option::is_none")]
    pub last_update: Option<DateTime<Utc>>,
    /// link, article, image, video, document, or audio.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub important: Option<bool>,
    #[serde(default = "unsorted_collection", rename = "collectionId")]
    pub collection_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub broken: Option<bool>,
}

fn unsorted_collection() -> i64 {
    -1
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RaindropUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(rename = "collectionId", skip_serializing_if = "Option::is_none")]
    pub collection_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection: Option<ParentRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: i64,
    #[serde(default, rename = "fullName")]
    pub full_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn collection_deserializes_api_shape() {
        let value = json!({
            "_id": 123,
            "title": "Research",
            "count": 7,
            "parent": {"$id": 10},
            "public": false,
            "lastUpdate": "2025-06-01T12:00:00.000Z",
            "access": {"level": 4},
        });
        let collection: Collection = serde_json::from_value(value).unwrap();
        assert_eq!(collection.id, 123);
        assert_eq!(collection.title, "Research");
        assert_eq!(collection.parent, Some(ParentRef { id: 10 }));
        assert!(collection.last_update.is_some());
    }

    #[test]
    fn collection_tolerates_sparse_response() {
        let collection: Collection =
            serde_json::from_value(json!({"_id": 5, "title": "Inbox"})).unwrap();
        assert_eq!(collection.count, 0);
        assert_eq!(collection.parent, None);
    }

    #[test]
    fn raindrop_defaults_collection_to_unsorted() {
        let raindrop: Raindrop =
            serde_json::from_value(json!({"_id": 1, "link": "https://example.com"})).unwrap();
        assert_eq!(raindrop.collection_id, -1);
        assert!(raindrop.tags.is_empty());
    }

    #[test]
    fn update_serialization_skips_unset_fields() {
        let update = RaindropUpdate {
            title: Some("New".into()),
            ..RaindropUpdate::default()
        };
        let value = serde_json::to_value(&update).unwrap();
        assert_eq!(value, json!({"title": "New"}));
    }

    #[test]
    fn update_parses_collection_ref_from_user_json() {
        let update: RaindropUpdate =
            serde_json::from_str(r#"{"collection": {"$id": 42}, "tags": ["a"]}"#).unwrap();
        assert_eq!(update.collection, Some(ParentRef { id: 42 }));
        assert_eq!(update.tags.as_deref(), Some(&["a".to_string()][..]));
    }
}
