//! Catalog model

use serde::{Deserialize, Serialize};

use super::{impl_entity, Collection, EntityId, RecordKey};

/// A shareable product catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    /// Identity; serialized as the legacy numeric id (`0` = new)
    #[serde(rename = "id")]
    pub key: RecordKey,
    pub name: String,
    /// Products included in this catalog
    pub product_ids: Vec<EntityId>,
    pub published: bool,
    /// Last local mutation (RFC 3339), written by the repository
    #[serde(rename = "timestamp")]
    pub stamp: String,
}

impl Catalog {
    /// New, unsaved, unpublished catalog.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            key: RecordKey::New,
            name: name.into(),
            product_ids: Vec::new(),
            published: false,
            stamp: String::new(),
        }
    }
}

impl_entity!(Catalog, Collection::Catalog);
