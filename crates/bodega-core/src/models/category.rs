//! Category model

use serde::{Deserialize, Serialize};

use super::{impl_entity, Collection, RecordKey};

/// A product grouping shown in the catalog and stock screens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Identity; serialized as the legacy numeric id (`0` = new)
    #[serde(rename = "id")]
    pub key: RecordKey,
    /// Display name
    pub name: String,
    /// Last local mutation (RFC 3339), written by the repository
    #[serde(rename = "timestamp")]
    pub stamp: String,
}

impl Category {
    /// New, unsaved category.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            key: RecordKey::New,
            name: name.into(),
            stamp: String::new(),
        }
    }
}

impl_entity!(Category, Collection::Categories);
