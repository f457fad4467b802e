//! Product model

use serde::{Deserialize, Serialize};

use super::{impl_entity, Collection, EntityId, RecordKey};

/// A sellable product.
///
/// Prices are integer cents; `quantity` is the on-hand count shown in the
/// product screens (the stock ledger tracks reorder thresholds separately).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Identity; serialized as the legacy numeric id (`0` = new)
    #[serde(rename = "id")]
    pub key: RecordKey,
    pub name: String,
    /// Owning category id, if the product has been filed under one
    pub category_id: Option<EntityId>,
    /// Unit price in cents
    pub price_cents: i64,
    /// On-hand count
    pub quantity: i64,
    /// Last local mutation (RFC 3339), written by the repository
    #[serde(rename = "timestamp")]
    pub stamp: String,
}

impl Product {
    /// New, unsaved product.
    #[must_use]
    pub fn new(name: impl Into<String>, price_cents: i64) -> Self {
        Self {
            key: RecordKey::New,
            name: name.into(),
            category_id: None,
            price_cents,
            quantity: 0,
            stamp: String::new(),
        }
    }

    /// File the product under a category.
    #[must_use]
    pub const fn in_category(mut self, category_id: EntityId) -> Self {
        self.category_id = Some(category_id);
        self
    }

    /// Set the on-hand count.
    #[must_use]
    pub const fn with_quantity(mut self, quantity: i64) -> Self {
        self.quantity = quantity;
        self
    }

    /// Whether the product has nothing left on hand.
    #[must_use]
    pub const fn is_out_of_stock(&self) -> bool {
        self.quantity <= 0
    }
}

impl_entity!(Product, Collection::Products);
