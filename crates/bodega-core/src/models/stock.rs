//! Stock ledger models

use serde::{Deserialize, Serialize};

use super::{impl_entity, Collection, EntityId, RecordKey};

/// Stock ledger entry for one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockItem {
    /// Identity; serialized as the legacy numeric id (`0` = new)
    #[serde(rename = "id")]
    pub key: RecordKey,
    pub product_id: EntityId,
    /// Units on hand
    pub quantity: i64,
    /// Threshold at or below which the item needs reordering
    pub reorder_level: i64,
    /// Last local mutation (RFC 3339), written by the repository
    #[serde(rename = "timestamp")]
    pub stamp: String,
}

impl StockItem {
    /// New, unsaved ledger entry.
    #[must_use]
    pub const fn new(product_id: EntityId, quantity: i64, reorder_level: i64) -> Self {
        Self {
            key: RecordKey::New,
            product_id,
            quantity,
            reorder_level,
            stamp: String::new(),
        }
    }

    /// Whether the item is at or below its reorder threshold.
    #[must_use]
    pub const fn needs_reorder(&self) -> bool {
        self.quantity <= self.reorder_level
    }
}

impl_entity!(StockItem, Collection::Stock);

/// A replenishment order placed with a supplier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockOrder {
    /// Identity; serialized as the legacy numeric id (`0` = new)
    #[serde(rename = "id")]
    pub key: RecordKey,
    pub supplier: String,
    pub product_id: EntityId,
    pub quantity: i64,
    /// Whether the goods have arrived
    pub received: bool,
    /// Last local mutation (RFC 3339), written by the repository
    #[serde(rename = "timestamp")]
    pub stamp: String,
}

impl StockOrder {
    /// New, unsaved order.
    #[must_use]
    pub fn new(supplier: impl Into<String>, product_id: EntityId, quantity: i64) -> Self {
        Self {
            key: RecordKey::New,
            supplier: supplier.into(),
            product_id,
            quantity,
            received: false,
            stamp: String::new(),
        }
    }
}

impl_entity!(StockOrder, Collection::StockOrders);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reorder_threshold_is_inclusive() {
        assert!(StockItem::new(1, 5, 5).needs_reorder());
        assert!(StockItem::new(1, 0, 5).needs_reorder());
        assert!(!StockItem::new(1, 6, 5).needs_reorder());
    }

    #[test]
    fn new_order_is_outstanding() {
        let order = StockOrder::new("Acme", 3, 20);
        assert!(!order.received);
        assert!(order.key.is_new());
    }
}
