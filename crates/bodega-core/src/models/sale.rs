//! Sale model

use serde::{Deserialize, Serialize};

use super::{impl_entity, Collection, EntityId, RecordKey};

/// One line of a sale: a product, how many, and the price charged per unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleLine {
    pub product_id: EntityId,
    pub quantity: i64,
    /// Price charged per unit, in cents (captured at sale time)
    pub price_cents: i64,
}

impl SaleLine {
    /// Line total in cents.
    #[must_use]
    pub const fn total_cents(&self) -> i64 {
        self.quantity * self.price_cents
    }
}

/// A completed sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sale {
    /// Identity; serialized as the legacy numeric id (`0` = new)
    #[serde(rename = "id")]
    pub key: RecordKey,
    /// Buying customer, if recorded
    pub customer_id: Option<EntityId>,
    pub lines: Vec<SaleLine>,
    /// Last local mutation (RFC 3339), written by the repository
    #[serde(rename = "timestamp")]
    pub stamp: String,
}

impl Sale {
    /// New, unsaved sale with no lines yet.
    #[must_use]
    pub const fn new(customer_id: Option<EntityId>) -> Self {
        Self {
            key: RecordKey::New,
            customer_id,
            lines: Vec::new(),
            stamp: String::new(),
        }
    }

    /// Append a line to the sale.
    #[must_use]
    pub fn with_line(mut self, product_id: EntityId, quantity: i64, price_cents: i64) -> Self {
        self.lines.push(SaleLine {
            product_id,
            quantity,
            price_cents,
        });
        self
    }

    /// Sale total in cents.
    #[must_use]
    pub fn total_cents(&self) -> i64 {
        self.lines.iter().map(SaleLine::total_cents).sum()
    }
}

impl_entity!(Sale, Collection::Sales);

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn total_sums_line_totals() {
        let sale = Sale::new(Some(5))
            .with_line(1, 2, 1250)
            .with_line(2, 1, 300);
        assert_eq!(sale.total_cents(), 2 * 1250 + 300);
        assert_eq!(sale.customer_id, Some(5));
    }

    #[test]
    fn empty_sale_totals_zero() {
        assert_eq!(Sale::new(None).total_cents(), 0);
    }
}
