//! Data models for Bodega

mod catalog;
mod category;
mod customer;
mod product;
mod record;
mod sale;
mod stock;
mod version;

pub use catalog::Catalog;
pub use category::Category;
pub use customer::Customer;
pub use product::Product;
pub use record::{Entity, EntityId, RecordKey};
pub use sale::{Sale, SaleLine};
pub use stock::{StockItem, StockOrder};
pub use version::{stamp_after, stamp_now, Collection, DataVersion};

/// Wires the [`Entity`] surface for a model with `key` and `stamp` fields.
macro_rules! impl_entity {
    ($model:ty, $collection:expr) => {
        impl $crate::models::Entity for $model {
            const COLLECTION: $crate::models::Collection = $collection;

            fn key(&self) -> $crate::models::RecordKey {
                self.key
            }

            fn set_key(&mut self, key: $crate::models::RecordKey) {
                self.key = key;
            }

            fn stamp(&self) -> &str {
                &self.stamp
            }

            fn set_stamp(&mut self, stamp: String) {
                self.stamp = stamp;
            }
        }
    };
}

pub(crate) use impl_entity;
