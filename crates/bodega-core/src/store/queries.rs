//! Collection-specific read filters
//!
//! Each trait extends the base [`LocalStore`] with the queries one screen
//! family needs; repositories surface them unchanged.

use async_trait::async_trait;

use super::LocalStore;
use crate::error::Result;
use crate::models::{Customer, EntityId, Product, Sale, StockItem};

/// Extra reads for the customer collection.
#[async_trait]
pub trait CustomerQueries: LocalStore<Customer> {
    /// Case-insensitive substring search over customer names.
    async fn search(&self, query: &str) -> Result<Vec<Customer>>;
}

/// Extra reads for the product collection.
#[async_trait]
pub trait ProductQueries: LocalStore<Product> {
    /// Case-insensitive substring search over product names.
    async fn search(&self, query: &str) -> Result<Vec<Product>>;

    /// Products filed under the given category.
    async fn get_by_category(&self, category_id: EntityId) -> Result<Vec<Product>>;

    /// Products with nothing left on hand.
    async fn get_out_of_stock(&self) -> Result<Vec<Product>>;
}

/// Extra reads for the sales collection.
#[async_trait]
pub trait SaleQueries: LocalStore<Sale> {
    /// Sales recorded against the given customer.
    async fn get_by_customer(&self, customer_id: EntityId) -> Result<Vec<Sale>>;
}

/// Extra reads for the stock ledger.
#[async_trait]
pub trait StockQueries: LocalStore<StockItem> {
    /// Ledger entries at or below their reorder threshold.
    async fn get_out_of_stock(&self) -> Result<Vec<StockItem>>;
}
