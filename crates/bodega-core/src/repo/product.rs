//! Product repository

use crate::error::Result;
use crate::models::{EntityId, Product};
use crate::store::{ProductQueries, RemoteStore, VersionStore};

use super::SyncedRepository;

/// Write-then-mirror repository for products.
pub type ProductRepository<L, R, V, W> = SyncedRepository<Product, L, R, V, W>;

impl<L, R, V, W> SyncedRepository<Product, L, R, V, W>
where
    L: ProductQueries + 'static,
    R: RemoteStore<Product> + 'static,
    V: VersionStore + 'static,
    W: VersionStore + 'static,
{
    /// Case-insensitive name search against the local store.
    pub async fn search(&self, query: &str) -> Result<Vec<Product>> {
        self.local().search(query).await
    }

    /// Products filed under the given category.
    pub async fn get_by_category(&self, category_id: EntityId) -> Result<Vec<Product>> {
        self.local().get_by_category(category_id).await
    }

    /// Products with nothing left on hand.
    pub async fn get_out_of_stock(&self) -> Result<Vec<Product>> {
        self.local().get_out_of_stock().await
    }
}
