//! Sale repository

use crate::error::Result;
use crate::models::{EntityId, Sale};
use crate::store::{RemoteStore, SaleQueries, VersionStore};

use super::SyncedRepository;

/// Write-then-mirror repository for sales.
pub type SaleRepository<L, R, V, W> = SyncedRepository<Sale, L, R, V, W>;

impl<L, R, V, W> SyncedRepository<Sale, L, R, V, W>
where
    L: SaleQueries + 'static,
    R: RemoteStore<Sale> + 'static,
    V: VersionStore + 'static,
    W: VersionStore + 'static,
{
    /// Sales recorded against the given customer.
    pub async fn get_by_customer(&self, customer_id: EntityId) -> Result<Vec<Sale>> {
        self.local().get_by_customer(customer_id).await
    }
}
