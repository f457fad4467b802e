//! Customer repository

use crate::error::Result;
use crate::models::Customer;
use crate::store::{CustomerQueries, RemoteStore, VersionStore};

use super::SyncedRepository;

/// Write-then-mirror repository for customers.
pub type CustomerRepository<L, R, V, W> = SyncedRepository<Customer, L, R, V, W>;

impl<L, R, V, W> SyncedRepository<Customer, L, R, V, W>
where
    L: CustomerQueries + 'static,
    R: RemoteStore<Customer> + 'static,
    V: VersionStore + 'static,
    W: VersionStore + 'static,
{
    /// Case-insensitive name search against the local store.
    pub async fn search(&self, query: &str) -> Result<Vec<Customer>> {
        self.local().search(query).await
    }
}
