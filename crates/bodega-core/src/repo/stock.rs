//! Stock ledger and stock order repositories

use crate::error::Result;
use crate::models::{StockItem, StockOrder};
use crate::store::{RemoteStore, StockQueries, VersionStore};

use super::SyncedRepository;

/// Write-then-mirror repository for the stock ledger.
pub type StockRepository<L, R, V, W> = SyncedRepository<StockItem, L, R, V, W>;

/// Write-then-mirror repository for supplier orders; shared CRUD only.
pub type StockOrderRepository<L, R, V, W> = SyncedRepository<StockOrder, L, R, V, W>;

impl<L, R, V, W> SyncedRepository<StockItem, L, R, V, W>
where
    L: StockQueries + 'static,
    R: RemoteStore<StockItem> + 'static,
    V: VersionStore + 'static,
    W: VersionStore + 'static,
{
    /// Ledger entries at or below their reorder threshold.
    pub async fn get_out_of_stock(&self) -> Result<Vec<StockItem>> {
        self.local().get_out_of_stock().await
    }
}
