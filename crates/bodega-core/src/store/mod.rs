//! Store contracts the replication engine reconciles across
//!
//! The device database and the remote backend live in other crates; the
//! engine only ever sees these traits. Implementations own their own
//! thread safety; nothing here serializes access for them.

mod memory;
mod queries;

pub use memory::{MemoryStore, MemoryVersionStore};
pub use queries::{CustomerQueries, ProductQueries, SaleQueries, StockQueries};

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Collection, DataVersion, Entity, EntityId};

/// Device-side persistence for one collection.
#[async_trait]
pub trait LocalStore<E: Entity>: Send + Sync {
    /// Insert a record and return the id the store assigned.
    async fn insert(&self, entity: &E) -> Result<EntityId>;

    /// Update an existing record in place, keyed by id.
    async fn update(&self, entity: &E) -> Result<()>;

    /// Delete a record by id.
    async fn delete_by_id(&self, id: EntityId) -> Result<()>;

    /// Id-preserving upsert, used when the pull path replays remote records
    /// into the device store.
    async fn save(&self, entity: &E) -> Result<()>;

    /// Snapshot of the full collection.
    async fn get_all(&self) -> Result<Vec<E>>;

    /// Fetch one record by id.
    async fn get_by_id(&self, id: EntityId) -> Result<Option<E>>;

    /// The most recently inserted record, if any.
    async fn get_last(&self) -> Result<Option<E>>;
}

/// Network-side storage for one collection.
///
/// Implementations must read a partial or missing remote collection as an
/// empty list — "never synced" and "empty" are indistinguishable on purpose.
/// Any other failure surfaces as an error for the mirror queue or the
/// synchronizer to catch.
#[async_trait]
pub trait RemoteStore<E: Entity>: Send + Sync {
    /// Snapshot of the full remote collection.
    async fn get_all(&self) -> Result<Vec<E>>;

    /// Upsert keyed by id.
    async fn save(&self, entity: &E) -> Result<()>;

    /// Delete by id; deleting a record that is already gone is not an error.
    async fn delete(&self, id: EntityId) -> Result<()>;
}

/// Per-collection logical clock storage; same shape on both sides.
#[async_trait]
pub trait VersionStore: Send + Sync {
    /// Fetch the stored clock for a collection, if one was ever written.
    async fn get(&self, collection: Collection) -> Result<Option<DataVersion>>;

    /// Create the clock row for a collection.
    async fn insert(&self, version: &DataVersion) -> Result<()>;

    /// Overwrite an existing clock row.
    async fn update(&self, version: &DataVersion) -> Result<()>;

    /// The clock for a collection, with a missing row read as epoch zero.
    async fn current(&self, collection: Collection) -> Result<DataVersion> {
        Ok(self
            .get(collection)
            .await?
            .unwrap_or_else(|| DataVersion::empty(collection)))
    }

    /// Insert-or-update the clock row for a collection.
    async fn record(&self, collection: Collection, version: &DataVersion) -> Result<()> {
        if self.get(collection).await?.is_some() {
            self.update(version).await
        } else {
            self.insert(version).await
        }
    }
}
