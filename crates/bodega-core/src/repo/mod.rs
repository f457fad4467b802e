//! Per-collection repositories
//!
//! A repository owns one collection's local store, its remote mirror, and
//! the collection clock on each side. Every mutation commits locally first,
//! advances the local clock, and queues a best-effort remote mirror on the
//! [`Outbox`]; `sync_with` reconciles the two sides on demand.

mod catalog;
mod category;
mod customer;
mod product;
mod sale;
mod stock;

pub use catalog::CatalogRepository;
pub use category::CategoryRepository;
pub use customer::CustomerRepository;
pub use product::ProductRepository;
pub use sale::SaleRepository;
pub use stock::{StockOrderRepository, StockRepository};

use std::marker::PhantomData;
use std::sync::Arc;

use tracing::warn;

use crate::error::{Error, Result};
use crate::models::{stamp_after, DataVersion, Entity, EntityId, RecordKey};
use crate::store::{LocalStore, RemoteStore, VersionStore};
use crate::sync::{MirrorOp, Outbox, Synchronizer};

/// Generic write-then-mirror repository for one collection.
///
/// The caller observes the local commit (and the assigned id) before any
/// remote work starts; remote failures surface only through the outbox's
/// error hook and never undo a local write. The repository serializes
/// nothing itself; store implementations own their thread safety, and
/// concurrent `sync_with` calls on the same collection are the caller's
/// hazard to avoid.
pub struct SyncedRepository<E, L, R, V, W> {
    local: Arc<L>,
    remote: Arc<R>,
    local_clock: Arc<V>,
    remote_clock: Arc<W>,
    outbox: Arc<Outbox>,
    _entity: PhantomData<fn() -> E>,
}

impl<E, L, R, V, W> SyncedRepository<E, L, R, V, W>
where
    E: Entity,
    L: LocalStore<E> + 'static,
    R: RemoteStore<E> + 'static,
    V: VersionStore + 'static,
    W: VersionStore + 'static,
{
    pub fn new(
        local: Arc<L>,
        remote: Arc<R>,
        local_clock: Arc<V>,
        remote_clock: Arc<W>,
        outbox: Arc<Outbox>,
    ) -> Self {
        Self {
            local,
            remote,
            local_clock,
            remote_clock,
            outbox,
            _entity: PhantomData,
        }
    }

    /// The local store backing this repository.
    pub fn local(&self) -> &L {
        &self.local
    }

    /// Insert a record: local commit, clock bump, queued remote mirror.
    ///
    /// Returns the entity carrying its assigned id and mutation stamp.
    pub async fn insert(&self, mut entity: E) -> Result<E> {
        if !entity.key().is_new() {
            return Err(Error::InvalidInput(format!(
                "{} record already has an id",
                E::COLLECTION
            )));
        }
        let version = self.next_version().await?;
        entity.set_stamp(version.timestamp.clone());
        let id = self.local.insert(&entity).await?;
        entity.set_key(RecordKey::Existing(id));
        self.local_clock.record(E::COLLECTION, &version).await?;
        self.mirror_save(entity.clone(), version);
        Ok(entity)
    }

    /// Update a record in place; same commit-then-mirror sequence as insert.
    pub async fn update(&self, mut entity: E) -> Result<E> {
        if entity.key().is_new() {
            return Err(Error::InvalidInput(format!(
                "cannot update an unsaved {} record",
                E::COLLECTION
            )));
        }
        let version = self.next_version().await?;
        entity.set_stamp(version.timestamp.clone());
        self.local.update(&entity).await?;
        self.local_clock.record(E::COLLECTION, &version).await?;
        self.mirror_save(entity.clone(), version);
        Ok(entity)
    }

    /// Delete a record.
    pub async fn delete(&self, entity: &E) -> Result<()> {
        match entity.key().id() {
            Some(id) => self.delete_by_id(id).await,
            None => Err(Error::InvalidInput(format!(
                "cannot delete an unsaved {} record",
                E::COLLECTION
            ))),
        }
    }

    /// Delete a record by id.
    pub async fn delete_by_id(&self, id: EntityId) -> Result<()> {
        let version = self.next_version().await?;
        self.local.delete_by_id(id).await?;
        self.local_clock.record(E::COLLECTION, &version).await?;

        let remote = Arc::clone(&self.remote);
        let clock = Arc::clone(&self.remote_clock);
        self.enqueue(MirrorOp::DeleteEntity, move || {
            let remote = Arc::clone(&remote);
            let clock = Arc::clone(&clock);
            let version = version.clone();
            Box::pin(async move {
                remote.delete(id).await?;
                clock.record(E::COLLECTION, &version).await
            })
        });
        Ok(())
    }

    /// Snapshot of the full local collection.
    pub async fn get_all(&self) -> Result<Vec<E>> {
        self.local.get_all().await
    }

    /// Fetch one record by id from the local store.
    pub async fn get_by_id(&self, id: EntityId) -> Result<Option<E>> {
        self.local.get_by_id(id).await
    }

    /// The most recently inserted local record, if any.
    pub async fn get_last(&self) -> Result<Option<E>> {
        self.local.get_last().await
    }

    /// Current local collection clock (epoch when never written).
    pub async fn version(&self) -> Result<DataVersion> {
        self.local_clock.current(E::COLLECTION).await
    }

    /// Reconcile this collection with the remote side.
    ///
    /// Returns whether a push or pull ran. Safe to call repeatedly; a round
    /// against already-consistent sides is a no-op.
    pub async fn sync_with(&self, synchronizer: &Synchronizer) -> Result<bool> {
        synchronizer
            .reconcile::<E, _, _, _, _>(
                self.local.as_ref(),
                self.remote.as_ref(),
                self.local_clock.as_ref(),
                self.remote_clock.as_ref(),
            )
            .await
    }

    /// Next local clock value: strictly after the stored one, so every
    /// mutation advances the collection clock even inside one millisecond.
    async fn next_version(&self) -> Result<DataVersion> {
        let current = self.local_clock.current(E::COLLECTION).await?;
        Ok(DataVersion::at(
            E::COLLECTION,
            stamp_after(&current.timestamp),
        ))
    }

    /// Queue the remote half of a save: entity upsert, then the remote
    /// clock. One job, so a failed upsert never advances the remote clock.
    fn mirror_save(&self, entity: E, version: DataVersion) {
        let remote = Arc::clone(&self.remote);
        let clock = Arc::clone(&self.remote_clock);
        self.enqueue(MirrorOp::SaveEntity, move || {
            let remote = Arc::clone(&remote);
            let clock = Arc::clone(&clock);
            let entity = entity.clone();
            let version = version.clone();
            Box::pin(async move {
                remote.save(&entity).await?;
                clock.record(E::COLLECTION, &version).await
            })
        });
    }

    fn enqueue(
        &self,
        op: MirrorOp,
        run: impl Fn() -> futures::future::BoxFuture<'static, Result<()>> + Send + 'static,
    ) {
        if let Err(error) = self.outbox.enqueue(E::COLLECTION, op, run) {
            warn!(collection = %E::COLLECTION, %error, "mirror not queued");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Collection};
    use crate::store::{MemoryStore, MemoryVersionStore};
    use crate::sync::RetryPolicy;
    use pretty_assertions::assert_eq;

    type TestRepo = SyncedRepository<
        Category,
        MemoryStore<Category>,
        MemoryStore<Category>,
        MemoryVersionStore,
        MemoryVersionStore,
    >;

    struct Fixture {
        repo: TestRepo,
        remote: Arc<MemoryStore<Category>>,
        remote_clock: Arc<MemoryVersionStore>,
        outbox: Arc<Outbox>,
    }

    fn fixture() -> Fixture {
        let remote = Arc::new(MemoryStore::new());
        let remote_clock = Arc::new(MemoryVersionStore::new());
        let outbox = Arc::new(Outbox::new(RetryPolicy::default(), |_| {}));
        let repo = SyncedRepository::new(
            Arc::new(MemoryStore::new()),
            Arc::clone(&remote),
            Arc::new(MemoryVersionStore::new()),
            Arc::clone(&remote_clock),
            Arc::clone(&outbox),
        );
        Fixture {
            repo,
            remote,
            remote_clock,
            outbox,
        }
    }

    #[tokio::test]
    async fn insert_commits_locally_and_mirrors_remotely() {
        let f = fixture();

        let gifts = f.repo.insert(Category::new("Gifts")).await.unwrap();
        assert_eq!(gifts.key, RecordKey::Existing(1));
        assert!(!gifts.stamp.is_empty());

        // Local state is visible immediately.
        let local = f.repo.get_by_id(1).await.unwrap().unwrap();
        assert_eq!(local.name, "Gifts");

        // The mirror lands once the queue drains.
        f.outbox.flush().await.unwrap();
        let remote = RemoteStore::get_all(f.remote.as_ref()).await.unwrap();
        assert_eq!(remote.len(), 1);
        assert_eq!(remote[0].name, "Gifts");

        let remote_version = f.remote_clock.current(Collection::Categories).await.unwrap();
        assert_eq!(remote_version.timestamp, gifts.stamp);
    }

    #[tokio::test]
    async fn insert_rejects_records_with_ids() {
        let f = fixture();
        let mut category = Category::new("Gifts");
        category.key = RecordKey::Existing(4);
        let error = f.repo.insert(category).await.unwrap_err();
        assert!(matches!(error, Error::InvalidInput(_)));
    }

    #[tokio::test]
    async fn every_mutation_strictly_advances_the_clock() {
        let f = fixture();

        let before = f.repo.version().await.unwrap();
        assert!(before.is_epoch());

        let gifts = f.repo.insert(Category::new("Gifts")).await.unwrap();
        let after_insert = f.repo.version().await.unwrap();
        assert!(after_insert.timestamp > before.timestamp);

        let mut renamed = gifts;
        renamed.name = "Gift boxes".to_string();
        f.repo.update(renamed).await.unwrap();
        let after_update = f.repo.version().await.unwrap();
        assert!(after_update.timestamp > after_insert.timestamp);

        f.repo.delete_by_id(1).await.unwrap();
        let after_delete = f.repo.version().await.unwrap();
        assert!(after_delete.timestamp > after_update.timestamp);
    }

    #[tokio::test]
    async fn delete_mirrors_to_the_remote_side() {
        let f = fixture();

        let gifts = f.repo.insert(Category::new("Gifts")).await.unwrap();
        f.outbox.flush().await.unwrap();

        f.repo.delete(&gifts).await.unwrap();
        f.outbox.flush().await.unwrap();

        assert!(RemoteStore::get_all(f.remote.as_ref())
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn update_of_unsaved_record_is_rejected() {
        let f = fixture();
        let error = f.repo.update(Category::new("Gifts")).await.unwrap_err();
        assert!(matches!(error, Error::InvalidInput(_)));
        let error = f.repo.delete(&Category::new("Gifts")).await.unwrap_err();
        assert!(matches!(error, Error::InvalidInput(_)));
    }
}
