//! In-memory stores
//!
//! Reference implementations of the store contracts. Tests run on these, and
//! a client that has not wired a real backend yet can too. `MemoryStore`
//! serves both the local and the remote contract so one type covers every
//! test double.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use super::{
    CustomerQueries, LocalStore, ProductQueries, RemoteStore, SaleQueries, StockQueries,
    VersionStore,
};
use crate::error::{Error, Result};
use crate::models::{
    Collection, Customer, DataVersion, Entity, EntityId, Product, RecordKey, Sale, StockItem,
};

/// In-memory collection storage.
#[derive(Debug)]
pub struct MemoryStore<E> {
    inner: Mutex<Inner<E>>,
}

#[derive(Debug)]
struct Inner<E> {
    rows: Vec<E>,
    next_id: EntityId,
}

impl<E> Default for MemoryStore<E> {
    fn default() -> Self {
        Self {
            inner: Mutex::new(Inner {
                rows: Vec::new(),
                next_id: 1,
            }),
        }
    }
}

impl<E: Entity> MemoryStore<E> {
    /// Empty store; ids are assigned from 1 upward.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with records that already carry ids.
    #[must_use]
    pub fn with_rows(rows: Vec<E>) -> Self {
        let next_id = rows
            .iter()
            .filter_map(|row| row.key().id())
            .max()
            .unwrap_or(0)
            + 1;
        Self {
            inner: Mutex::new(Inner { rows, next_id }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner<E>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn require_id(entity: &E) -> Result<EntityId> {
        entity.key().id().ok_or_else(|| {
            Error::InvalidInput(format!("{} record has no id yet", E::COLLECTION))
        })
    }

    fn filtered(&self, keep: impl FnMut(&&E) -> bool) -> Vec<E> {
        self.lock().rows.iter().filter(keep).cloned().collect()
    }
}

#[async_trait]
impl<E: Entity> LocalStore<E> for MemoryStore<E> {
    async fn insert(&self, entity: &E) -> Result<EntityId> {
        let mut inner = self.lock();
        let id = inner.next_id;
        inner.next_id += 1;
        let mut row = entity.clone();
        row.set_key(RecordKey::Existing(id));
        inner.rows.push(row);
        Ok(id)
    }

    async fn update(&self, entity: &E) -> Result<()> {
        let id = Self::require_id(entity)?;
        let mut inner = self.lock();
        match inner.rows.iter_mut().find(|row| row.key().id() == Some(id)) {
            Some(row) => {
                *row = entity.clone();
                Ok(())
            }
            None => Err(Error::NotFound(format!("{} id {id}", E::COLLECTION))),
        }
    }

    async fn delete_by_id(&self, id: EntityId) -> Result<()> {
        let mut inner = self.lock();
        let before = inner.rows.len();
        inner.rows.retain(|row| row.key().id() != Some(id));
        if inner.rows.len() == before {
            Err(Error::NotFound(format!("{} id {id}", E::COLLECTION)))
        } else {
            Ok(())
        }
    }

    async fn save(&self, entity: &E) -> Result<()> {
        let id = Self::require_id(entity)?;
        let mut inner = self.lock();
        if let Some(row) = inner.rows.iter_mut().find(|row| row.key().id() == Some(id)) {
            *row = entity.clone();
        } else {
            inner.rows.push(entity.clone());
            if id >= inner.next_id {
                inner.next_id = id + 1;
            }
        }
        Ok(())
    }

    async fn get_all(&self) -> Result<Vec<E>> {
        Ok(self.lock().rows.clone())
    }

    async fn get_by_id(&self, id: EntityId) -> Result<Option<E>> {
        Ok(self
            .lock()
            .rows
            .iter()
            .find(|row| row.key().id() == Some(id))
            .cloned())
    }

    async fn get_last(&self) -> Result<Option<E>> {
        Ok(self.lock().rows.last().cloned())
    }
}

#[async_trait]
impl<E: Entity> RemoteStore<E> for MemoryStore<E> {
    async fn get_all(&self) -> Result<Vec<E>> {
        Ok(self.lock().rows.clone())
    }

    async fn save(&self, entity: &E) -> Result<()> {
        LocalStore::save(self, entity).await
    }

    async fn delete(&self, id: EntityId) -> Result<()> {
        // Idempotent: a record that is already gone stays gone.
        self.lock().rows.retain(|row| row.key().id() != Some(id));
        Ok(())
    }
}

#[async_trait]
impl CustomerQueries for MemoryStore<Customer> {
    async fn search(&self, query: &str) -> Result<Vec<Customer>> {
        let needle = query.to_lowercase();
        Ok(self.filtered(|customer| customer.name.to_lowercase().contains(&needle)))
    }
}

#[async_trait]
impl ProductQueries for MemoryStore<Product> {
    async fn search(&self, query: &str) -> Result<Vec<Product>> {
        let needle = query.to_lowercase();
        Ok(self.filtered(|product| product.name.to_lowercase().contains(&needle)))
    }

    async fn get_by_category(&self, category_id: EntityId) -> Result<Vec<Product>> {
        Ok(self.filtered(|product| product.category_id == Some(category_id)))
    }

    async fn get_out_of_stock(&self) -> Result<Vec<Product>> {
        Ok(self.filtered(|product| product.is_out_of_stock()))
    }
}

#[async_trait]
impl SaleQueries for MemoryStore<Sale> {
    async fn get_by_customer(&self, customer_id: EntityId) -> Result<Vec<Sale>> {
        Ok(self.filtered(|sale| sale.customer_id == Some(customer_id)))
    }
}

#[async_trait]
impl StockQueries for MemoryStore<StockItem> {
    async fn get_out_of_stock(&self) -> Result<Vec<StockItem>> {
        Ok(self.filtered(|item| item.needs_reorder()))
    }
}

/// In-memory logical clock storage.
#[derive(Debug, Default)]
pub struct MemoryVersionStore {
    rows: Mutex<HashMap<i64, DataVersion>>,
}

impl MemoryVersionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<i64, DataVersion>> {
        self.rows.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl VersionStore for MemoryVersionStore {
    async fn get(&self, collection: Collection) -> Result<Option<DataVersion>> {
        Ok(self.lock().get(&collection.id()).cloned())
    }

    async fn insert(&self, version: &DataVersion) -> Result<()> {
        self.lock().insert(version.id, version.clone());
        Ok(())
    }

    async fn update(&self, version: &DataVersion) -> Result<()> {
        self.lock().insert(version.id, version.clone());
        Ok(())
    }
}
