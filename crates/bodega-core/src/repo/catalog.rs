//! Catalog repository

use crate::models::Catalog;

use super::SyncedRepository;

/// Write-then-mirror repository for catalogs; shared CRUD only.
pub type CatalogRepository<L, R, V, W> = SyncedRepository<Catalog, L, R, V, W>;
