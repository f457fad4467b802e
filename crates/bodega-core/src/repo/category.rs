//! Category repository

use crate::models::Category;

use super::SyncedRepository;

/// Write-then-mirror repository for categories; the shared CRUD surface is
/// all this collection needs.
pub type CategoryRepository<L, R, V, W> = SyncedRepository<Category, L, R, V, W>;
