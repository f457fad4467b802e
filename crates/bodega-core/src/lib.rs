//! bodega-core - Core library for Bodega
//!
//! This crate contains the shared domain models, the store contracts, and the
//! offline-first replication engine used by all Bodega clients. Persistence
//! and networking live elsewhere; everything here talks to them through the
//! traits in [`store`].

pub mod error;
pub mod models;
pub mod repo;
pub mod store;
pub mod sync;

pub use error::{Error, Result};
pub use models::{Collection, DataVersion, Entity, EntityId, RecordKey};
