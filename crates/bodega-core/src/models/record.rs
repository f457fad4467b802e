//! Record identity and the common entity surface

use serde::{Deserialize, Serialize};
use std::fmt;

use super::Collection;

/// Identifier assigned by the local store; unique within one collection.
pub type EntityId = i64;

/// Identity state of a record.
///
/// The legacy wire format uses `0` for "not yet persisted". The tagged union
/// keeps that encoding on the wire while making the unassigned state
/// impossible to confuse with a real id in code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum RecordKey {
    /// Not yet persisted; the local store assigns an id on insert.
    New,
    /// Persisted under the given id.
    Existing(EntityId),
}

impl RecordKey {
    /// The assigned id, if any.
    #[must_use]
    pub const fn id(self) -> Option<EntityId> {
        match self {
            Self::New => None,
            Self::Existing(id) => Some(id),
        }
    }

    /// Whether the record has not been persisted yet.
    #[must_use]
    pub const fn is_new(self) -> bool {
        matches!(self, Self::New)
    }
}

impl Default for RecordKey {
    fn default() -> Self {
        Self::New
    }
}

impl From<i64> for RecordKey {
    fn from(raw: i64) -> Self {
        if raw <= 0 {
            Self::New
        } else {
            Self::Existing(raw)
        }
    }
}

impl From<RecordKey> for i64 {
    fn from(key: RecordKey) -> Self {
        match key {
            RecordKey::New => 0,
            RecordKey::Existing(id) => id,
        }
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::New => write!(f, "new"),
            Self::Existing(id) => write!(f, "{id}"),
        }
    }
}

/// Common surface every replicated domain record exposes.
///
/// The repository writes `key` after the local insert assigns an id, and
/// `stamp` on every mutation; models never set either themselves.
pub trait Entity: Clone + Send + Sync + 'static {
    /// Collection this entity type belongs to.
    const COLLECTION: Collection;

    /// Identity state of this record.
    fn key(&self) -> RecordKey;

    /// Set the identity, normally right after the local store assigns an id.
    fn set_key(&mut self, key: RecordKey);

    /// RFC 3339 instant of the last local mutation.
    fn stamp(&self) -> &str;

    /// Overwrite the mutation stamp.
    fn set_stamp(&mut self, stamp: String);
}
