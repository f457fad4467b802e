//! The reconciliation engine
//!
//! Replication works one collection at a time: compare the two collection
//! clocks, let the newer side replace the older one wholesale, keyed by
//! record id. There is no per-field merging; the collection clock exists so
//! that the same replace-by-id-set rule works for every entity shape.

mod outbox;

pub use outbox::{MirrorFailure, MirrorOp, Outbox, RetryPolicy};

use std::collections::HashSet;

use tracing::debug;

use crate::error::Result;
use crate::models::{DataVersion, Entity, EntityId};
use crate::store::{LocalStore, RemoteStore, VersionStore};

/// What one reconciliation round has to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncPlan<E> {
    /// Both clocks agree; nothing to move.
    Noop,
    /// Local side is authoritative: delete `delete_ids` on the remote side,
    /// upsert `save` there, then write `version` to the remote clock.
    Push {
        delete_ids: Vec<EntityId>,
        save: Vec<E>,
        version: DataVersion,
    },
    /// Remote side is authoritative; the symmetric pull.
    Pull {
        delete_ids: Vec<EntityId>,
        save: Vec<E>,
        version: DataVersion,
    },
}

/// Decide the direction for one collection and compute the id diff.
///
/// Clocks compare as plain strings; RFC 3339 UTC stamps at fixed precision
/// order lexically, and the epoch sentinel (empty string) orders before
/// every real stamp. Equal clocks plan nothing, including two sides that
/// have never been written. Records without an assigned id never reach the
/// id sets.
///
/// The planner mutates neither side, which is what keeps the algorithm
/// testable without any store in sight; [`Synchronizer`] executes the plan.
#[must_use]
pub fn plan_sync<E: Entity>(
    local_version: &DataVersion,
    remote_version: &DataVersion,
    local_list: Vec<E>,
    remote_list: Vec<E>,
) -> SyncPlan<E> {
    if local_version.timestamp == remote_version.timestamp {
        return SyncPlan::Noop;
    }
    if local_version.timestamp > remote_version.timestamp {
        let delete_ids = ids_gone_from(&remote_list, &local_list);
        SyncPlan::Push {
            delete_ids,
            save: local_list,
            version: local_version.clone(),
        }
    } else {
        let delete_ids = ids_gone_from(&local_list, &remote_list);
        SyncPlan::Pull {
            delete_ids,
            save: remote_list,
            version: remote_version.clone(),
        }
    }
}

/// Ids present on the stale side that the fresh side no longer has.
fn ids_gone_from<E: Entity>(stale: &[E], fresh: &[E]) -> Vec<EntityId> {
    let kept: HashSet<EntityId> = fresh.iter().filter_map(|row| row.key().id()).collect();
    stale
        .iter()
        .filter_map(|row| row.key().id())
        .filter(|id| !kept.contains(id))
        .collect()
}

/// Executes reconciliation rounds against a collection's store pair.
///
/// Stateless; one instance serves every repository. A failed round leaves no
/// bookkeeping behind: the next call replans the whole diff from scratch,
/// and the plan is idempotent given stable inputs.
#[derive(Debug, Clone, Copy, Default)]
pub struct Synchronizer;

impl Synchronizer {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Reconcile one collection. Returns whether any data moved.
    pub async fn reconcile<E, L, R, V, W>(
        &self,
        local: &L,
        remote: &R,
        local_clock: &V,
        remote_clock: &W,
    ) -> Result<bool>
    where
        E: Entity,
        L: LocalStore<E> + ?Sized,
        R: RemoteStore<E> + ?Sized,
        V: VersionStore + ?Sized,
        W: VersionStore + ?Sized,
    {
        let collection = E::COLLECTION;
        let local_version = local_clock.current(collection).await?;
        let remote_version = remote_clock.current(collection).await?;
        let local_list = local.get_all().await?;
        let remote_list = remote.get_all().await?;

        match plan_sync(&local_version, &remote_version, local_list, remote_list) {
            SyncPlan::Noop => {
                debug!(collection = %collection, "clocks agree, nothing to sync");
                Ok(false)
            }
            SyncPlan::Push {
                delete_ids,
                save,
                version,
            } => {
                debug!(
                    collection = %collection,
                    deletes = delete_ids.len(),
                    saves = save.len(),
                    "pushing local state"
                );
                for id in delete_ids {
                    remote.delete(id).await?;
                }
                for entity in &save {
                    remote.save(entity).await?;
                }
                remote_clock.record(collection, &version).await?;
                Ok(true)
            }
            SyncPlan::Pull {
                delete_ids,
                save,
                version,
            } => {
                debug!(
                    collection = %collection,
                    deletes = delete_ids.len(),
                    saves = save.len(),
                    "pulling remote state"
                );
                for id in delete_ids {
                    local.delete_by_id(id).await?;
                }
                for entity in &save {
                    local.save(entity).await?;
                }
                local_clock.record(collection, &version).await?;
                Ok(true)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Collection, RecordKey};
    use pretty_assertions::assert_eq;

    fn existing(id: EntityId, name: &str, stamp: &str) -> Category {
        let mut category = Category::new(name);
        category.key = RecordKey::Existing(id);
        category.stamp = stamp.to_string();
        category
    }

    const T0: &str = "2024-01-01T00:00:00.000Z";
    const T1: &str = "2024-01-02T10:00:00.000Z";

    #[test]
    fn equal_clocks_plan_nothing() {
        let version = DataVersion::at(Collection::Categories, T1);
        let plan = plan_sync::<Category>(&version, &version.clone(), Vec::new(), Vec::new());
        assert_eq!(plan, SyncPlan::Noop);
    }

    #[test]
    fn two_epoch_clocks_plan_nothing() {
        let local = DataVersion::empty(Collection::Categories);
        let remote = DataVersion::empty(Collection::Categories);
        let plan = plan_sync::<Category>(&local, &remote, Vec::new(), Vec::new());
        assert_eq!(plan, SyncPlan::Noop);
    }

    #[test]
    fn newer_local_clock_pushes_full_local_list() {
        // The worked example: one local record, an older and empty remote.
        let local_version = DataVersion::at(Collection::Categories, T1);
        let remote_version = DataVersion::at(Collection::Categories, T0);
        let gifts = existing(1, "Gifts", T1);

        let plan = plan_sync(
            &local_version,
            &remote_version,
            vec![gifts.clone()],
            Vec::new(),
        );
        assert_eq!(
            plan,
            SyncPlan::Push {
                delete_ids: Vec::new(),
                save: vec![gifts],
                version: local_version,
            }
        );
    }

    #[test]
    fn push_deletes_ids_the_local_side_dropped() {
        let local_version = DataVersion::at(Collection::Categories, T1);
        let remote_version = DataVersion::at(Collection::Categories, T0);
        let local = vec![existing(1, "Gifts", T1)];
        let remote = vec![existing(1, "Gifts", T0), existing(2, "Toys", T0)];

        match plan_sync(&local_version, &remote_version, local, remote) {
            SyncPlan::Push { delete_ids, .. } => assert_eq!(delete_ids, vec![2]),
            other => panic!("expected push, got {other:?}"),
        }
    }

    #[test]
    fn newer_remote_clock_pulls_and_deletes_local_only_ids() {
        let local_version = DataVersion::at(Collection::Categories, T0);
        let remote_version = DataVersion::at(Collection::Categories, T1);
        let local = vec![existing(1, "Gifts", T0), existing(3, "Seasonal", T0)];
        let remote = vec![existing(1, "Gifts", T1)];

        match plan_sync(&local_version, &remote_version, local, remote.clone()) {
            SyncPlan::Pull {
                delete_ids,
                save,
                version,
            } => {
                assert_eq!(delete_ids, vec![3]);
                assert_eq!(save, remote);
                assert_eq!(version.timestamp, T1);
            }
            other => panic!("expected pull, got {other:?}"),
        }
    }

    #[test]
    fn epoch_local_clock_pulls_from_any_written_remote() {
        let local_version = DataVersion::empty(Collection::Categories);
        let remote_version = DataVersion::at(Collection::Categories, T0);
        let plan = plan_sync::<Category>(&local_version, &remote_version, Vec::new(), Vec::new());
        assert!(matches!(plan, SyncPlan::Pull { .. }));
    }

    #[test]
    fn unsaved_records_never_reach_the_id_sets() {
        let local_version = DataVersion::at(Collection::Categories, T1);
        let remote_version = DataVersion::at(Collection::Categories, T0);
        // A remote row that somehow lost its id must not produce a delete.
        let remote = vec![Category::new("stray")];

        match plan_sync(&local_version, &remote_version, Vec::new(), remote) {
            SyncPlan::Push { delete_ids, .. } => assert!(delete_ids.is_empty()),
            other => panic!("expected push, got {other:?}"),
        }
    }
}
