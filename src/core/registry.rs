//! Registry of suspended units, bucketed per group.
//!
//! # Locking
//!
//! - `RwLock` over the bucket map: read to find a bucket, write only to create
//!   or prune one. Different groups never wait on each other's bucket.
//! - One `Mutex` per bucket. Every membership change for a group happens under
//!   that mutex, and every removal is a take: whichever of release or expiry
//!   removes a unit first is the only one that reports it.
//!
//! The evaluator holds a bucket's lock across "count waiting, decide, then
//! register or take all", so siblings arriving at the same instant see each
//! other and cannot both release the same unit.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use crate::core::{AdmissionError, GroupKey, Unit, UnitPhase};

/// A suspended unit and the time it gives up waiting.
#[derive(Debug, Clone)]
pub struct Suspension {
    /// The unit, in phase `Suspended`.
    pub unit: Unit,
    /// Absolute deadline in milliseconds since epoch.
    pub deadline_ms: u128,
}

/// Suspended members of one group, in registration order.
#[derive(Debug, Default)]
pub(crate) struct GroupBucket {
    members: Vec<Suspension>,
}

impl GroupBucket {
    pub(crate) fn len(&self) -> usize {
        self.members.len()
    }

    pub(crate) fn contains(&self, uid: &str) -> bool {
        self.members.iter().any(|s| s.unit.key.uid == uid)
    }

    /// Members other than `uid`.
    pub(crate) fn count_excluding(&self, uid: &str) -> usize {
        self.members
            .iter()
            .filter(|s| s.unit.key.uid != uid)
            .count()
    }

    /// Add `unit`, which must already be `Suspended`. A uid that is present
    /// keeps its place and takes the new deadline; returns `false` then.
    pub(crate) fn insert(&mut self, unit: Unit, deadline_ms: u128) -> Result<bool, AdmissionError> {
        if unit.phase != UnitPhase::Suspended {
            return Err(AdmissionError::InvalidTransition {
                unit: unit.key.to_string(),
                from: unit.phase,
                to: UnitPhase::Suspended,
            });
        }
        if let Some(existing) = self
            .members
            .iter_mut()
            .find(|s| s.unit.key.uid == unit.key.uid)
        {
            existing.deadline_ms = deadline_ms;
            return Ok(false);
        }
        self.members.push(Suspension { unit, deadline_ms });
        Ok(true)
    }

    fn deadline_of(&self, uid: &str) -> Option<u128> {
        self.members
            .iter()
            .find(|s| s.unit.key.uid == uid)
            .map(|s| s.deadline_ms)
    }

    pub(crate) fn take(&mut self, uid: &str) -> Option<Suspension> {
        let idx = self.members.iter().position(|s| s.unit.key.uid == uid)?;
        Some(self.members.remove(idx))
    }

    pub(crate) fn take_all(&mut self) -> Vec<Suspension> {
        std::mem::take(&mut self.members)
    }

    fn take_due(&mut self, now_ms: u128) -> Vec<Suspension> {
        let (due, keep): (Vec<_>, Vec<_>) = std::mem::take(&mut self.members)
            .into_iter()
            .partition(|s| s.deadline_ms <= now_ms);
        self.members = keep;
        due
    }
}

/// Tracks suspended units per `(namespace, group)`.
#[derive(Debug, Default)]
pub struct SuspensionRegistry {
    groups: RwLock<HashMap<GroupKey, Arc<Mutex<GroupBucket>>>>,
}

impl SuspensionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bucket for `group`, created on first use.
    pub(crate) fn bucket(&self, group: &GroupKey) -> Arc<Mutex<GroupBucket>> {
        if let Some(bucket) = self.groups.read().get(group) {
            return Arc::clone(bucket);
        }
        let mut groups = self.groups.write();
        Arc::clone(groups.entry(group.clone()).or_default())
    }

    fn existing(&self, group: &GroupKey) -> Option<Arc<Mutex<GroupBucket>>> {
        self.groups.read().get(group).cloned()
    }

    /// Lock the bucket of `group` and run `f` on it.
    pub(crate) fn with_bucket<R>(
        &self,
        group: &GroupKey,
        f: impl FnOnce(&mut GroupBucket) -> R,
    ) -> R {
        let bucket = self.bucket(group);
        let mut guard = bucket.lock();
        f(&mut guard)
    }

    /// Register `unit` as suspended in `group` until `deadline_ms`.
    ///
    /// Idempotent: returns `Ok(false)` if the unit's uid is already
    /// registered, after moving its deadline to `deadline_ms`.
    ///
    /// # Errors
    ///
    /// [`AdmissionError::InvalidTransition`] if `unit` is neither `Queued`
    /// nor `Suspended`.
    pub fn register(&self, group: &GroupKey, mut unit: Unit, deadline_ms: u128) -> Result<bool, AdmissionError> {
        if unit.phase != UnitPhase::Suspended {
            unit.transition(UnitPhase::Suspended)?;
        }
        self.with_bucket(group, |bucket| bucket.insert(unit, deadline_ms))
    }

    /// Deadline of the unit with `uid` suspended in `group`.
    pub fn deadline_of(&self, group: &GroupKey, uid: &str) -> Option<u128> {
        self.existing(group)
            .and_then(|bucket| bucket.lock().deadline_of(uid))
    }

    /// Number of units currently suspended in `group`.
    pub fn count_matching(&self, group: &GroupKey) -> usize {
        self.existing(group).map_or(0, |bucket| bucket.lock().len())
    }

    /// Whether the unit with `uid` is suspended in `group`.
    pub fn contains(&self, group: &GroupKey, uid: &str) -> bool {
        self.existing(group)
            .is_some_and(|bucket| bucket.lock().contains(uid))
    }

    /// Copy of the units suspended in `group`, in registration order.
    pub fn snapshot(&self, group: &GroupKey) -> Vec<Unit> {
        self.existing(group).map_or_else(Vec::new, |bucket| {
            bucket.lock().members.iter().map(|s| s.unit.clone()).collect()
        })
    }

    /// Total suspended units across all groups.
    pub fn len(&self) -> usize {
        let buckets: Vec<_> = self.groups.read().values().cloned().collect();
        buckets.iter().map(|b| b.lock().len()).sum()
    }

    /// Whether nothing is suspended.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove every unit suspended in `group` and pass each, now `Admitted`,
    /// to `on_release` exactly once. Returns the number released.
    ///
    /// The bucket is emptied in one step before any callback runs, so
    /// callbacks may call back into the registry.
    pub fn release_all_matching(&self, group: &GroupKey, mut on_release: impl FnMut(&Unit)) -> usize {
        let Some(bucket) = self.existing(group) else {
            return 0;
        };
        let released = bucket.lock().take_all();
        drop(bucket);
        let mut count = 0;
        for unit in released.into_iter().filter_map(admit) {
            on_release(&unit);
            count += 1;
        }
        self.prune(group);
        count
    }

    /// Time out the unit with `uid` in `group`.
    ///
    /// Returns the unit in phase `TimedOut`, or `None` if it is not
    /// registered, e.g. because a quorum-completing call released it first.
    pub fn expire(&self, group: &GroupKey, uid: &str) -> Option<Unit> {
        let bucket = self.existing(group)?;
        let taken = bucket.lock().take(uid);
        drop(bucket);
        let unit = taken.and_then(time_out);
        self.prune(group);
        unit
    }

    /// Time out every suspension whose deadline is at or before `now_ms`.
    ///
    /// Also drops buckets left empty by callers whose own prune found the
    /// bucket still shared.
    pub fn expire_due(&self, now_ms: u128) -> Vec<Unit> {
        let buckets: Vec<_> = self
            .groups
            .read()
            .iter()
            .map(|(k, b)| (k.clone(), Arc::clone(b)))
            .collect();

        let mut expired = Vec::new();
        for (group, bucket) in buckets {
            let (due, remaining) = {
                let mut guard = bucket.lock();
                let due = guard.take_due(now_ms);
                (due, guard.len())
            };
            drop(bucket);
            expired.extend(due.into_iter().filter_map(time_out));
            if remaining == 0 {
                self.prune(&group);
            }
        }
        expired
    }

    /// Drop the bucket of `group` if it is empty and nobody else holds it.
    ///
    /// Holding the write lock means no new handle can be cloned out, so a
    /// strong count of 1 proves no caller is about to insert into it.
    pub(crate) fn prune(&self, group: &GroupKey) {
        let mut groups = self.groups.write();
        let removable = groups
            .get(group)
            .is_some_and(|b| Arc::strong_count(b) == 1 && b.lock().len() == 0);
        if removable {
            groups.remove(group);
        }
    }

    #[cfg(test)]
    fn bucket_count(&self) -> usize {
        self.groups.read().len()
    }
}

/// Move a taken suspension to `Admitted`. `None` if the lifecycle refuses.
pub(crate) fn admit(suspension: Suspension) -> Option<Unit> {
    settle(suspension, UnitPhase::Admitted)
}

fn time_out(suspension: Suspension) -> Option<Unit> {
    settle(suspension, UnitPhase::TimedOut)
}

fn settle(suspension: Suspension, next: UnitPhase) -> Option<Unit> {
    let mut unit = suspension.unit;
    match unit.transition(next) {
        Ok(()) => Some(unit),
        Err(e) => {
            tracing::error!("dropping suspension: {e}");
            None
        }
    }
}
