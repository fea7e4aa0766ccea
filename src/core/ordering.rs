//! Group-aware ordering of the admission queue.
//!
//! Rules, first decisive one wins:
//! 1. Units without a group timestamp go before units with one.
//! 2. Between grouped units, the older group goes first.
//! 3. Otherwise higher priority first, then earlier arrival.
//!
//! Every comparison is a comparison of [`OrderKey`]s, so the order is a
//! strict weak ordering as long as the store answers consistently.

use std::cmp::{Ordering, Reverse};

use crate::core::{GroupConfigResolver, Unit};

/// Sort key of a unit in the admission queue. Smaller sorts first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct OrderKey {
    group_created_ms: Option<u128>,
    priority: Reverse<i32>,
    arrival_ms: u128,
}

impl OrderKey {
    /// Build a key from its parts.
    pub const fn new(group_created_ms: Option<u128>, priority: i32, arrival_ms: u128) -> Self {
        Self {
            group_created_ms,
            priority: Reverse(priority),
            arrival_ms,
        }
    }

    /// Creation time of the unit's group, if it has one.
    pub const fn group_created_ms(&self) -> Option<u128> {
        self.group_created_ms
    }
}

/// Comparator for the admission queue.
#[derive(Clone)]
pub struct QueueOrderer {
    resolver: GroupConfigResolver,
    group_label: String,
}

impl QueueOrderer {
    /// Create an orderer reading group creation times through `resolver`.
    pub fn new(resolver: GroupConfigResolver, group_label: impl Into<String>) -> Self {
        Self {
            resolver,
            group_label: group_label.into(),
        }
    }

    /// Group timestamp of `unit`: its own group's creation time. A unit
    /// whose group record is missing has none.
    pub fn group_timestamp(&self, unit: &Unit) -> Option<u128> {
        let group = unit.group_name(&self.group_label)?;
        self.resolver.creation_time(unit.namespace(), group)
    }

    /// Sort key of `unit`, resolved against the current store contents.
    pub fn order_key(&self, unit: &Unit) -> OrderKey {
        OrderKey::new(self.group_timestamp(unit), unit.priority, unit.arrival_ms)
    }

    /// Total order of `a` relative to `b`.
    pub fn compare(&self, a: &Unit, b: &Unit) -> Ordering {
        self.order_key(a).cmp(&self.order_key(b))
    }

    /// Whether `a` should be served before `b`.
    pub fn less(&self, a: &Unit, b: &Unit) -> bool {
        self.compare(a, b) == Ordering::Less
    }

    /// Sort `units` into admission order. Each unit's key is resolved once,
    /// so a store update mid-sort cannot break the ordering.
    pub fn sort(&self, units: &mut [Unit]) {
        units.sort_by_cached_key(|u| self.order_key(u));
    }
}
