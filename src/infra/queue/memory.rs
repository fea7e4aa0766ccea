//! In-memory admission queue ordered by [`QueueOrderer`].

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::core::{AdmissionError, OrderKey, QueueOrderer, Unit};

/// Heap entry: the key is snapshotted at push time, `seq` keeps equal keys FIFO.
struct QueuedUnit {
    key: OrderKey,
    seq: u64,
    unit: Unit,
}

impl PartialEq for QueuedUnit {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.seq == other.seq
    }
}

impl Eq for QueuedUnit {}

impl PartialOrd for QueuedUnit {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueuedUnit {
    fn cmp(&self, other: &Self) -> Ordering {
        // Max-heap: the smallest key must compare greatest.
        other
            .key
            .cmp(&self.key)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Admission queue backed by a binary heap.
/// This provides O(log n) push and pop.
pub struct InMemoryAdmissionQueue {
    orderer: QueueOrderer,
    max_depth: usize,
    units: BinaryHeap<QueuedUnit>,
    next_seq: u64,
}

impl InMemoryAdmissionQueue {
    /// Create a queue holding at most `max_depth` units.
    pub fn new(orderer: QueueOrderer, max_depth: usize) -> Self {
        Self {
            orderer,
            max_depth,
            units: BinaryHeap::with_capacity(max_depth.min(1024)),
            next_seq: 0,
        }
    }

    /// Enqueue `unit`.
    ///
    /// # Errors
    ///
    /// [`AdmissionError::QueueFull`] when the queue is at maximum depth.
    pub fn push(&mut self, unit: Unit) -> Result<(), AdmissionError> {
        if self.units.len() >= self.max_depth {
            return Err(AdmissionError::QueueFull(self.max_depth));
        }
        let key = self.orderer.order_key(&unit);
        let seq = self.next_seq;
        self.next_seq += 1;
        self.units.push(QueuedUnit { key, seq, unit });
        Ok(())
    }

    /// Dequeue the unit to serve next.
    pub fn pop(&mut self) -> Option<Unit> {
        self.units.pop().map(|q| q.unit)
    }

    /// The unit that would be served next.
    pub fn peek(&self) -> Option<&Unit> {
        self.units.peek().map(|q| &q.unit)
    }

    /// Remove the unit with `uid`, wherever it sits.
    pub fn remove(&mut self, uid: &str) -> Option<Unit> {
        let mut removed = None;
        let units: Vec<_> = self.units.drain().collect();
        self.units = units
            .into_iter()
            .filter_map(|q| {
                if removed.is_none() && q.unit.key.uid == uid {
                    removed = Some(q.unit);
                    None
                } else {
                    Some(q)
                }
            })
            .collect();
        removed
    }

    /// Re-resolve every key, e.g. after group records were created or removed.
    pub fn reorder(&mut self) {
        let units: Vec<_> = self.units.drain().collect();
        for mut queued in units {
            queued.key = self.orderer.order_key(&queued.unit);
            self.units.push(queued);
        }
    }

    /// Maximum depth allowed.
    pub const fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Current depth.
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}
