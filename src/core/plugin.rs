//! The surface a placement pipeline plugs in: queue ordering plus the permit gate.

use std::cmp::Ordering;
use std::sync::Arc;
use std::time::Duration;

use crate::core::{Decision, QueueOrderer, QuorumEvaluator, Unit};

/// Coscheduling plugin combining the queue comparator and the permit gate.
///
/// Cheap to clone; clones share the same suspension registry.
#[derive(Clone)]
pub struct GangPlugin {
    name: String,
    evaluator: Arc<QuorumEvaluator>,
    orderer: QueueOrderer,
}

impl GangPlugin {
    /// Assemble a plugin. Prefer [`crate::builders::GangPluginBuilder`].
    pub fn new(name: impl Into<String>, evaluator: QuorumEvaluator, orderer: QueueOrderer) -> Self {
        Self {
            name: name.into(),
            evaluator: Arc::new(evaluator),
            orderer,
        }
    }

    /// Plugin name, also used as the admitter id on release.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Permit gate. See [`QuorumEvaluator::permit`].
    pub fn permit(&self, unit: &Unit) -> (Decision, Duration) {
        self.evaluator.permit(unit)
    }

    /// Queue comparator. See [`QueueOrderer::less`].
    pub fn less(&self, a: &Unit, b: &Unit) -> bool {
        self.orderer.less(a, b)
    }

    /// Three-way queue comparison.
    pub fn compare(&self, a: &Unit, b: &Unit) -> Ordering {
        self.orderer.compare(a, b)
    }

    /// Sort a queue snapshot into admission order.
    pub fn sort_queue(&self, units: &mut [Unit]) {
        self.orderer.sort(units);
    }

    /// Time out one suspended unit.
    pub fn expire(&self, unit: &Unit) -> bool {
        self.evaluator.expire(unit)
    }

    /// Time out every overdue suspension.
    pub fn expire_due(&self, now_ms: u128) -> Vec<Unit> {
        self.evaluator.expire_due(now_ms)
    }

    /// The permit gate.
    pub const fn evaluator(&self) -> &Arc<QuorumEvaluator> {
        &self.evaluator
    }

    /// The queue comparator.
    pub const fn orderer(&self) -> &QueueOrderer {
        &self.orderer
    }
}
