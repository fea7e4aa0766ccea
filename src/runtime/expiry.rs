//! Periodic expiry of suspended units.
//!
//! The registry records a deadline for every suspension; this sweeper is the
//! timer that turns overdue suspensions into `TimedOut` and reports them via
//! [`crate::core::WaitingUnitHooks::time_out`]. Release and expiry both remove
//! through the registry's take, so a unit released concurrently is never also
//! timed out.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;
use tokio::time::MissedTickBehavior;

use crate::core::GangPlugin;
use crate::runtime::Spawn;
use crate::util::clock::now_ms;

/// Handle to a running sweeper.
#[derive(Clone)]
pub struct SweeperHandle {
    shutdown: Arc<Notify>,
    stopped: Arc<AtomicBool>,
}

impl SweeperHandle {
    /// Ask the sweeper to stop after its current tick.
    pub fn shutdown(&self) {
        self.shutdown.notify_one();
    }

    /// Whether the sweep loop has exited.
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }
}

/// Expires overdue suspensions every `interval`.
pub struct ExpirySweeper {
    plugin: GangPlugin,
    interval: Duration,
}

impl ExpirySweeper {
    /// Create a sweeper for `plugin`.
    pub const fn new(plugin: GangPlugin, interval: Duration) -> Self {
        Self { plugin, interval }
    }

    /// Run one sweep now. Returns the number of units timed out.
    pub fn sweep_once(&self) -> usize {
        self.plugin.expire_due(now_ms()).len()
    }

    /// Start sweeping on `spawner`.
    pub fn spawn<S: Spawn>(self, spawner: &S) -> SweeperHandle {
        let handle = SweeperHandle {
            shutdown: Arc::new(Notify::new()),
            stopped: Arc::new(AtomicBool::new(false)),
        };
        let shutdown = Arc::clone(&handle.shutdown);
        let stopped = Arc::clone(&handle.stopped);

        spawner.spawn(async move {
            let mut ticker = tokio::time::interval(self.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            tracing::debug!("expiry sweeper started, interval {:?}", self.interval);
            loop {
                tokio::select! {
                    () = shutdown.notified() => break,
                    _ = ticker.tick() => {
                        let expired = self.sweep_once();
                        if expired > 0 {
                            tracing::debug!("expiry sweep timed out {expired} units");
                        }
                    }
                }
            }
            stopped.store(true, Ordering::Release);
            tracing::info!("expiry sweeper shutting down");
        });

        handle
    }
}
