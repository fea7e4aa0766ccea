//! Runtime adapters: task spawning, the expiry sweep, and the API surface.

use std::future::Future;

pub mod api;
#[cfg(feature = "tokio-runtime")]
pub mod expiry;
#[cfg(feature = "tokio-runtime")]
pub mod tokio_spawner;

pub use api::{permit_unit, PermitCode, PermitResponse};
#[cfg(feature = "tokio-runtime")]
pub use expiry::{ExpirySweeper, SweeperHandle};
#[cfg(feature = "tokio-runtime")]
pub use tokio_spawner::TokioSpawner;

/// Abstraction for spawning background work on a runtime.
pub trait Spawn {
    /// Spawn a future that runs to completion in the background.
    fn spawn<F>(&self, fut: F)
    where
        F: Future<Output = ()> + Send + 'static;
}
