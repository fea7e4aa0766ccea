//! # Gang Admission
//!
//! Gang admission control for a cluster job scheduler: a unit of work that
//! belongs to a group only starts once enough of its siblings can start with
//! it, and the admission queue is ordered so group members are served by group
//! age without starving ungrouped work.
//!
//! ## Core Problem Solved
//!
//! Distributed jobs (training runs, MPI ranks, parameter servers) are useless
//! until a minimum number of their members are running. Starting members one
//! at a time wastes capacity on units that cannot make progress and can
//! deadlock the cluster when two half-started groups hold what the other needs.
//!
//! ## Key Features
//!
//! - **Quorum Permit**: a grouped unit waits until `running + waiting + 1` reaches
//!   the group's `minAvailable`; the unit that completes the quorum releases all
//!   waiting siblings in the same call
//! - **Race-Free Release**: per-group locking so each suspended unit is released
//!   or timed out exactly once
//! - **Group-Aware Ordering**: ungrouped units first, then older groups, then
//!   priority and arrival
//! - **Explicit Collaborators**: the config store, inventory view, and pipeline
//!   hooks are injected traits
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use gang_admission::builders::GangPluginBuilder;
//! use gang_admission::config::AdmissionConfig;
//! use gang_admission::core::{Decision, Unit};
//!
//! let plugin = GangPluginBuilder::new(AdmissionConfig::default())
//!     .with_store(store)
//!     .with_inventory(inventory)
//!     .with_hooks(pipeline_hooks)
//!     .build()?;
//!
//! let unit = Unit::new("team-a", "worker-0", "uid-0").in_group("trainer");
//! match plugin.permit(&unit) {
//!     (Decision::Admit, _) => bind(unit),
//!     (Decision::Suspend(reason), timeout) => park(unit, reason, timeout),
//!     (Decision::Reject(rejection), _) => fail(unit, rejection),
//! }
//! ```
//!
//! For complete examples, see:
//! - `tests/permit_test.rs` - quorum scenarios end to end
//! - `tests/concurrency_test.rs` - concurrent permits on one group

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Core admission abstractions and the quorum algorithm.
pub mod core;
/// Configuration models.
pub mod config;
/// Builders to construct the plugin from configuration.
pub mod builders;
/// In-memory collaborators and the admission queue.
pub mod infra;
/// Runtime adapters and API surface.
pub mod runtime;
/// Shared utilities.
pub mod util;
