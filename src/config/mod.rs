//! Configuration models for the admission plugin.

pub mod admission;

pub use admission::{AdmissionConfig, ENV_PREFIX};
