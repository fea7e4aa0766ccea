//! Group config store backends.

pub mod memory;

pub use memory::InMemoryGroupStore;
