//! Inventory view backends.

pub mod memory;

pub use memory::{InMemoryInventory, InventoryEntry, RunState};
