//! In-memory adapters for the external collaborators and the admission queue.

pub mod inventory;
pub mod queue;
pub mod store;

pub use inventory::InMemoryInventory;
pub use queue::InMemoryAdmissionQueue;
pub use store::InMemoryGroupStore;
