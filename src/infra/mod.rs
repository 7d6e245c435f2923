//! Infrastructure adapters for the external trigger store.

pub mod trigger_store;

pub use trigger_store::InMemoryTriggerStore;
