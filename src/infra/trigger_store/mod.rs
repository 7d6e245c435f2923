//! Trigger store backends.

pub mod memory;

pub use memory::{
    BoundTarget, FiredTrigger, InMemoryTriggerStore, StoreOperation, TriggerRule, DEFAULT_CALL_LOG_CAPACITY,
};
