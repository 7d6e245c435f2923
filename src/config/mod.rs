//! Configuration models for the reinvocation scheduler.

pub mod reinvoke;

pub use reinvoke::ReinvokeConfig;
