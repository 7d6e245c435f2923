//! # Reinvoke Scheduler
//!
//! Reinvocation scheduling for resource handlers that run under a hard,
//! externally imposed execution deadline.
//!
//! A handler attempt ends with a [`ProgressEvent`](core::ProgressEvent). When
//! it reports `InProgress` with a positive callback delay, the orchestrator
//! asks the [`ReinvocationScheduler`](core::ReinvocationScheduler) to arrange
//! the next attempt:
//!
//! - **Local wait**: delays under a minute, with more than 20% spare budget,
//!   are waited out in-process and the caller re-invokes itself.
//! - **External trigger**: otherwise a one-shot `cron(..)` rule is created in
//!   the [`TriggerStore`](core::TriggerStore), bound to the running function's
//!   own identity. The fired invocation removes it with `cleanup_events`.
//!
//! Failures are classified through [`ErrorCode`](core::ErrorCode), whose
//! terminal/retriable split tells the operation layer what is worth retrying.
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use reinvoke_scheduler::builders::SchedulerBuilder;
//! use reinvoke_scheduler::infra::InMemoryTriggerStore;
//! use reinvoke_scheduler::runtime::LambdaInvocation;
//!
//! let store = Arc::new(InMemoryTriggerStore::new());
//! let scheduler = SchedulerBuilder::new(Arc::clone(&store)).build()?;
//! let invocation = LambdaInvocation::from_deadline_ms("req-1", arn, deadline_ms).unwrap();
//!
//! let result = scheduler.reschedule(&invocation, 90, &payload).await?;
//! if !result.computed_locally {
//!     // later, from the re-invoked attempt:
//!     scheduler.cleanup_events(&result.handler_id, &result.target_id).await?;
//! }
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Error taxonomy, progress model, and the reinvocation scheduler.
pub mod core;
/// Scheduler configuration.
pub mod config;
/// Builders to construct schedulers from configuration.
pub mod builders;
/// Infrastructure adapters for trigger stores.
pub mod infra;
/// Runtime adapters and orchestration glue.
pub mod runtime;
/// Shared utilities.
pub mod util;
