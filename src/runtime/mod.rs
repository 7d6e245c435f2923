//! Runtime adapters: invocation context and callback orchestration glue.

pub mod callback;
pub mod invocation;

pub use callback::{cleanup_fired_trigger, schedule_callback, CallbackOutcome, RequestContext};
pub use invocation::LambdaInvocation;
