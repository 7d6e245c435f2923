//! Orchestration glue between handler progress and the scheduler.
//!
//! After each handler attempt the orchestrator calls [`schedule_callback`].
//! When a re-invocation arrives through an external trigger, the request
//! context carries the trigger's names and [`cleanup_fired_trigger`] removes it.

use serde::{Deserialize, Serialize};

use crate::core::{
    CallbackContext, InvocationContext, ProgressEvent, ReinvocationScheduler, ScheduleResult, SchedulerError,
    TriggerStore,
};
use crate::util::clock::Clock;

/// Continuation state carried from one invocation to the next.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestContext {
    /// Number of attempts made so far.
    pub invocation: u32,
    /// Handler state from the previous attempt.
    pub callback_context: CallbackContext,
    /// Rule that fired this invocation, if it came from the trigger store.
    #[serde(rename = "cloudWatchEventsRuleName", default, skip_serializing_if = "Option::is_none")]
    pub rule_name: Option<String>,
    /// Target that fired this invocation, if it came from the trigger store.
    #[serde(rename = "cloudWatchEventsTargetId", default, skip_serializing_if = "Option::is_none")]
    pub target_id: Option<String>,
}

impl RequestContext {
    /// Context for the attempt following `self`, carrying `callback_context`.
    #[must_use]
    pub fn next(&self, callback_context: CallbackContext) -> Self {
        Self {
            invocation: self.invocation.saturating_add(1),
            callback_context,
            rule_name: None,
            target_id: None,
        }
    }

    /// Stamp the trigger that will deliver this context.
    #[must_use]
    pub fn with_trigger(mut self, rule_name: &str, target_id: &str) -> Self {
        self.rule_name = Some(rule_name.to_string());
        self.target_id = Some(target_id.to_string());
        self
    }
}

/// What the orchestrator should do after a handler attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum CallbackOutcome {
    /// No callback requested; the response is final.
    Done,
    /// The delay was waited out locally; run the handler again now with this context.
    ReinvokeNow(RequestContext),
    /// An external trigger will deliver this context later.
    Scheduled {
        /// Trigger identifiers.
        result: ScheduleResult,
        /// Context handed to the trigger.
        context: RequestContext,
    },
}

/// Turn a progress event into a scheduling decision.
///
/// Events that are not in progress, or that request no delay, finish the
/// operation. Otherwise the next [`RequestContext`] is serialized and handed
/// to the scheduler. A context bound to an external trigger names that
/// trigger so the fired invocation can clean it up.
///
/// # Errors
///
/// `InvalidProgress` when the event breaks its invariants or the context
/// cannot be serialized; any error from `reschedule`.
pub async fn schedule_callback<S, C, T>(
    scheduler: &ReinvocationScheduler<S, C>,
    ctx: &dyn InvocationContext,
    current: &RequestContext,
    event: &ProgressEvent<T>,
) -> Result<CallbackOutcome, SchedulerError>
where
    S: TriggerStore,
    C: Clock,
{
    event.check()?;
    if !event.needs_reinvocation() {
        return Ok(CallbackOutcome::Done);
    }

    let (callback_context, delay) = event.marshal_callback();
    let next = current.next(callback_context);

    let result = scheduler
        .reschedule_with(ctx, delay, |rule_name, target_id| {
            let delivered = next.clone().with_trigger(rule_name, target_id);
            serde_json::to_string(&delivered)
                .map_err(|e| SchedulerError::InvalidProgress(format!("context encoding: {e}")))
        })
        .await?;

    if result.computed_locally {
        tracing::debug!(invocation = next.invocation, "re-invoking in process");
        return Ok(CallbackOutcome::ReinvokeNow(next));
    }

    let context = next.with_trigger(&result.handler_id, &result.target_id);
    Ok(CallbackOutcome::Scheduled { result, context })
}

/// Remove the trigger named in `current`, if any. Returns whether a cleanup ran.
///
/// # Errors
///
/// Any error from [`ReinvocationScheduler::cleanup_events`].
pub async fn cleanup_fired_trigger<S, C>(
    scheduler: &ReinvocationScheduler<S, C>,
    current: &RequestContext,
) -> Result<bool, SchedulerError>
where
    S: TriggerStore,
    C: Clock,
{
    match (&current.rule_name, &current.target_id) {
        (Some(rule), Some(target)) => {
            scheduler.cleanup_events(rule, target).await?;
            Ok(true)
        }
        _ => Ok(false),
    }
}
