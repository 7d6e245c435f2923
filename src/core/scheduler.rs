//! Reinvocation scheduler.
//!
//! When a handler asks to be called again, the scheduler either waits out the
//! delay in-process (short delays with enough budget left) or hands the
//! continuation to the external trigger store as a one-shot rule. The
//! external store is minute-granular, so delays below a minute are clamped
//! up when they cannot be served locally.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::ReinvokeConfig;
use crate::core::{
    build_audit_event, one_time_cron_expression, AuditAction, AuditSink, InvocationContext, SchedulerError,
    TriggerStore,
};
use crate::util::clock::{Clock, SystemClock};

/// Prefix of every rule name created by the scheduler.
pub const HANDLER_PREFIX: &str = "reinvoke-handler-";
/// Prefix of every target id created by the scheduler.
pub const TARGET_PREFIX: &str = "reinvoke-target-";

/// Outcome of [`ReinvocationScheduler::reschedule`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleResult {
    /// The delay was already waited out; the caller re-invokes itself now.
    pub computed_locally: bool,
    /// Rule name. Only exists in the store when `computed_locally` is false.
    pub handler_id: String,
    /// Target id bound to the rule.
    pub target_id: String,
}

/// Decides between local wait and external one-shot scheduling.
///
/// Holds no per-call state, so one instance can serve concurrent invocations.
pub struct ReinvocationScheduler<S, C = SystemClock> {
    store: S,
    clock: C,
    config: ReinvokeConfig,
    audit: Option<Arc<Mutex<Box<dyn AuditSink>>>>,
}

impl<S: TriggerStore> ReinvocationScheduler<S> {
    /// Scheduler with default configuration and the system clock.
    pub fn new(store: S) -> Self {
        Self::with_parts(store, SystemClock, ReinvokeConfig::default())
    }
}

impl<S, C> ReinvocationScheduler<S, C>
where
    S: TriggerStore,
    C: Clock,
{
    /// Scheduler from explicit parts. Configuration is assumed valid; use
    /// [`SchedulerBuilder`](crate::builders::SchedulerBuilder) to validate.
    pub fn with_parts(store: S, clock: C, config: ReinvokeConfig) -> Self {
        Self {
            store,
            clock,
            config,
            audit: None,
        }
    }

    /// Attach an audit sink.
    #[must_use]
    pub fn with_audit(mut self, audit: Box<dyn AuditSink>) -> Self {
        self.audit = Some(Arc::new(Mutex::new(audit)));
        self
    }

    /// Active configuration.
    pub const fn config(&self) -> &ReinvokeConfig {
        &self.config
    }

    /// Underlying trigger store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Arrange for the current function to run again in `secs_from_now` seconds.
    ///
    /// Waits locally when the delay is under the local-wait ceiling and the
    /// remaining budget exceeds the delay by the safety margin. Otherwise
    /// creates a rule named [`HANDLER_PREFIX`]`<token>` firing no sooner than
    /// the external minimum, bound to the invocation's own identity with
    /// `callback_request` as input.
    ///
    /// # Errors
    ///
    /// `InvalidDelay` for a non-positive delay, `MissingInvocation` when the
    /// context has no deadline or identity, `DelayOutOfRange` when the fire
    /// time cannot be represented, and `RuleCreation` /
    /// `TargetBinding` when the store fails. A failed bind leaves the rule
    /// behind unless `compensate_on_bind_failure` is set.
    pub async fn reschedule(
        &self,
        ctx: &dyn InvocationContext,
        secs_from_now: i64,
        callback_request: &str,
    ) -> Result<ScheduleResult, SchedulerError> {
        self.reschedule_with(ctx, secs_from_now, |_, _| Ok(callback_request.to_owned()))
            .await
    }

    /// Like [`reschedule`](Self::reschedule), but the payload is built from the
    /// generated rule name and target id. `build_payload` only runs when the
    /// external branch is taken.
    ///
    /// # Errors
    ///
    /// As for `reschedule`, plus any error returned by `build_payload`.
    pub async fn reschedule_with<F>(
        &self,
        ctx: &dyn InvocationContext,
        secs_from_now: i64,
        build_payload: F,
    ) -> Result<ScheduleResult, SchedulerError>
    where
        F: FnOnce(&str, &str) -> Result<String, SchedulerError> + Send,
    {
        if secs_from_now <= 0 {
            return Err(SchedulerError::InvalidDelay(secs_from_now));
        }

        let (deadline, destination) = match (ctx.deadline(), ctx.invoked_function_arn()) {
            (Some(deadline), Some(arn)) if !arn.is_empty() => (deadline, arn),
            _ => return Err(SchedulerError::MissingInvocation),
        };

        let now = self.clock.now();
        #[allow(clippy::cast_precision_loss)]
        let remaining_secs = (deadline - now).num_milliseconds() as f64 / 1000.0;

        let token = Uuid::new_v4();
        let handler_id = format!("{HANDLER_PREFIX}{token}");
        let target_id = format!("{TARGET_PREFIX}{token}");

        if self.should_wait_locally(secs_from_now, remaining_secs) {
            tracing::info!(
                delay_secs = secs_from_now,
                remaining_secs,
                "scheduling re-invoke locally"
            );
            tokio::time::sleep(Duration::from_secs(secs_from_now.unsigned_abs())).await;
            self.record(
                AuditAction::LocalWait,
                &handler_id,
                &target_id,
                Some(format!("{secs_from_now}s")),
            );
            return Ok(ScheduleResult {
                computed_locally: true,
                handler_id,
                target_id,
            });
        }

        let delay = secs_from_now.max(self.config.min_external_delay_secs);
        let Some(expression) = one_time_cron_expression(delay, now) else {
            tracing::error!(delay_secs = delay, "fire time out of range");
            return Err(SchedulerError::DelayOutOfRange(delay));
        };
        let payload = build_payload(&handler_id, &target_id)?;
        tracing::info!(rule = %handler_id, %expression, "scheduling re-invoke externally");

        if let Err(source) = self.store.create_rule(&handler_id, &expression, true).await {
            tracing::error!(rule = %handler_id, error = %source, "failed to create rule");
            self.record(AuditAction::ScheduleFailed, &handler_id, &target_id, Some(source.to_string()));
            return Err(SchedulerError::RuleCreation {
                rule: handler_id,
                source,
            });
        }

        if let Err(source) = self
            .store
            .bind_target(&handler_id, &target_id, destination, &payload)
            .await
        {
            tracing::error!(rule = %handler_id, target_id = %target_id, error = %source, "failed to bind target");
            self.record(AuditAction::ScheduleFailed, &handler_id, &target_id, Some(source.to_string()));
            if self.config.compensate_on_bind_failure {
                self.compensate(&handler_id, &target_id).await;
            }
            return Err(SchedulerError::TargetBinding {
                rule: handler_id,
                target: target_id,
                source,
            });
        }

        self.record(AuditAction::Scheduled, &handler_id, &target_id, Some(expression));
        Ok(ScheduleResult {
            computed_locally: false,
            handler_id,
            target_id,
        })
    }

    /// Remove the trigger that produced a re-invocation: detach the target,
    /// then delete the rule. The two calls are independent; a successful
    /// removal is not rolled back when the deletion fails.
    ///
    /// # Errors
    ///
    /// `MissingCleanupArgument` for an empty name (the store is not
    /// contacted), `TargetRemoval` or `RuleDeletion` when the store fails.
    pub async fn cleanup_events(&self, rule_name: &str, target_id: &str) -> Result<(), SchedulerError> {
        if rule_name.is_empty() {
            return Err(SchedulerError::MissingCleanupArgument("rule_name"));
        }
        if target_id.is_empty() {
            return Err(SchedulerError::MissingCleanupArgument("target_id"));
        }

        if let Err(source) = self.store.remove_target(rule_name, target_id).await {
            tracing::error!(target_id, error = %source, "error cleaning target");
            self.record(AuditAction::CleanupFailed, rule_name, target_id, Some(source.to_string()));
            return Err(SchedulerError::TargetRemoval {
                target: target_id.to_string(),
                source,
            });
        }
        tracing::info!(target_id, "target removed");

        if let Err(source) = self.store.delete_rule(rule_name).await {
            tracing::error!(rule = rule_name, error = %source, "error cleaning rule");
            self.record(AuditAction::CleanupFailed, rule_name, target_id, Some(source.to_string()));
            return Err(SchedulerError::RuleDeletion {
                rule: rule_name.to_string(),
                source,
            });
        }
        tracing::info!(rule = rule_name, "rule removed");

        self.record(AuditAction::CleanedUp, rule_name, target_id, None);
        Ok(())
    }

    #[allow(clippy::cast_precision_loss)]
    fn should_wait_locally(&self, secs_from_now: i64, remaining_secs: f64) -> bool {
        secs_from_now < self.config.local_wait_ceiling_secs
            && remaining_secs > secs_from_now as f64 * self.config.safety_margin
    }

    /// Best-effort deletion of a rule whose target never got bound.
    async fn compensate(&self, rule_name: &str, target_id: &str) {
        match self.store.delete_rule(rule_name).await {
            Ok(()) => {
                tracing::warn!(rule = rule_name, "deleted rule left without target");
                self.record(AuditAction::Compensated, rule_name, target_id, None);
            }
            Err(e) => {
                tracing::warn!(rule = rule_name, error = %e, "could not delete rule left without target");
            }
        }
    }

    fn record(&self, action: AuditAction, rule_name: &str, target_id: &str, detail: Option<String>) {
        if let Some(audit_sink) = &self.audit {
            let mut sink = audit_sink.lock();
            sink.record(build_audit_event(action, rule_name, target_id, detail));
        }
    }
}
