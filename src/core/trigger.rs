//! Collaborator seams: the external trigger store and the invocation context.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Abstraction for the external one-shot scheduling service.
///
/// Every call is a network round trip in production backends. Errors are
/// reported as-is; the scheduler wraps them.
#[async_trait]
pub trait TriggerStore: Send + Sync {
    /// Create (or overwrite) a rule with a schedule expression.
    async fn create_rule(&self, name: &str, schedule_expression: &str, enabled: bool) -> anyhow::Result<()>;

    /// Bind a target to an existing rule. `destination` is the identity to
    /// invoke; `payload` is passed through as the invocation input.
    async fn bind_target(
        &self,
        rule_name: &str,
        target_id: &str,
        destination: &str,
        payload: &str,
    ) -> anyhow::Result<()>;

    /// Detach a target from a rule.
    async fn remove_target(&self, rule_name: &str, target_id: &str) -> anyhow::Result<()>;

    /// Delete a rule.
    async fn delete_rule(&self, name: &str) -> anyhow::Result<()>;
}

#[async_trait]
impl<S> TriggerStore for Arc<S>
where
    S: TriggerStore + ?Sized,
{
    async fn create_rule(&self, name: &str, schedule_expression: &str, enabled: bool) -> anyhow::Result<()> {
        (**self).create_rule(name, schedule_expression, enabled).await
    }

    async fn bind_target(
        &self,
        rule_name: &str,
        target_id: &str,
        destination: &str,
        payload: &str,
    ) -> anyhow::Result<()> {
        (**self).bind_target(rule_name, target_id, destination, payload).await
    }

    async fn remove_target(&self, rule_name: &str, target_id: &str) -> anyhow::Result<()> {
        (**self).remove_target(rule_name, target_id).await
    }

    async fn delete_rule(&self, name: &str) -> anyhow::Result<()> {
        (**self).delete_rule(name).await
    }
}

/// What the execution environment knows about the running invocation.
pub trait InvocationContext: Send + Sync {
    /// Instant after which the host terminates the invocation.
    fn deadline(&self) -> Option<DateTime<Utc>>;

    /// Identity of the running function, used as the re-invocation destination.
    fn invoked_function_arn(&self) -> Option<&str>;
}
