//! Audit trail of scheduling actions.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::util::clock::now_ms;

/// Scheduling action being recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// Waited in-process instead of scheduling.
    LocalWait,
    /// Rule and target created in the trigger store.
    Scheduled,
    /// Rule creation or target binding failed.
    ScheduleFailed,
    /// Orphaned rule deleted after a failed bind.
    Compensated,
    /// Target removed and rule deleted.
    CleanedUp,
    /// Target removal or rule deletion failed.
    CleanupFailed,
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::LocalWait => "local_wait",
            Self::Scheduled => "scheduled",
            Self::ScheduleFailed => "schedule_failed",
            Self::Compensated => "compensated",
            Self::CleanedUp => "cleaned_up",
            Self::CleanupFailed => "cleanup_failed",
        };
        f.write_str(s)
    }
}

/// Audit event structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Event identifier.
    pub event_id: String,
    /// Action taken.
    pub action: AuditAction,
    /// Rule the action concerns.
    pub rule_name: String,
    /// Target the action concerns.
    pub target_id: String,
    /// Timestamp milliseconds.
    pub created_at_ms: u128,
    /// Additional context (expression, delay, error text).
    pub detail: Option<String>,
}

/// Audit sink abstraction.
pub trait AuditSink: Send {
    /// Record an audit event.
    fn record(&mut self, event: AuditEvent);
}

/// In-memory audit sink for testing and dev.
pub struct InMemoryAuditSink {
    events: VecDeque<AuditEvent>,
    max_events: usize,
}

impl InMemoryAuditSink {
    /// Create a new in-memory sink with a bounded buffer.
    pub fn new(max_events: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(max_events),
            max_events,
        }
    }

    /// Retrieve a snapshot of stored events.
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.iter().cloned().collect()
    }
}

impl AuditSink for InMemoryAuditSink {
    fn record(&mut self, event: AuditEvent) {
        if self.max_events == 0 {
            return;
        }
        if self.events.len() >= self.max_events {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }
}

/// Shared sink: lets the caller keep a handle for inspection.
impl<S: AuditSink> AuditSink for Arc<Mutex<S>> {
    fn record(&mut self, event: AuditEvent) {
        self.lock().record(event);
    }
}

/// Build an audit event stamped with the current time.
pub fn build_audit_event(
    action: AuditAction,
    rule_name: impl Into<String>,
    target_id: impl Into<String>,
    detail: Option<String>,
) -> AuditEvent {
    let rule_name = rule_name.into();
    let created_at_ms = now_ms();
    AuditEvent {
        event_id: format!("{rule_name}-{action}-{created_at_ms}"),
        action,
        rule_name,
        target_id: target_id.into(),
        created_at_ms,
        detail,
    }
}
