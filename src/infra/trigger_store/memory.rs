//! In-memory trigger store.
//!
//! Mirrors the external scheduler's rules closely enough to exercise the full
//! schedule → fire → cleanup cycle: rules are upserted, targets require an
//! existing rule, and a rule cannot be deleted while targets remain bound.

use std::collections::{BTreeMap, HashSet, VecDeque};

use anyhow::{anyhow, bail};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use crate::core::{parse_one_time_cron_expression, TriggerStore};

/// Store call kinds, recorded in order and usable for failure injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOperation {
    /// `create_rule`.
    CreateRule,
    /// `bind_target`.
    BindTarget,
    /// `remove_target`.
    RemoveTarget,
    /// `delete_rule`.
    DeleteRule,
}

/// Target bound to a rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundTarget {
    /// Target id.
    pub id: String,
    /// Identity invoked when the rule fires.
    pub destination: String,
    /// Invocation input.
    pub payload: String,
}

/// Rule as held by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerRule {
    /// Rule name.
    pub name: String,
    /// Schedule expression.
    pub schedule_expression: String,
    /// Whether the rule fires.
    pub enabled: bool,
    /// Bound targets.
    pub targets: Vec<BoundTarget>,
}

/// A target whose rule is due.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FiredTrigger {
    /// Rule that fired.
    pub rule_name: String,
    /// Fire time encoded in the rule's expression.
    pub fire_at: DateTime<Utc>,
    /// Target to invoke.
    pub target: BoundTarget,
}

/// Calls remembered by [`InMemoryTriggerStore::new`]; older ones are dropped.
pub const DEFAULT_CALL_LOG_CAPACITY: usize = 1024;

struct StoreState {
    rules: BTreeMap<String, TriggerRule>,
    calls: VecDeque<StoreOperation>,
    max_calls: usize,
    failing: HashSet<StoreOperation>,
}

impl StoreState {
    fn enter(&mut self, op: StoreOperation) -> anyhow::Result<()> {
        if self.max_calls > 0 {
            if self.calls.len() == self.max_calls {
                self.calls.pop_front();
            }
            self.calls.push_back(op);
        }
        if self.failing.contains(&op) {
            bail!("injected failure for {op:?}");
        }
        Ok(())
    }
}

/// Simple in-memory trigger store for development/testing.
///
/// Rules live until deleted. The call log is bounded.
pub struct InMemoryTriggerStore {
    state: Mutex<StoreState>,
}

impl Default for InMemoryTriggerStore {
    fn default() -> Self {
        Self::with_call_log_capacity(DEFAULT_CALL_LOG_CAPACITY)
    }
}

impl InMemoryTriggerStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store remembering at most `max_calls` calls.
    /// Zero disables the call log.
    pub fn with_call_log_capacity(max_calls: usize) -> Self {
        Self {
            state: Mutex::new(StoreState {
                rules: BTreeMap::new(),
                calls: VecDeque::with_capacity(max_calls.min(DEFAULT_CALL_LOG_CAPACITY)),
                max_calls,
                failing: HashSet::new(),
            }),
        }
    }

    /// Make every subsequent call of `op` fail.
    pub fn fail_on(&self, op: StoreOperation) {
        self.state.lock().failing.insert(op);
    }

    /// Stop injecting failures.
    pub fn clear_failures(&self) {
        self.state.lock().failing.clear();
    }

    /// Snapshot of a rule.
    pub fn rule(&self, name: &str) -> Option<TriggerRule> {
        self.state.lock().rules.get(name).cloned()
    }

    /// Snapshot of all rules ordered by name.
    pub fn rules(&self) -> Vec<TriggerRule> {
        self.state.lock().rules.values().cloned().collect()
    }

    /// Number of rules held.
    pub fn len(&self) -> usize {
        self.state.lock().rules.len()
    }

    /// True when no rules are held.
    pub fn is_empty(&self) -> bool {
        self.state.lock().rules.is_empty()
    }

    /// Most recent calls, oldest first.
    pub fn calls(&self) -> Vec<StoreOperation> {
        self.state.lock().calls.iter().copied().collect()
    }

    /// Targets of enabled rules whose fire time is at or before `now`.
    /// Rules with expressions that are not one-shot are skipped.
    pub fn due(&self, now: DateTime<Utc>) -> Vec<FiredTrigger> {
        let state = self.state.lock();
        state
            .rules
            .values()
            .filter(|rule| rule.enabled)
            .filter_map(|rule| {
                let fire_at = parse_one_time_cron_expression(&rule.schedule_expression)?;
                (fire_at <= now).then_some((rule, fire_at))
            })
            .flat_map(|(rule, fire_at)| {
                rule.targets.iter().map(move |target| FiredTrigger {
                    rule_name: rule.name.clone(),
                    fire_at,
                    target: target.clone(),
                })
            })
            .collect()
    }
}

#[async_trait]
impl TriggerStore for InMemoryTriggerStore {
    async fn create_rule(&self, name: &str, schedule_expression: &str, enabled: bool) -> anyhow::Result<()> {
        let mut state = self.state.lock();
        state.enter(StoreOperation::CreateRule)?;
        let rule = state.rules.entry(name.to_string()).or_insert_with(|| TriggerRule {
            name: name.to_string(),
            schedule_expression: String::new(),
            enabled,
            targets: Vec::new(),
        });
        rule.schedule_expression = schedule_expression.to_string();
        rule.enabled = enabled;
        Ok(())
    }

    async fn bind_target(
        &self,
        rule_name: &str,
        target_id: &str,
        destination: &str,
        payload: &str,
    ) -> anyhow::Result<()> {
        let mut state = self.state.lock();
        state.enter(StoreOperation::BindTarget)?;
        let rule = state
            .rules
            .get_mut(rule_name)
            .ok_or_else(|| anyhow!("rule {rule_name} does not exist"))?;
        let target = BoundTarget {
            id: target_id.to_string(),
            destination: destination.to_string(),
            payload: payload.to_string(),
        };
        match rule.targets.iter_mut().find(|t| t.id == target_id) {
            Some(existing) => *existing = target,
            None => rule.targets.push(target),
        }
        Ok(())
    }

    async fn remove_target(&self, rule_name: &str, target_id: &str) -> anyhow::Result<()> {
        let mut state = self.state.lock();
        state.enter(StoreOperation::RemoveTarget)?;
        let rule = state
            .rules
            .get_mut(rule_name)
            .ok_or_else(|| anyhow!("rule {rule_name} does not exist"))?;
        rule.targets.retain(|t| t.id != target_id);
        Ok(())
    }

    async fn delete_rule(&self, name: &str) -> anyhow::Result<()> {
        let mut state = self.state.lock();
        state.enter(StoreOperation::DeleteRule)?;
        if state.rules.get(name).is_some_and(|rule| !rule.targets.is_empty()) {
            bail!("rule {name} still has targets");
        }
        state.rules.remove(name);
        Ok(())
    }
}
