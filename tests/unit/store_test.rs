//! Tests for the in-memory trigger store

use chrono::{TimeZone, Utc};
use reinvoke_scheduler::core::TriggerStore;
use reinvoke_scheduler::infra::trigger_store::{InMemoryTriggerStore, StoreOperation};

#[tokio::test]
async fn test_create_and_bind() {
    let store = InMemoryTriggerStore::new();
    store.create_rule("r1", "cron(01 00 01 01 ? 2024)", true).await.unwrap();
    store.bind_target("r1", "t1", "arn:fn", "{}").await.unwrap();

    let rule = store.rule("r1").unwrap();
    assert!(rule.enabled);
    assert_eq!(rule.targets.len(), 1);
    assert_eq!(rule.targets[0].destination, "arn:fn");
    assert_eq!(store.calls(), vec![StoreOperation::CreateRule, StoreOperation::BindTarget]);
}

#[tokio::test]
async fn test_bind_requires_rule() {
    let store = InMemoryTriggerStore::new();
    assert!(store.bind_target("missing", "t1", "arn:fn", "{}").await.is_err());
}

#[tokio::test]
async fn test_delete_requires_targets_removed() {
    let store = InMemoryTriggerStore::new();
    store.create_rule("r1", "cron(01 00 01 01 ? 2024)", true).await.unwrap();
    store.bind_target("r1", "t1", "arn:fn", "{}").await.unwrap();

    assert!(store.delete_rule("r1").await.is_err());
    store.remove_target("r1", "t1").await.unwrap();
    store.delete_rule("r1").await.unwrap();
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_injected_failures() {
    let store = InMemoryTriggerStore::new();
    store.fail_on(StoreOperation::CreateRule);
    assert!(store.create_rule("r1", "cron(01 00 01 01 ? 2024)", true).await.is_err());
    assert!(store.is_empty());

    store.clear_failures();
    assert!(store.create_rule("r1", "cron(01 00 01 01 ? 2024)", true).await.is_ok());
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn test_due_reports_only_fired_enabled_rules() {
    let store = InMemoryTriggerStore::new();
    store.create_rule("early", "cron(01 00 01 01 ? 2024)", true).await.unwrap();
    store.bind_target("early", "t-early", "arn:fn", "a").await.unwrap();
    store.create_rule("late", "cron(30 00 01 01 ? 2024)", true).await.unwrap();
    store.bind_target("late", "t-late", "arn:fn", "b").await.unwrap();
    store.create_rule("off", "cron(00 00 01 01 ? 2024)", false).await.unwrap();
    store.bind_target("off", "t-off", "arn:fn", "c").await.unwrap();

    let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 5, 0).unwrap();
    let due = store.due(now);
    assert_eq!(due.len(), 1);
    assert_eq!(due[0].rule_name, "early");
    assert_eq!(due[0].target.payload, "a");
    assert_eq!(due[0].fire_at, Utc.with_ymd_and_hms(2024, 1, 1, 0, 1, 0).unwrap());
}

#[tokio::test]
async fn test_call_log_keeps_most_recent() {
    let store = InMemoryTriggerStore::with_call_log_capacity(2);
    store.create_rule("r1", "cron(01 00 01 01 ? 2024)", true).await.unwrap();
    store.bind_target("r1", "t1", "arn:fn", "{}").await.unwrap();
    store.remove_target("r1", "t1").await.unwrap();

    assert_eq!(store.calls(), vec![StoreOperation::BindTarget, StoreOperation::RemoveTarget]);

    let silent = InMemoryTriggerStore::with_call_log_capacity(0);
    silent.create_rule("r1", "cron(01 00 01 01 ? 2024)", true).await.unwrap();
    assert!(silent.calls().is_empty());
    assert_eq!(silent.len(), 1);
}
