//! Tests for utility functions

use chrono::{TimeZone, Utc};
use reinvoke_scheduler::config::ReinvokeConfig;
use reinvoke_scheduler::util::{init_tracing, init_tracing_from, now_ms, Clock, FixedClock, SystemClock};

#[test]
fn test_fixed_clock() {
    let at = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
    let clock = FixedClock::new(at);
    assert_eq!(clock.now(), at);
    assert_eq!(clock.now(), at);
}

#[test]
fn test_system_clock_moves_forward() {
    let a = SystemClock.now();
    let b = SystemClock.now();
    assert!(b >= a);
    assert!(now_ms() > 0);
}

#[test]
fn test_init_tracing_only_installs_once() {
    init_tracing("debug");
    assert!(!init_tracing("debug"));
}

#[test]
fn test_init_tracing_from_config() {
    let cfg = ReinvokeConfig::from_json_str(r#"{"log_filter": "reinvoke_scheduler=debug"}"#).unwrap();
    init_tracing_from(&cfg);
    assert!(!init_tracing_from(&cfg));
    assert!(tracing::dispatcher::has_been_set());
}
