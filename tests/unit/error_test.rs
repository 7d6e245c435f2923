//! Tests for error types

use std::error::Error as _;

use reinvoke_scheduler::core::{ClassifiedError, ErrorCode, HandlerFailure, SchedulerError};

#[test]
fn test_invalid_delay_error() {
    let err = SchedulerError::InvalidDelay(0);
    assert_eq!(format!("{}", err), "scheduled seconds must be greater than 0 (got 0)");
    assert_eq!(err.error_code(), ErrorCode::ServiceInternalError);
}

#[test]
fn test_missing_invocation_error() {
    let err = SchedulerError::MissingInvocation;
    assert_eq!(format!("{}", err), "no execution identity");
    assert_eq!(err.error_code(), ErrorCode::ServiceInternalError);
}

#[test]
fn test_missing_cleanup_argument_error() {
    let err = SchedulerError::MissingCleanupArgument("rule_name");
    assert_eq!(format!("{}", err), "unable to complete request: rule_name is required");
}

#[test]
fn test_store_errors_keep_their_cause() {
    let err = SchedulerError::RuleCreation {
        rule: "reinvoke-handler-x".into(),
        source: anyhow::anyhow!("throttled by store"),
    };
    assert_eq!(err.error_code(), ErrorCode::ServiceInternalError);
    assert_eq!(err.source().map(ToString::to_string).as_deref(), Some("throttled by store"));
}

#[test]
fn test_invalid_progress_is_internal_failure() {
    let err = SchedulerError::InvalidProgress("bad".into());
    assert_eq!(err.error_code(), ErrorCode::InternalFailure);
    assert!(err.error_code().is_terminal());
}

#[test]
fn test_handler_failure() {
    let failure = HandlerFailure::new(ErrorCode::Throttling, "rate exceeded")
        .with_source(std::io::Error::other("429"));
    assert_eq!(failure.code(), ErrorCode::Throttling);
    assert_eq!(failure.message(), "rate exceeded");
    assert_eq!(format!("{}", failure), "Throttling: rate exceeded");
    assert!(failure.source().is_some());
}
