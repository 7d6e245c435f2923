//! Tests for progress events and their conversions

use reinvoke_scheduler::core::{
    CallbackContext, ErrorCode, HandlerFailure, OperationStatus, ProgressEvent, SchedulerError,
};

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
struct Bucket {
    name: String,
}

#[test]
fn test_new_event_is_unknown_and_empty() {
    let event: ProgressEvent<Bucket> = ProgressEvent::new();
    assert_eq!(event.operation_status, OperationStatus::Unknown);
    assert!(event.callback_context.is_empty());
    assert_eq!(event.callback_delay_seconds, 0);
    assert!(event.resource_model.is_none());
    assert!(!event.needs_reinvocation());
}

#[test]
fn test_failed_event_copies_code_and_message() {
    let failure = HandlerFailure::new(ErrorCode::NotFound, "bucket gone");
    let event: ProgressEvent<Bucket> = ProgressEvent::failed(&failure);
    assert_eq!(event.operation_status, OperationStatus::Failed);
    assert_eq!(event.handler_error_code, "NotFound");
    assert_eq!(event.message, "bucket gone");
    assert!(event.check().is_ok());
}

#[test]
fn test_failed_event_from_scheduler_error() {
    let event: ProgressEvent<Bucket> = ProgressEvent::failed(&SchedulerError::MissingInvocation);
    assert_eq!(event.handler_error_code, "ServiceInternalError");
    assert_eq!(event.message, "no execution identity");
}

#[test]
fn test_failed_without_code_breaks_invariant() {
    let event = ProgressEvent::<Bucket> {
        operation_status: OperationStatus::Failed,
        ..ProgressEvent::new()
    };
    assert!(matches!(event.check(), Err(SchedulerError::InvalidProgress(_))));
}

#[test]
fn test_reinvocation_requires_positive_delay() {
    let ctx = CallbackContext::new();
    assert!(ProgressEvent::<Bucket>::in_progress(ctx.clone(), 30).needs_reinvocation());
    assert!(!ProgressEvent::<Bucket>::in_progress(ctx.clone(), 0).needs_reinvocation());
    assert!(!ProgressEvent::<Bucket>::in_progress(ctx, -1).needs_reinvocation());
    assert!(!ProgressEvent::success(Bucket { name: "b".into() }).needs_reinvocation());
}

#[test]
fn test_marshal_callback_returns_context_and_delay() {
    let mut ctx = CallbackContext::new();
    ctx.insert("stabilizing", true).unwrap();
    ctx.insert("physical_id", "bucket-123").unwrap();
    let event: ProgressEvent<Bucket> = ProgressEvent::in_progress(ctx, 45);

    let (returned, delay) = event.marshal_callback();
    assert_eq!(delay, 45);
    assert_eq!(returned.get::<bool>("stabilizing"), Some(true));
    assert_eq!(returned.get::<String>("physical_id").as_deref(), Some("bucket-123"));
    assert_eq!(returned.get::<u32>("physical_id"), None);
}

#[test]
fn test_marshal_response_skips_code_when_handler_code_set() {
    let mut event = ProgressEvent::success(Bucket { name: "b".into() });
    event.handler_error_code = "Throttling".into();
    let resp = event.marshal_response();
    assert_eq!(resp.operation_status, OperationStatus::Success);
    assert_eq!(resp.resource_model, Some(Bucket { name: "b".into() }));
    assert!(resp.error_code.is_none());
}

#[test]
fn test_marshal_response_attaches_code_when_handler_code_empty() {
    let event: ProgressEvent<Bucket> = ProgressEvent::new().with_message("working");
    let resp = event.marshal_response();
    let code = resp.error_code.expect("error code attached for empty handler code");
    assert_eq!(code.code, "");
    assert_eq!(code.message, "working");
    assert_eq!(resp.message, "working");
    assert!(resp.resource_model.is_none());
}

#[test]
fn test_response_wire_shape() {
    let failure = HandlerFailure::new(ErrorCode::AccessDenied, "nope");
    let event: ProgressEvent<Bucket> = ProgressEvent::failed(&failure);
    let json = serde_json::to_value(event.marshal_response()).unwrap();
    assert_eq!(json["operationStatus"], "FAILED");
    assert_eq!(json["message"], "nope");
    assert!(json.get("errorCode").is_none());
    assert!(json.get("resourceModel").is_none());
}
