//! Core scheduling abstractions, error taxonomy, and progress model.

pub mod audit;
pub mod error;
pub mod error_code;
pub mod expression;
pub mod progress;
pub mod scheduler;
pub mod trigger;

pub use audit::{build_audit_event, AuditAction, AuditEvent, AuditSink, InMemoryAuditSink};
pub use error::{AppResult, ClassifiedError, HandlerFailure, SchedulerError};
pub use error_code::{name_of, ErrorClass, ErrorCode};
pub use expression::{one_time_cron_expression, parse_one_time_cron_expression};
pub use progress::{CallbackContext, HandlerErrorCode, HandlerResponse, OperationStatus, ProgressEvent};
pub use scheduler::{ReinvocationScheduler, ScheduleResult, HANDLER_PREFIX, TARGET_PREFIX};
pub use trigger::{InvocationContext, TriggerStore};
