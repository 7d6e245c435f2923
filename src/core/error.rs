//! Error types for scheduler operations.

use thiserror::Error;

use super::ErrorCode;

/// An error that knows where it sits in the handler error taxonomy.
pub trait ClassifiedError {
    /// Taxonomy code for this failure.
    fn error_code(&self) -> ErrorCode;
    /// Human-readable message safe to surface to callers.
    fn message(&self) -> String;
}

/// Errors produced by the reinvocation scheduler.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// The invocation context exposes no deadline or function identity.
    #[error("no execution identity")]
    MissingInvocation,
    /// Requested callback delay was zero or negative.
    #[error("scheduled seconds must be greater than 0 (got {0})")]
    InvalidDelay(i64),
    /// The fire time of the requested delay cannot be represented.
    #[error("schedule error: {0} seconds from now is out of range")]
    DelayOutOfRange(i64),
    /// The trigger store refused to create the one-shot rule.
    #[error("schedule error: failed to create rule {rule}")]
    RuleCreation {
        /// Rule that could not be created.
        rule: String,
        /// Store failure.
        #[source]
        source: anyhow::Error,
    },
    /// The rule exists but the target could not be bound to it.
    #[error("schedule error: failed to bind target {target} to rule {rule}")]
    TargetBinding {
        /// Rule the target was meant for.
        rule: String,
        /// Target that could not be bound.
        target: String,
        /// Store failure.
        #[source]
        source: anyhow::Error,
    },
    /// Cleanup was asked for without a rule name or target id.
    #[error("unable to complete request: {0} is required")]
    MissingCleanupArgument(&'static str),
    /// Removing the target binding failed.
    #[error("error cleaning target (target_id={target})")]
    TargetRemoval {
        /// Target that could not be removed.
        target: String,
        /// Store failure.
        #[source]
        source: anyhow::Error,
    },
    /// Deleting the rule failed.
    #[error("error cleaning rule (rule_name={rule})")]
    RuleDeletion {
        /// Rule that could not be deleted.
        rule: String,
        /// Store failure.
        #[source]
        source: anyhow::Error,
    },
    /// A progress event broke its own invariants.
    #[error("invalid progress event: {0}")]
    InvalidProgress(String),
    /// Scheduler configuration was rejected.
    #[error("config invalid: {0}")]
    Config(String),
}

impl ClassifiedError for SchedulerError {
    fn error_code(&self) -> ErrorCode {
        match self {
            Self::InvalidProgress(_) | Self::Config(_) => ErrorCode::InternalFailure,
            _ => ErrorCode::ServiceInternalError,
        }
    }

    fn message(&self) -> String {
        self.to_string()
    }
}

/// Failure raised by a resource handler, tagged with its taxonomy code.
#[derive(Debug, Error)]
#[error("{code}: {message}")]
pub struct HandlerFailure {
    code: ErrorCode,
    message: String,
    #[source]
    source: Option<anyhow::Error>,
}

impl HandlerFailure {
    /// Failure with a code and message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Attach the underlying cause.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<anyhow::Error>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Taxonomy code.
    pub const fn code(&self) -> ErrorCode {
        self.code
    }
}

impl ClassifiedError for HandlerFailure {
    fn error_code(&self) -> ErrorCode {
        self.code
    }

    fn message(&self) -> String {
        self.message.clone()
    }
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
