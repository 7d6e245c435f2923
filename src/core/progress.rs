//! Progress events returned by resource handlers.
//!
//! A handler produces exactly one [`ProgressEvent`] per attempt. The
//! orchestrator turns it into a [`HandlerResponse`] for the caller and, when
//! the handler asked for more time, into a callback descriptor for the
//! [`ReinvocationScheduler`](super::ReinvocationScheduler).

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{ClassifiedError, SchedulerError};

/// Progress state of a handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationStatus {
    /// Nothing reported yet.
    #[default]
    Unknown,
    /// Handler needs more time.
    InProgress,
    /// Handler reached its goal.
    Success,
    /// Handler gave up.
    Failed,
}

/// Pass-through state threaded between attempts of the same operation.
///
/// Plain data: it has no lifecycle of its own and is serialized verbatim into
/// the continuation payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CallbackContext(Map<String, Value>);

impl CallbackContext {
    /// Empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a serializable value under `key`.
    pub fn insert<V: Serialize>(&mut self, key: impl Into<String>, value: V) -> serde_json::Result<()> {
        self.0.insert(key.into(), serde_json::to_value(value)?);
        Ok(())
    }

    /// Read back the value under `key`, if present and of the expected shape.
    pub fn get<V: DeserializeOwned>(&self, key: &str) -> Option<V> {
        self.0.get(key).cloned().and_then(|v| serde_json::from_value(v).ok())
    }

    /// Raw value under `key`.
    pub fn get_raw(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// True when no keys are set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Unwrap into the underlying map.
    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for CallbackContext {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Result of one handler attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(bound(serialize = "T: Serialize"))]
#[serde(bound(deserialize = "T: DeserializeOwned"))]
pub struct ProgressEvent<T> {
    /// Whether the handler is done, failed, or needs more time.
    pub operation_status: OperationStatus,
    /// Taxonomy name; expected when status is `Failed` or `InProgress`.
    pub handler_error_code: String,
    /// Contextual message shown to callers.
    pub message: String,
    /// State to hand back on the next attempt.
    pub callback_context: CallbackContext,
    /// Delay before the next attempt. `<= 0` means no callback.
    pub callback_delay_seconds: i64,
    /// Output resource for READ/LIST, or final confirmation for CREATE/UPDATE/DELETE.
    pub resource_model: Option<T>,
}

impl<T> Default for ProgressEvent<T> {
    fn default() -> Self {
        Self {
            operation_status: OperationStatus::Unknown,
            handler_error_code: String::new(),
            message: String::new(),
            callback_context: CallbackContext::new(),
            callback_delay_seconds: 0,
            resource_model: None,
        }
    }
}

impl<T> ProgressEvent<T> {
    /// Fresh event with status `Unknown` and an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Failure event built from a classified error.
    pub fn failed(err: &impl ClassifiedError) -> Self {
        Self {
            operation_status: OperationStatus::Failed,
            handler_error_code: err.error_code().name().to_string(),
            message: err.message(),
            ..Self::default()
        }
    }

    /// Event asking to be called again after `delay_seconds` with `context`.
    pub fn in_progress(context: CallbackContext, delay_seconds: i64) -> Self {
        Self {
            operation_status: OperationStatus::InProgress,
            callback_context: context,
            callback_delay_seconds: delay_seconds,
            ..Self::default()
        }
    }

    /// Terminal success carrying the output model.
    pub fn success(model: T) -> Self {
        Self {
            operation_status: OperationStatus::Success,
            resource_model: Some(model),
            ..Self::default()
        }
    }

    /// Set the message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// True when the orchestrator should schedule another attempt.
    pub const fn needs_reinvocation(&self) -> bool {
        matches!(self.operation_status, OperationStatus::InProgress) && self.callback_delay_seconds > 0
    }

    /// Check that a failed event carries an error code.
    pub fn check(&self) -> Result<(), SchedulerError> {
        if self.operation_status == OperationStatus::Failed && self.handler_error_code.is_empty() {
            return Err(SchedulerError::InvalidProgress(
                "failed event must carry an error code".into(),
            ));
        }
        Ok(())
    }

    /// Callback descriptor: the context to persist and the requested delay.
    pub fn marshal_callback(&self) -> (CallbackContext, i64) {
        (self.callback_context.clone(), self.callback_delay_seconds)
    }
}

impl<T: Clone> ProgressEvent<T> {
    /// Convert into the transport response.
    ///
    /// The error code is attached only when `handler_error_code` is empty.
    /// This matches the established wire behaviour; see DESIGN.md before
    /// changing it.
    pub fn marshal_response(&self) -> HandlerResponse<T> {
        let error_code = self.handler_error_code.is_empty().then(|| HandlerErrorCode {
            code: self.handler_error_code.clone(),
            message: self.message.clone(),
        });

        HandlerResponse {
            operation_status: self.operation_status,
            message: self.message.clone(),
            error_code,
            resource_model: self.resource_model.clone(),
        }
    }
}

/// Error code attached to a transport response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandlerErrorCode {
    /// Taxonomy name.
    pub code: String,
    /// Message copied from the event.
    pub message: String,
}

/// Response handed back to the invoking service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(bound(serialize = "T: Serialize"))]
#[serde(bound(deserialize = "T: DeserializeOwned"))]
pub struct HandlerResponse<T> {
    /// Status copied from the event.
    pub operation_status: OperationStatus,
    /// Message copied from the event.
    pub message: String,
    /// Optional error code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<HandlerErrorCode>,
    /// Output model when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_model: Option<T>,
}
