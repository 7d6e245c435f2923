//! Invocation context supplied by a Lambda-style runtime.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::InvocationContext;

/// Identity and deadline of the running invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LambdaInvocation {
    /// Runtime request id.
    pub request_id: String,
    /// ARN of the running function.
    pub invoked_function_arn: String,
    /// When the host will terminate this invocation.
    pub deadline: DateTime<Utc>,
}

impl LambdaInvocation {
    /// Build from explicit parts.
    pub fn new(
        request_id: impl Into<String>,
        invoked_function_arn: impl Into<String>,
        deadline: DateTime<Utc>,
    ) -> Self {
        Self {
            request_id: request_id.into(),
            invoked_function_arn: invoked_function_arn.into(),
            deadline,
        }
    }

    /// Build from the runtime's deadline header, expressed in epoch milliseconds.
    /// Returns `None` when the value is out of range.
    pub fn from_deadline_ms(
        request_id: impl Into<String>,
        invoked_function_arn: impl Into<String>,
        deadline_ms: i64,
    ) -> Option<Self> {
        let deadline = DateTime::<Utc>::from_timestamp_millis(deadline_ms)?;
        Some(Self::new(request_id, invoked_function_arn, deadline))
    }
}

impl InvocationContext for LambdaInvocation {
    fn deadline(&self) -> Option<DateTime<Utc>> {
        Some(self.deadline)
    }

    fn invoked_function_arn(&self) -> Option<&str> {
        Some(self.invoked_function_arn.as_str())
    }
}
