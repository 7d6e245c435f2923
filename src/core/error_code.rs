//! Handler error taxonomy.
//!
//! Every failure a resource handler reports maps onto one [`ErrorCode`]. Each
//! code carries a fixed [`ErrorClass`] that the operation layer branches on to
//! decide whether the *operation* is worth retrying.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Whether a failure may be retried by the operation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorClass {
    /// Retrying will not help.
    Terminal,
    /// The same request may succeed later.
    Retriable,
}

/// Failure cause reported by a resource handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(i32)]
pub enum ErrorCode {
    /// No recognised cause.
    #[default]
    Unknown = 0,
    /// Update attempted on a create-only property. Update handler only.
    NotUpdatable = 1,
    /// Invalid input from the customer.
    InvalidRequest = 2,
    /// Insufficient permissions to perform this action.
    AccessDenied = 3,
    /// Provided credentials were invalid.
    InvalidCredentials = 4,
    /// Resource existed before the create handler ran.
    AlreadyExists = 5,
    /// Resource does not exist or is in an irrecoverable state.
    NotFound = 6,
    /// Resource is busy with another operation.
    ResourceConflict = 7,
    /// Downstream service throttled the request.
    Throttling = 8,
    /// A non-transient service-side limit was reached.
    ServiceLimitExceeded = 9,
    /// Resource failed its ready-state checks.
    NotStabilized = 10,
    /// Downstream error with no better mapping.
    GeneralServiceException = 11,
    /// Downstream service returned an internal (5xx) error.
    ServiceInternalError = 12,
    /// Request could not complete because of networking issues.
    NetworkFailure = 13,
    /// Unexpected error inside the handler itself.
    InternalFailure = 14,
}

impl ErrorCode {
    /// All codes in numeric order.
    pub const ALL: [Self; 15] = [
        Self::Unknown,
        Self::NotUpdatable,
        Self::InvalidRequest,
        Self::AccessDenied,
        Self::InvalidCredentials,
        Self::AlreadyExists,
        Self::NotFound,
        Self::ResourceConflict,
        Self::Throttling,
        Self::ServiceLimitExceeded,
        Self::NotStabilized,
        Self::GeneralServiceException,
        Self::ServiceInternalError,
        Self::NetworkFailure,
        Self::InternalFailure,
    ];

    /// Canonical name used on the wire.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Unknown => "Unknown",
            Self::NotUpdatable => "NotUpdatable",
            Self::InvalidRequest => "InvalidRequest",
            Self::AccessDenied => "AccessDenied",
            Self::InvalidCredentials => "InvalidCredentials",
            Self::AlreadyExists => "AlreadyExists",
            Self::NotFound => "NotFound",
            Self::ResourceConflict => "ResourceConflict",
            Self::Throttling => "Throttling",
            Self::ServiceLimitExceeded => "ServiceLimitExceeded",
            Self::NotStabilized => "NotStabilized",
            Self::GeneralServiceException => "GeneralServiceException",
            Self::ServiceInternalError => "ServiceInternalError",
            Self::NetworkFailure => "NetworkFailure",
            Self::InternalFailure => "InternalFailure",
        }
    }

    /// Map a raw numeric value to a code. Anything outside the table is `Unknown`.
    pub fn from_i32(raw: i32) -> Self {
        usize::try_from(raw)
            .ok()
            .and_then(|idx| Self::ALL.get(idx).copied())
            .unwrap_or(Self::Unknown)
    }

    /// Case-insensitive lookup by canonical name. Never fails: unmatched
    /// input yields `Unknown`.
    pub fn parse(name: &str) -> Self {
        Self::ALL
            .iter()
            .copied()
            .find(|code| code.name().eq_ignore_ascii_case(name))
            .unwrap_or(Self::Unknown)
    }

    /// Fixed retry classification. `Unknown` is terminal by convention.
    pub const fn class(self) -> ErrorClass {
        match self {
            Self::ResourceConflict
            | Self::Throttling
            | Self::NotStabilized
            | Self::ServiceInternalError
            | Self::NetworkFailure => ErrorClass::Retriable,
            Self::Unknown
            | Self::NotUpdatable
            | Self::InvalidRequest
            | Self::AccessDenied
            | Self::InvalidCredentials
            | Self::AlreadyExists
            | Self::NotFound
            | Self::ServiceLimitExceeded
            | Self::GeneralServiceException
            | Self::InternalFailure => ErrorClass::Terminal,
        }
    }

    /// True when the operation layer may retry.
    pub const fn is_retriable(self) -> bool {
        matches!(self.class(), ErrorClass::Retriable)
    }

    /// True when the operation layer must not retry.
    pub const fn is_terminal(self) -> bool {
        !self.is_retriable()
    }
}

/// Canonical name for a raw numeric code; `"Unknown"` when out of range.
pub fn name_of(raw: i32) -> &'static str {
    ErrorCode::from_i32(raw).name()
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ErrorCode {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl Serialize for ErrorCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for ErrorCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}
