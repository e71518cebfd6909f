//! Unified error codes for the marketplace backend
//!
//! Error codes are shared between the server and its API clients and are
//! organized by category:
//! - 0xxx: General errors
//! - 2xxx: Permission errors
//! - 4xxx: Order errors
//! - 8xxx: User errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient
/// serialization and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Specific role required
    RoleRequired = 2002,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Requested transition is not legal from the order's current state
    InvalidTransition = 4002,
    /// Order is not assigned to the acting user
    OrderNotAssigned = 4003,
    /// Order has already been accepted by its assigned actor
    OrderAlreadyAccepted = 4004,
    /// Concurrent modification detected, retry with fresh state
    AssignmentConflict = 4005,
    /// Order is in a terminal state (delivered/cancelled)
    OrderTerminal = 4006,
    /// Payment reference does not match any order
    PaymentRefUnknown = 4007,

    // ==================== 8xxx: User ====================
    /// User not found
    UserNotFound = 8001,
    /// User's role does not match the requested operation
    RoleMismatch = 8002,
    /// User is not verified
    UserNotVerified = 8003,
    /// No eligible actor available for assignment
    NoEligibleActor = 8004,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9005,
    /// Notification delivery failed
    NotificationFailed = 9101,
    /// System busy (IO error, retry later)
    SystemBusy = 9404,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::RoleRequired => "A specific role is required",

            // Order
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::InvalidTransition => "Transition not allowed from current order state",
            ErrorCode::OrderNotAssigned => "Order is not assigned to this user",
            ErrorCode::OrderAlreadyAccepted => "Order has already been accepted",
            ErrorCode::AssignmentConflict => "Order was modified concurrently",
            ErrorCode::OrderTerminal => "Order is in a terminal state",
            ErrorCode::PaymentRefUnknown => "Unknown payment reference",

            // User
            ErrorCode::UserNotFound => "User not found",
            ErrorCode::RoleMismatch => "User role does not match",
            ErrorCode::UserNotVerified => "User is not verified",
            ErrorCode::NoEligibleActor => "No eligible actor available",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::ConfigError => "Configuration error",
            ErrorCode::NotificationFailed => "Notification delivery failed",
            ErrorCode::SystemBusy => "System busy, retry later",
        }
    }

}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> u16 {
        code.code()
    }
}

/// Error returned when converting an unknown u16 into an [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid error code: {0}")]
pub struct InvalidErrorCode(pub u16);

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        let code = match value {
            0 => ErrorCode::Success,
            1 => ErrorCode::Unknown,
            2 => ErrorCode::ValidationFailed,
            3 => ErrorCode::NotFound,
            4 => ErrorCode::AlreadyExists,
            5 => ErrorCode::InvalidRequest,
            7 => ErrorCode::RequiredField,
            8 => ErrorCode::ValueOutOfRange,
            2001 => ErrorCode::PermissionDenied,
            2002 => ErrorCode::RoleRequired,
            4001 => ErrorCode::OrderNotFound,
            4002 => ErrorCode::InvalidTransition,
            4003 => ErrorCode::OrderNotAssigned,
            4004 => ErrorCode::OrderAlreadyAccepted,
            4005 => ErrorCode::AssignmentConflict,
            4006 => ErrorCode::OrderTerminal,
            4007 => ErrorCode::PaymentRefUnknown,
            8001 => ErrorCode::UserNotFound,
            8002 => ErrorCode::RoleMismatch,
            8003 => ErrorCode::UserNotVerified,
            8004 => ErrorCode::NoEligibleActor,
            9001 => ErrorCode::InternalError,
            9002 => ErrorCode::DatabaseError,
            9005 => ErrorCode::ConfigError,
            9101 => ErrorCode::NotificationFailed,
            9404 => ErrorCode::SystemBusy,
            other => return Err(InvalidErrorCode(other)),
        };
        Ok(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_roundtrip() {
        for code in [
            ErrorCode::Success,
            ErrorCode::ValidationFailed,
            ErrorCode::PermissionDenied,
            ErrorCode::OrderNotFound,
            ErrorCode::InvalidTransition,
            ErrorCode::AssignmentConflict,
            ErrorCode::UserNotFound,
            ErrorCode::InternalError,
            ErrorCode::NotificationFailed,
        ] {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(code));
        }
    }

    #[test]
    fn test_unknown_code_rejected() {
        assert_eq!(ErrorCode::try_from(1234), Err(InvalidErrorCode(1234)));
    }

    #[test]
    fn test_serde_as_u16() {
        let json = serde_json::to_string(&ErrorCode::OrderNotFound).unwrap();
        assert_eq!(json, "4001");
        let code: ErrorCode = serde_json::from_str("2001").unwrap();
        assert_eq!(code, ErrorCode::PermissionDenied);
    }
}
