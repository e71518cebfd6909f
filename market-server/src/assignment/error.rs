//! Assignment engine errors

use crate::orders::storage::StorageError;
use shared::error::{AppError, ErrorCode};
use shared::models::UserRole;
use thiserror::Error;

/// Engine errors
#[derive(Debug, Error)]
pub enum AssignmentError {
    #[error("Order not found: {0}")]
    OrderNotFound(i64),

    #[error("User not found: {0}")]
    UserNotFound(i64),

    #[error("User {user_id} has role {actual}, expected {expected}")]
    RoleMismatch {
        user_id: i64,
        expected: UserRole,
        actual: UserRole,
    },

    #[error("User is not verified: {0}")]
    NotVerified(i64),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Order {0} is not assigned")]
    NotAssigned(i64),

    #[error("Order {0} has already been accepted")]
    AlreadyAccepted(i64),

    #[error("Order {0} is in a terminal state")]
    Terminal(i64),

    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    #[error("No eligible {0} available")]
    NoEligibleActor(UserRole),

    #[error("Order {0} was modified concurrently")]
    Conflict(i64),

    #[error("Directory lookup failed: {0}")]
    Directory(String),

    #[error("Storage error: {0}")]
    Storage(StorageError),
}

impl AssignmentError {
    /// Wrap a storage failure, folding the concurrency cases into their
    /// typed variants
    pub fn from_storage(err: StorageError) -> Self {
        match err {
            StorageError::OrderNotFound(id) => Self::OrderNotFound(id),
            StorageError::VersionConflict { order_id, .. } => Self::Conflict(order_id),
            other => Self::Storage(other),
        }
    }
}

impl From<StorageError> for AssignmentError {
    fn from(err: StorageError) -> Self {
        Self::from_storage(err)
    }
}

impl From<AssignmentError> for AppError {
    fn from(err: AssignmentError) -> Self {
        let code = match &err {
            AssignmentError::OrderNotFound(_) => ErrorCode::OrderNotFound,
            AssignmentError::UserNotFound(_) => ErrorCode::UserNotFound,
            AssignmentError::RoleMismatch { .. } => ErrorCode::RoleMismatch,
            AssignmentError::NotVerified(_) => ErrorCode::UserNotVerified,
            AssignmentError::PermissionDenied(_) => ErrorCode::PermissionDenied,
            AssignmentError::NotAssigned(_) => ErrorCode::OrderNotAssigned,
            AssignmentError::AlreadyAccepted(_) => ErrorCode::OrderAlreadyAccepted,
            AssignmentError::Terminal(_) => ErrorCode::OrderTerminal,
            AssignmentError::InvalidTransition(_) => ErrorCode::InvalidTransition,
            AssignmentError::NoEligibleActor(_) => ErrorCode::NoEligibleActor,
            AssignmentError::Conflict(_) => ErrorCode::AssignmentConflict,
            AssignmentError::Directory(_) => ErrorCode::InternalError,
            AssignmentError::Storage(e) => {
                tracing::error!(error = %e, "Storage error in assignment engine");
                ErrorCode::DatabaseError
            }
        };
        AppError::with_message(code, err.to_string())
    }
}

pub type AssignmentResult<T> = Result<T, AssignmentError>;
