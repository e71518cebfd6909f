//! Shared types for the marketplace backend
//!
//! Common types used across crates: the unified error system, the
//! order/history/notification/user domain models, and small utilities
//! (timestamps, snowflake ids).

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use axum::{Json, body};
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
