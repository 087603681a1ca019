//! Shared types for the restaurant console analytics
//!
//! Order records (raw and canonical), dashboard report types, console
//! settings, and the unified error types.

pub mod error;
pub mod models;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use error::{AppError, AppResult, ErrorCode};
