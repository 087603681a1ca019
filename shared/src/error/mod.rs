//! Unified error system
//!
//! - [`ErrorCode`]: Standardized numeric error codes
//! - [`AppError`]: Rich error type with codes, messages, and details
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode};
//!
//! let err = AppError::new(ErrorCode::OrderPayloadInvalid);
//! assert_eq!(err.code.code(), 4101);
//!
//! let err = AppError::storage_corrupted("settings file damaged")
//!     .with_detail("path", "console-settings.json");
//! assert!(err.details.is_some());
//! ```

mod codes;
mod types;

pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{AppError, AppResult};
