//! Data models
//!
//! Shared between the analytics engine and its consumers (via JSON).

pub mod analytics;
pub mod order;
pub mod settings;

// Re-exports
pub use analytics::*;
pub use order::*;
pub use settings::*;
