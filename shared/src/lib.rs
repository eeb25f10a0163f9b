//! Shared types for the Mensa reservation server
//!
//! Common types used across crates: domain models, the unified
//! error system, message bus payloads and utility helpers.

pub mod error;
pub mod message;
pub mod models;
pub mod util;

// Re-exports
pub use http;
pub use serde::{Deserialize, Serialize};

// Error system re-exports (for convenient access)
pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

// Message bus re-exports
pub use message::{BusMessage, EventType};
