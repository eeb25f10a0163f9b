//! Error types and API response structures

use super::codes::ErrorCode;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Application error with structured error code and details
///
/// The primary error type of the server:
/// - Standardized error codes via [`ErrorCode`]
/// - Human-readable messages
/// - Optional structured details (e.g. the computed cutoff instant)
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AppError {
    /// The error code identifying the type of error
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details (boundary instants, context, etc.)
    pub details: Option<HashMap<String, Value>>,
}

impl AppError {
    /// Create a new error with the default message for the error code
    pub fn new(code: ErrorCode) -> Self {
        Self {
            message: code.message().to_string(),
            code,
            details: None,
        }
    }

    /// Create a new error with a custom message
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Add a detail entry to this error
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Get the HTTP status code for this error
    pub fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }

    // ==================== General constructors ====================

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ValidationFailed, msg)
    }

    /// Create a not found error
    pub fn not_found(resource: impl Into<String>) -> Self {
        let r = resource.into();
        Self::with_message(ErrorCode::NotFound, format!("{} not found", r))
            .with_detail("resource", r)
    }

    /// Create an invalid request error
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InvalidRequest, msg)
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InternalError, msg)
    }

    /// Create a database error
    pub fn database(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::DatabaseError, msg)
    }

    /// Create an unauthorized error
    pub fn unauthorized() -> Self {
        Self::new(ErrorCode::NotAuthenticated)
    }

    /// Create an invalid token error
    pub fn invalid_token(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::TokenInvalid, msg)
    }

    /// Create a token expired error
    pub fn token_expired() -> Self {
        Self::new(ErrorCode::TokenExpired)
    }

    /// Create a permission denied error
    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::PermissionDenied, msg)
    }

    // ==================== Reservation constructors ====================

    /// A non-cancelled reservation already exists for (diner, date)
    pub fn duplicate_reservation(order_date: impl Into<String>) -> Self {
        let d = order_date.into();
        Self::with_message(
            ErrorCode::DuplicateReservation,
            format!("A reservation already exists for {}", d),
        )
        .with_detail("order_date", d)
    }

    /// Ordering/cancellation cutoff has passed; carries the boundary instant
    pub fn cutoff_passed(cutoff_at: i64) -> Self {
        Self::new(ErrorCode::OrderCutoffPassed).with_detail("cutoff_at", cutoff_at)
    }

    /// Check-in attempted outside the service window; carries the window end
    pub fn window_closed(order_date: impl Into<String>, window_end: Option<i64>) -> Self {
        let d = order_date.into();
        let err = Self::with_message(
            ErrorCode::CheckinWindowClosed,
            format!("Check-in window for the reservation on {} is closed", d),
        )
        .with_detail("order_date", d);
        match window_end {
            Some(end) => err.with_detail("window_end", end),
            None => err,
        }
    }

    /// Date blocked by a holiday
    pub fn holiday(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::HolidayNotOrderable, msg)
    }

    /// Canteen daily capacity reached
    pub fn capacity_full(canteen: impl Into<String>, capacity: i64) -> Self {
        let c = canteen.into();
        Self::with_message(
            ErrorCode::CanteenCapacityFull,
            format!("Canteen {} has reached its daily capacity", c),
        )
        .with_detail("canteen", c)
        .with_detail("capacity", capacity)
    }

    /// Check-in canteen differs from the reservation's canteen
    pub fn canteen_mismatch(expected: impl Into<String>) -> Self {
        let name = expected.into();
        Self::with_message(
            ErrorCode::CanteenMismatch,
            format!("Reservation must be collected at {}", name),
        )
        .with_detail("canteen", name)
    }

    /// Reservation is already in a terminal state
    pub fn already_final(status: impl Into<String>) -> Self {
        let s = status.into();
        Self::with_message(
            ErrorCode::ReservationAlreadyFinal,
            format!("Reservation is already {}", s),
        )
        .with_detail("status", s)
    }

    /// Request budget exceeded; carries limit and seconds until reset
    pub fn rate_limited(limit: u32, reset_secs: u64) -> Self {
        Self::with_message(
            ErrorCode::RateLimited,
            format!("Too many requests, try again in {}s", reset_secs),
        )
        .with_detail("limit", limit)
        .with_detail("reset_secs", reset_secs)
    }
}

/// Unified API response structure
///
/// Consistent response format for all API endpoints:
/// - `code`: Error code (0 for success)
/// - `message`: Human-readable message
/// - `data`: Response payload (on success)
/// - `details`: Additional error details (on failure)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Error code (0 for success, non-zero for errors)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<u16>,
    /// Human-readable message
    pub message: String,
    /// Response data (present on success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Additional error details (present on failure)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, Value>>,
}

impl<T> ApiResponse<T> {
    /// Create a success response with data
    pub fn success(data: T) -> Self {
        Self {
            code: Some(0),
            message: "OK".to_string(),
            data: Some(data),
            details: None,
        }
    }
}

impl ApiResponse<()> {
    /// Create a success response without data
    pub fn ok() -> Self {
        Self {
            code: Some(0),
            message: "OK".to_string(),
            data: None,
            details: None,
        }
    }

    /// Create an error response from an AppError
    pub fn error(err: &AppError) -> Self {
        Self {
            code: Some(err.code.code()),
            message: err.message.clone(),
            data: None,
            details: err.details.clone(),
        }
    }
}

impl<T> From<AppError> for ApiResponse<T> {
    fn from(err: AppError) -> Self {
        Self {
            code: Some(err.code.code()),
            message: err.message,
            data: None,
            details: err.details,
        }
    }
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;

// ===== Axum Integration =====

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;

        let status = self.http_status();
        let body = ApiResponse::<()>::error(&self);

        // Log system errors
        if matches!(self.code.category(), super::category::ErrorCategory::System) {
            tracing::error!(
                code = %self.code,
                message = %self.message,
                "System error occurred"
            );
        }

        (status, Json(body)).into_response()
    }
}

impl<T: Serialize> axum::response::IntoResponse for ApiResponse<T> {
    fn into_response(self) -> axum::response::Response {
        use super::codes::ErrorCode;
        use axum::Json;

        let status = if self.code == Some(0) || self.code.is_none() {
            http::StatusCode::OK
        } else {
            ErrorCode::try_from(self.code.unwrap_or(1))
                .map(|c| c.http_status())
                .unwrap_or(http::StatusCode::INTERNAL_SERVER_ERROR)
        };

        (status, Json(self)).into_response()
    }
}
