//! Unified error codes for the Mensa reservation server
//!
//! This module defines all error codes used across the server and clients.
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 4xxx: Reservation errors
//! - 7xxx: Catalog errors (shift / canteen / holiday)
//! - 8xxx: Diner errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
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
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Specific role required
    RoleRequired = 2002,
    /// Admin role required
    AdminRequired = 2003,
    /// Request budget exceeded (rate limit)
    RateLimited = 2101,

    // ==================== 4xxx: Reservation ====================
    /// Reservation not found
    ReservationNotFound = 4001,
    /// A non-cancelled reservation already exists for this diner and date
    DuplicateReservation = 4002,
    /// Diner has no active reservation eligible for check-in
    NoActiveReservation = 4003,
    /// Reservation has been cancelled
    ReservationCancelled = 4004,
    /// Reservation is already in a terminal state
    ReservationAlreadyFinal = 4005,
    /// Ordering/cancellation cutoff has passed
    OrderCutoffPassed = 4101,
    /// Check-in attempted outside the shift's service window
    CheckinWindowClosed = 4102,
    /// Date is blocked by a holiday
    HolidayNotOrderable = 4103,
    /// Weekday is not in the orderable set
    WeekdayNotOrderable = 4104,
    /// Canteen daily capacity reached
    CanteenCapacityFull = 4105,
    /// Shift is not active
    ShiftInactive = 4106,
    /// Check-in canteen differs from the reservation's canteen
    CanteenMismatch = 4107,

    // ==================== 7xxx: Catalog ====================
    /// Shift not found
    ShiftNotFound = 7001,
    /// Canteen not found
    CanteenNotFound = 7101,
    /// Holiday not found
    HolidayNotFound = 7201,

    // ==================== 8xxx: Diner ====================
    /// Diner not found
    DinerNotFound = 8001,
    /// Diner account is inactive
    DinerInactive = 8002,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Network error
    NetworkError = 9003,
    /// Operation timeout
    TimeoutError = 9004,
    /// Configuration error
    ConfigError = 9005,
    /// Storage full (disk space insufficient)
    StorageFull = 9401,
    /// Storage corrupted (data file damaged)
    StorageCorrupted = 9403,
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
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::InvalidCredentials => "Invalid credentials",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::RoleRequired => "Specific role is required",
            ErrorCode::AdminRequired => "Administrator role is required",
            ErrorCode::RateLimited => "Too many requests",

            // Reservation
            ErrorCode::ReservationNotFound => "Reservation not found",
            ErrorCode::DuplicateReservation => {
                "A reservation already exists for this diner and date"
            }
            ErrorCode::NoActiveReservation => "No active reservation for check-in",
            ErrorCode::ReservationCancelled => "Reservation has been cancelled",
            ErrorCode::ReservationAlreadyFinal => "Reservation is already final",
            ErrorCode::OrderCutoffPassed => "Ordering cutoff has passed",
            ErrorCode::CheckinWindowClosed => "Check-in window is closed",
            ErrorCode::HolidayNotOrderable => "Date is blocked by a holiday",
            ErrorCode::WeekdayNotOrderable => "Weekday is not orderable",
            ErrorCode::CanteenCapacityFull => "Canteen capacity is full",
            ErrorCode::ShiftInactive => "Shift is not active",
            ErrorCode::CanteenMismatch => "Reservation belongs to a different canteen",

            // Catalog
            ErrorCode::ShiftNotFound => "Shift not found",
            ErrorCode::CanteenNotFound => "Canteen not found",
            ErrorCode::HolidayNotFound => "Holiday not found",

            // Diner
            ErrorCode::DinerNotFound => "Diner not found",
            ErrorCode::DinerInactive => "Diner account is inactive",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::NetworkError => "Network error",
            ErrorCode::TimeoutError => "Operation timed out",
            ErrorCode::ConfigError => "Configuration error",
            ErrorCode::StorageFull => "Storage full (disk space insufficient)",
            ErrorCode::StorageCorrupted => "Storage corrupted (data file damaged)",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2002 => Ok(ErrorCode::RoleRequired),
            2003 => Ok(ErrorCode::AdminRequired),
            2101 => Ok(ErrorCode::RateLimited),

            // Reservation
            4001 => Ok(ErrorCode::ReservationNotFound),
            4002 => Ok(ErrorCode::DuplicateReservation),
            4003 => Ok(ErrorCode::NoActiveReservation),
            4004 => Ok(ErrorCode::ReservationCancelled),
            4005 => Ok(ErrorCode::ReservationAlreadyFinal),
            4101 => Ok(ErrorCode::OrderCutoffPassed),
            4102 => Ok(ErrorCode::CheckinWindowClosed),
            4103 => Ok(ErrorCode::HolidayNotOrderable),
            4104 => Ok(ErrorCode::WeekdayNotOrderable),
            4105 => Ok(ErrorCode::CanteenCapacityFull),
            4106 => Ok(ErrorCode::ShiftInactive),
            4107 => Ok(ErrorCode::CanteenMismatch),

            // Catalog
            7001 => Ok(ErrorCode::ShiftNotFound),
            7101 => Ok(ErrorCode::CanteenNotFound),
            7201 => Ok(ErrorCode::HolidayNotFound),

            // Diner
            8001 => Ok(ErrorCode::DinerNotFound),
            8002 => Ok(ErrorCode::DinerInactive),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9003 => Ok(ErrorCode::NetworkError),
            9004 => Ok(ErrorCode::TimeoutError),
            9005 => Ok(ErrorCode::ConfigError),
            9401 => Ok(ErrorCode::StorageFull),
            9403 => Ok(ErrorCode::StorageCorrupted),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        // General
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::ValidationFailed.code(), 2);
        assert_eq!(ErrorCode::NotFound.code(), 3);
        assert_eq!(ErrorCode::AlreadyExists.code(), 4);

        // Auth
        assert_eq!(ErrorCode::NotAuthenticated.code(), 1001);
        assert_eq!(ErrorCode::TokenExpired.code(), 1003);

        // Permission
        assert_eq!(ErrorCode::PermissionDenied.code(), 2001);
        assert_eq!(ErrorCode::RateLimited.code(), 2101);

        // Reservation
        assert_eq!(ErrorCode::ReservationNotFound.code(), 4001);
        assert_eq!(ErrorCode::DuplicateReservation.code(), 4002);
        assert_eq!(ErrorCode::NoActiveReservation.code(), 4003);
        assert_eq!(ErrorCode::ReservationCancelled.code(), 4004);
        assert_eq!(ErrorCode::ReservationAlreadyFinal.code(), 4005);
        assert_eq!(ErrorCode::OrderCutoffPassed.code(), 4101);
        assert_eq!(ErrorCode::CheckinWindowClosed.code(), 4102);
        assert_eq!(ErrorCode::HolidayNotOrderable.code(), 4103);
        assert_eq!(ErrorCode::WeekdayNotOrderable.code(), 4104);
        assert_eq!(ErrorCode::CanteenCapacityFull.code(), 4105);
        assert_eq!(ErrorCode::ShiftInactive.code(), 4106);
        assert_eq!(ErrorCode::CanteenMismatch.code(), 4107);

        // Catalog
        assert_eq!(ErrorCode::ShiftNotFound.code(), 7001);
        assert_eq!(ErrorCode::CanteenNotFound.code(), 7101);
        assert_eq!(ErrorCode::HolidayNotFound.code(), 7201);

        // Diner
        assert_eq!(ErrorCode::DinerNotFound.code(), 8001);
        assert_eq!(ErrorCode::DinerInactive.code(), 8002);

        // System
        assert_eq!(ErrorCode::InternalError.code(), 9001);
        assert_eq!(ErrorCode::DatabaseError.code(), 9002);
        assert_eq!(ErrorCode::ConfigError.code(), 9005);
    }

    #[test]
    fn test_is_success() {
        assert!(ErrorCode::Success.is_success());
        assert!(!ErrorCode::Unknown.is_success());
        assert!(!ErrorCode::ReservationNotFound.is_success());
    }

    #[test]
    fn test_try_from_valid() {
        assert_eq!(ErrorCode::try_from(0), Ok(ErrorCode::Success));
        assert_eq!(ErrorCode::try_from(1001), Ok(ErrorCode::NotAuthenticated));
        assert_eq!(ErrorCode::try_from(4001), Ok(ErrorCode::ReservationNotFound));
        assert_eq!(ErrorCode::try_from(4101), Ok(ErrorCode::OrderCutoffPassed));
        assert_eq!(ErrorCode::try_from(9001), Ok(ErrorCode::InternalError));
    }

    #[test]
    fn test_try_from_invalid() {
        assert_eq!(ErrorCode::try_from(999), Err(InvalidErrorCode(999)));
        assert_eq!(ErrorCode::try_from(4200), Err(InvalidErrorCode(4200)));
        assert_eq!(ErrorCode::try_from(10000), Err(InvalidErrorCode(10000)));
    }

    #[test]
    fn test_serialize_as_u16() {
        let json = serde_json::to_string(&ErrorCode::ReservationNotFound).unwrap();
        assert_eq!(json, "4001");

        let json = serde_json::to_string(&ErrorCode::Success).unwrap();
        assert_eq!(json, "0");
    }

    #[test]
    fn test_deserialize_from_u16() {
        let code: ErrorCode = serde_json::from_str("4102").unwrap();
        assert_eq!(code, ErrorCode::CheckinWindowClosed);

        let result: Result<ErrorCode, _> = serde_json::from_str("999");
        assert!(result.is_err());
    }

    #[test]
    fn test_roundtrip() {
        let codes = [
            ErrorCode::Success,
            ErrorCode::NotAuthenticated,
            ErrorCode::DuplicateReservation,
            ErrorCode::OrderCutoffPassed,
            ErrorCode::InternalError,
        ];

        for code in codes {
            let json = serde_json::to_string(&code).unwrap();
            let parsed: ErrorCode = serde_json::from_str(&json).unwrap();
            assert_eq!(code, parsed);
        }
    }

    #[test]
    fn test_message() {
        assert_eq!(
            ErrorCode::ReservationNotFound.message(),
            "Reservation not found"
        );
        assert_eq!(
            ErrorCode::OrderCutoffPassed.message(),
            "Ordering cutoff has passed"
        );
        assert_eq!(ErrorCode::InternalError.message(), "Internal server error");
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", ErrorCode::Success), "0");
        assert_eq!(format!("{}", ErrorCode::ReservationNotFound), "4001");
    }
}
