//! Repository Module
//!
//! CRUD and lookup operations over the SQLite pool. Repositories are free
//! async functions taking `&SqlitePool`; state transitions use conditional
//! UPDATEs and report the zero-rows-affected outcome to the caller.

// Identity
pub mod diner;

// Catalogs
pub mod canteen;
pub mod holiday;
pub mod shift;

// Reservations
pub mod reservation;

// Configuration
pub mod settings;

use shared::error::AppError;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &err
            && db.is_unique_violation()
        {
            return RepoError::Duplicate(db.message().to_string());
        }
        RepoError::Database(err.to_string())
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => {
                AppError::with_message(shared::error::ErrorCode::NotFound, msg)
            }
            RepoError::Duplicate(msg) => {
                AppError::with_message(shared::error::ErrorCode::AlreadyExists, msg)
            }
            RepoError::Validation(msg) => AppError::validation(msg),
            RepoError::Database(msg) => AppError::database(msg),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;
