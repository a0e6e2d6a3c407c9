//! Error types for the Shelfmark terminal application

use thiserror::Error;

/// Main application error type
///
/// Every variant except [`AppError::Database`] is a recoverable business
/// condition: the menu loop reports it and re-prompts. A store failure is
/// surfaced to the caller and ends the session.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Item is not available for borrowing: {0}")]
    Unavailable(String),

    #[error("Item is currently available, borrow it instead of reserving: {0}")]
    AlreadyAvailable(String),

    #[error("Borrowing limit reached ({held}/{limit})")]
    LimitExceeded { held: i64, limit: i64 },

    #[error("No open borrow of item {item_id} for this account")]
    NotBorrowedByAccount { item_id: i64 },

    #[error("Invalid request state: {0}")]
    InvalidState(String),

    #[error("Account already exists: {0}")]
    DuplicateAccount(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Authorization failed: {0}")]
    Authorization(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl AppError {
    /// Whether the menu loop may report this error and continue.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, AppError::Database(_))
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
