// Application error taxonomy shared by the repositories and the HTTP layer.
use thiserror::Error;

pub mod response;
pub mod persistence;

pub use persistence::{PersistenceError, PersistenceResult};
pub use response::ApiError;

#[derive(Error, Debug)]
pub enum AppError {
    // Missing or malformed input the caller can correct
    #[error("{0}")]
    Validation(String),

    // No session, or the session lacks the required role/ownership
    #[error("{0}")]
    Auth(String),

    #[error("{0}")]
    NotFound(String),

    // Uniqueness violation on register
    #[error("{0}")]
    Duplicate(String),

    #[error("Storage error: {0}")]
    Persistence(#[from] PersistenceError),
}

// Custom result type
pub type AppResult<T> = Result<T, AppError>;
pub type ApiResult<T> = Result<T, ApiError>;
