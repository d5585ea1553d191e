use thiserror::Error;
use tokio::task::JoinError;

// Core internal errors
#[derive(Error, Debug)]
pub enum AppError {
    #[error("IoError: {0}")]
    Io(#[from] std::io::Error),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Invalid query: {0}")]
    InvalidQuery(String),
    #[error("Precondition failed: {0}")]
    Precondition(String),
    #[error("Task join error: {0}")]
    Join(#[from] JoinError),
    #[error("Internal service error: {0}")]
    InternalError(String),
}
