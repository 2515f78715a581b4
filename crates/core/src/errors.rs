use thiserror::Error;

use crate::schedule::{ScheduleError, SlotError};

/// Failures raised by a storage adapter.
///
/// Adapters translate their driver-specific errors into this type before
/// anything reaches business logic, so unique-constraint violations are
/// matched structurally instead of by error text.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("duplicate key violates unique constraint{}", constraint.as_deref().map(|c| format!(" `{c}`")).unwrap_or_default())]
    DuplicateKey { constraint: Option<String> },

    #[error("database error: {0}")]
    Database(#[from] eyre::Report),
}

#[derive(Error, Debug)]
pub enum KonsulError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Slot(#[from] SlotError),

    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Authorization error: {0}")]
    Authorization(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Internal server error: {0}")]
    Internal(#[from] eyre::Report),
}

impl KonsulError {
    /// True for failures caused by the caller's input or credentials.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, KonsulError::Storage(_) | KonsulError::Internal(_))
    }
}

pub type KonsulResult<T> = Result<T, KonsulError>;
