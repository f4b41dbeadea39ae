use crate::db::StorageError;
use crate::screens::RegistryError;
use shared::error::{AppError, ErrorCode};
use thiserror::Error;

/// Router errors
///
/// Unknown references are not errors here: operations report them as
/// `None`/`false` so callers can treat a missing order as "nothing to do".
#[derive(Debug, Error)]
pub enum RouterError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Screen registry error: {0}")]
    Registry(#[from] RegistryError),

    /// Rejected inbound snapshot
    #[error("Malformed order snapshot: {0}")]
    Malformed(String),
}

impl From<redb::CommitError> for RouterError {
    fn from(err: redb::CommitError) -> Self {
        Self::Storage(err.into())
    }
}

impl From<RouterError> for AppError {
    fn from(err: RouterError) -> Self {
        match err {
            RouterError::Storage(e) => e.into(),
            RouterError::Registry(e) => e.into(),
            RouterError::Malformed(msg) => {
                AppError::with_message(ErrorCode::ValidationFailed, msg)
            }
        }
    }
}

pub type RouterResult<T> = Result<T, RouterError>;
