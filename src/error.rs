use crate::storage::StorageError;
use thiserror::Error;

/// Outcomes surfaced by the directory service and redirect resolver.
#[derive(Debug, Error)]
pub enum LinkError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("Short code already exists")]
    CodeTaken,
    #[error("Link not found")]
    NotFound,
    #[error("failed to generate a unique short code after {attempts} attempts")]
    GenerationExhausted { attempts: u32 },
    #[error("storage failure: {0}")]
    StorageFailure(#[source] StorageError),
}

impl From<StorageError> for LinkError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound => LinkError::NotFound,
            StorageError::Conflict => LinkError::CodeTaken,
            other => LinkError::StorageFailure(other),
        }
    }
}

pub type LinkResult<T> = Result<T, LinkError>;
