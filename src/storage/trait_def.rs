use crate::models::LinkRecord;
use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("short code already exists")]
    Conflict,
    #[error("short code not found")]
    NotFound,
    #[error("storage call timed out after {0:?}")]
    Timeout(Duration),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StorageError {
    /// True for faults of the persistence layer itself, as opposed to
    /// outcomes about the requested key.
    pub fn is_failure(&self) -> bool {
        !matches!(self, StorageError::Conflict | StorageError::NotFound)
    }
}

pub type StorageResult<T> = Result<T, StorageError>;

/// The link directory. Implementations own all persisted records and hand
/// out snapshots only.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Initialize the storage (create tables, etc.)
    async fn init(&self) -> Result<()>;

    /// Insert a new link iff `short_code` is free. The check and the insert
    /// happen atomically.
    async fn put(&self, short_code: &str, original_url: &str) -> StorageResult<LinkRecord>;

    /// Get a link by short code
    async fn get(&self, short_code: &str) -> StorageResult<LinkRecord>;

    /// All links, newest first
    async fn list_all(&self) -> StorageResult<Vec<LinkRecord>>;

    /// Increment clicks and stamp `last_clicked_at`/`updated_at` in one
    /// indivisible step, returning the updated record.
    async fn record_click(&self, short_code: &str) -> StorageResult<LinkRecord>;

    /// Delete a link, freeing its short code
    async fn remove(&self, short_code: &str) -> StorageResult<()>;
}
