use crate::models::LinkRecord;
use crate::storage::{Storage, StorageError, StorageResult};
use anyhow::Result;
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time;

/// Storage wrapper that bounds every call so a stalled backend surfaces as a
/// storage failure instead of hanging the request.
pub struct TimeoutStorage {
    /// Underlying storage implementation
    inner: Arc<dyn Storage>,
    timeout: Duration,
}

impl TimeoutStorage {
    pub fn new(inner: Arc<dyn Storage>, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    async fn bounded<T>(
        &self,
        operation: &'static str,
        fut: impl Future<Output = StorageResult<T>>,
    ) -> StorageResult<T> {
        match time::timeout(self.timeout, fut).await {
            Ok(result) => result,
            Err(_) => {
                tracing::error!(operation, timeout = ?self.timeout, "storage call timed out");
                Err(StorageError::Timeout(self.timeout))
            }
        }
    }
}

#[async_trait]
impl Storage for TimeoutStorage {
    async fn init(&self) -> Result<()> {
        self.inner.init().await
    }

    async fn put(&self, short_code: &str, original_url: &str) -> StorageResult<LinkRecord> {
        self.bounded("put", self.inner.put(short_code, original_url))
            .await
    }

    async fn get(&self, short_code: &str) -> StorageResult<LinkRecord> {
        self.bounded("get", self.inner.get(short_code)).await
    }

    async fn list_all(&self) -> StorageResult<Vec<LinkRecord>> {
        self.bounded("list_all", self.inner.list_all()).await
    }

    async fn record_click(&self, short_code: &str) -> StorageResult<LinkRecord> {
        self.bounded("record_click", self.inner.record_click(short_code))
            .await
    }

    async fn remove(&self, short_code: &str) -> StorageResult<()> {
        self.bounded("remove", self.inner.remove(short_code)).await
    }
}
