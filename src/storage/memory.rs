use crate::models::LinkRecord;
use crate::storage::{Storage, StorageError, StorageResult};
use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicI64, Ordering};

/// Process-local directory backed by a sharded map. Per-code atomicity comes
/// from holding the shard lock for the whole check-and-mutate.
#[derive(Default)]
pub struct MemoryStorage {
    links: DashMap<String, LinkRecord>,
    next_id: AtomicI64,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn init(&self) -> Result<()> {
        Ok(())
    }

    async fn put(&self, short_code: &str, original_url: &str) -> StorageResult<LinkRecord> {
        match self.links.entry(short_code.to_string()) {
            Entry::Occupied(_) => Err(StorageError::Conflict),
            Entry::Vacant(slot) => {
                let now = Utc::now();
                let record = LinkRecord {
                    id: self.next_id.fetch_add(1, Ordering::Relaxed) + 1,
                    short_code: short_code.to_string(),
                    original_url: original_url.to_string(),
                    clicks: 0,
                    last_clicked_at: None,
                    created_at: now,
                    updated_at: now,
                };
                slot.insert(record.clone());
                Ok(record)
            }
        }
    }

    async fn get(&self, short_code: &str) -> StorageResult<LinkRecord> {
        self.links
            .get(short_code)
            .map(|entry| entry.value().clone())
            .ok_or(StorageError::NotFound)
    }

    async fn list_all(&self) -> StorageResult<Vec<LinkRecord>> {
        let mut links: Vec<LinkRecord> = self
            .links
            .iter()
            .map(|entry| entry.value().clone())
            .collect();

        links.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });

        Ok(links)
    }

    async fn record_click(&self, short_code: &str) -> StorageResult<LinkRecord> {
        let mut entry = self
            .links
            .get_mut(short_code)
            .ok_or(StorageError::NotFound)?;

        let now = Utc::now();
        entry.clicks += 1;
        entry.last_clicked_at = Some(now);
        entry.updated_at = now;

        Ok(entry.value().clone())
    }

    async fn remove(&self, short_code: &str) -> StorageResult<()> {
        self.links
            .remove(short_code)
            .map(|_| ())
            .ok_or(StorageError::NotFound)
    }
}
