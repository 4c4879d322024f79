use crate::models::{LinkRecord, LinkRow};
use crate::storage::{now_millis, Storage, StorageError, StorageResult};
use anyhow::Result;
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::sync::Arc;

const LINK_COLUMNS: &str =
    "id, short_code, original_url, clicks, last_clicked_at, created_at, updated_at";

pub struct SqliteStorage {
    pool: Arc<SqlitePool>,
}

impl SqliteStorage {
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;
        Ok(Self {
            pool: Arc::new(pool),
        })
    }
}

#[async_trait]
impl Storage for SqliteStorage {
    async fn init(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS links (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                short_code TEXT NOT NULL UNIQUE,
                original_url TEXT NOT NULL,
                clicks INTEGER NOT NULL DEFAULT 0,
                last_clicked_at INTEGER,
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL
            )
            "#,
        )
        .execute(self.pool.as_ref())
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_links_created_at ON links(created_at)")
            .execute(self.pool.as_ref())
            .await?;

        Ok(())
    }

    async fn put(&self, short_code: &str, original_url: &str) -> StorageResult<LinkRecord> {
        let now = now_millis();

        // ON CONFLICT keeps check-and-insert in a single statement
        let row = sqlx::query_as::<_, LinkRow>(&format!(
            r#"
            INSERT INTO links (short_code, original_url, clicks, created_at, updated_at)
            VALUES (?, ?, 0, ?, ?)
            ON CONFLICT(short_code) DO NOTHING
            RETURNING {LINK_COLUMNS}
            "#
        ))
        .bind(short_code)
        .bind(original_url)
        .bind(now)
        .bind(now)
        .fetch_optional(self.pool.as_ref())
        .await?;

        match row {
            Some(row) => Ok(row.try_into()?),
            None => Err(StorageError::Conflict),
        }
    }

    async fn get(&self, short_code: &str) -> StorageResult<LinkRecord> {
        let row = sqlx::query_as::<_, LinkRow>(&format!(
            "SELECT {LINK_COLUMNS} FROM links WHERE short_code = ?"
        ))
        .bind(short_code)
        .fetch_optional(self.pool.as_ref())
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(row.try_into()?)
    }

    async fn list_all(&self) -> StorageResult<Vec<LinkRecord>> {
        let rows = sqlx::query_as::<_, LinkRow>(&format!(
            "SELECT {LINK_COLUMNS} FROM links ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(self.pool.as_ref())
        .await?;

        rows.into_iter()
            .map(|row| LinkRecord::try_from(row).map_err(StorageError::from))
            .collect()
    }

    async fn record_click(&self, short_code: &str) -> StorageResult<LinkRecord> {
        let now = now_millis();

        let row = sqlx::query_as::<_, LinkRow>(&format!(
            r#"
            UPDATE links
            SET clicks = clicks + 1, last_clicked_at = ?, updated_at = ?
            WHERE short_code = ?
            RETURNING {LINK_COLUMNS}
            "#
        ))
        .bind(now)
        .bind(now)
        .bind(short_code)
        .fetch_optional(self.pool.as_ref())
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(row.try_into()?)
    }

    async fn remove(&self, short_code: &str) -> StorageResult<()> {
        let result = sqlx::query("DELETE FROM links WHERE short_code = ?")
            .bind(short_code)
            .execute(self.pool.as_ref())
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }
}
