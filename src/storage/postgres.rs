use crate::models::{LinkRecord, LinkRow};
use crate::storage::{now_millis, Storage, StorageError, StorageResult};
use anyhow::Result;
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::sync::Arc;

const LINK_COLUMNS: &str =
    "id, short_code, original_url, clicks, last_clicked_at, created_at, updated_at";

pub struct PostgresStorage {
    pool: Arc<PgPool>,
}

impl PostgresStorage {
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self {
            pool: Arc::new(pool),
        })
    }
}

#[async_trait]
impl Storage for PostgresStorage {
    async fn init(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS links (
                id BIGSERIAL PRIMARY KEY,
                short_code TEXT NOT NULL UNIQUE,
                original_url TEXT NOT NULL,
                clicks BIGINT NOT NULL DEFAULT 0,
                last_clicked_at BIGINT,
                created_at BIGINT NOT NULL,
                updated_at BIGINT NOT NULL
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

        let row = sqlx::query_as::<_, LinkRow>(&format!(
            r#"
            INSERT INTO links (short_code, original_url, clicks, created_at, updated_at)
            VALUES ($1, $2, 0, $3, $3)
            ON CONFLICT (short_code) DO NOTHING
            RETURNING {LINK_COLUMNS}
            "#
        ))
        .bind(short_code)
        .bind(original_url)
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
            "SELECT {LINK_COLUMNS} FROM links WHERE short_code = $1"
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

        // Row-level lock on the UPDATE serializes concurrent clicks per code
        let row = sqlx::query_as::<_, LinkRow>(&format!(
            r#"
            UPDATE links
            SET clicks = clicks + 1, last_clicked_at = $1, updated_at = $1
            WHERE short_code = $2
            RETURNING {LINK_COLUMNS}
            "#
        ))
        .bind(now)
        .bind(short_code)
        .fetch_optional(self.pool.as_ref())
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(row.try_into()?)
    }

    async fn remove(&self, short_code: &str) -> StorageResult<()> {
        let result = sqlx::query("DELETE FROM links WHERE short_code = $1")
            .bind(short_code)
            .execute(self.pool.as_ref())
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }
}
