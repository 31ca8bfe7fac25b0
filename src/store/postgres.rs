use async_trait::async_trait;
use futures::stream::{BoxStream, StreamExt};
use sqlx::PgPool;
use tracing::debug;

use crate::error::StoreError;
use crate::store::{RecordStore, StoreResult};

/// Postgres-backed record store over the `cashout_records` table
#[derive(Debug, Clone)]
pub struct PgRecordStore {
    pool: PgPool,
}

impl PgRecordStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn get(&self, key: &str) -> StoreResult<Vec<u8>> {
        let value: Option<Vec<u8>> =
            sqlx::query_scalar("SELECT value FROM cashout_records WHERE key = $1")
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;

        value.ok_or_else(|| StoreError::NotFound(key.to_string()))
    }

    async fn put(&self, key: &str, value: Vec<u8>) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO cashout_records (key, value, updated_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (key) DO UPDATE
            SET value = EXCLUDED.value, updated_at = NOW()
            "#,
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;

        debug!("💾 Stored record {}", key);
        Ok(())
    }

    fn iterate<'a>(&'a self, prefix: &'a str) -> BoxStream<'a, StoreResult<(String, Vec<u8>)>> {
        // LIKE would treat `_` in key prefixes as a wildcard
        sqlx::query_as::<_, (String, Vec<u8>)>(
            r#"
            SELECT key, value FROM cashout_records
            WHERE left(key, length($1)) = $1
            ORDER BY key COLLATE "C"
            "#,
        )
        .bind(prefix)
        .fetch(&self.pool)
        .map(|row| row.map_err(StoreError::from))
        .boxed()
    }
}
