use std::time::Duration;
use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::info;

use crate::config::Config;
use crate::error::{AppResult, StoreError};
use crate::store::PgRecordStore;

/// Connects the Postgres record store and brings its schema up to date
pub async fn initialize_store(config: &Config) -> AppResult<PgRecordStore> {
    let pool = initialize_database(config).await?;
    Ok(PgRecordStore::new(pool))
}

async fn initialize_database(config: &Config) -> AppResult<PgPool> {
    info!("📊 Connecting to database...");

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .connect(&config.database_url)
        .await
        .map_err(StoreError::from)?;

    info!(
        "✓ Database pool configured: {} max connections",
        config.max_connections
    );

    info!("🔄 Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(StoreError::from)?;

    info!("✓ Database initialized");
    Ok(pool)
}
