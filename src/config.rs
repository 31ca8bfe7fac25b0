use serde::Deserialize;

use crate::error::AppResult;

/// Runtime settings, read from `CASHOUT_*` environment variables
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct Config {
    pub database_url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> AppResult<Self> {
        dotenv::dotenv().ok();
        Self::from_source(config::Environment::with_prefix("CASHOUT"))
    }

    fn from_source(source: impl config::Source + Send + Sync + 'static) -> AppResult<Self> {
        let settings: Self = config::Config::builder()
            .set_default("database_url", "postgresql://localhost/cashout")?
            .set_default("max_connections", 10)?
            .set_default("min_connections", 1)?
            .set_default("acquire_timeout_secs", 30)?
            .add_source(source)
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }
}
