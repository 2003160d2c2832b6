//! Runtime configuration
//!
//! Environment variables (plus an optional `.env` file) provide the API and
//! push-channel endpoints; the local SQLite database under the user's data
//! directory holds client state between runs.

pub mod db;
pub mod repository;

use std::path::PathBuf;

use anyhow::{Context, Result};
use sqlx::SqlitePool;

use crate::upload::chunker::DEFAULT_CHUNK_SIZE;

/// Loaded configuration plus the open database pool.
#[derive(Clone)]
pub struct Config {
    pub api_base_url: String,
    /// Push-channel endpoint the upload status events arrive on.
    pub push_channel_url: Option<String>,
    pub chunk_size: u64,
    pool: SqlitePool,
}

impl Config {
    /// Read the environment and open the local database.
    ///
    /// `CLASSORE_API_URL` is required; `CLASSORE_WS_URL`,
    /// `CLASSORE_CHUNK_SIZE` and `CLASSORE_DATA_DIR` are optional.
    pub async fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let api_base_url = std::env::var("CLASSORE_API_URL")
            .context("CLASSORE_API_URL is not set")?
            .trim_end_matches('/')
            .to_string();
        let push_channel_url = std::env::var("CLASSORE_WS_URL").ok();
        let chunk_size = match std::env::var("CLASSORE_CHUNK_SIZE") {
            Ok(raw) => raw
                .parse::<u64>()
                .context("CLASSORE_CHUNK_SIZE must be a positive integer")?,
            Err(_) => DEFAULT_CHUNK_SIZE,
        };
        anyhow::ensure!(chunk_size > 0, "CLASSORE_CHUNK_SIZE must be positive");

        let data_dir = Self::data_dir()?;
        std::fs::create_dir_all(&data_dir)
            .with_context(|| format!("Failed to create data directory {}", data_dir.display()))?;
        let pool = db::connect(&data_dir.join("classore-admin.db")).await?;
        db::init_schema(&pool).await?;

        Ok(Self {
            api_base_url,
            push_channel_url,
            chunk_size,
            pool,
        })
    }

    /// In-memory variant for tests.
    pub async fn for_tests(api_base_url: impl Into<String>) -> Result<Self> {
        let pool = db::connect_memory().await?;
        db::init_schema(&pool).await?;
        Ok(Self {
            api_base_url: api_base_url.into(),
            push_channel_url: None,
            chunk_size: DEFAULT_CHUNK_SIZE,
            pool,
        })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    fn data_dir() -> Result<PathBuf> {
        if let Ok(dir) = std::env::var("CLASSORE_DATA_DIR") {
            return Ok(PathBuf::from(dir));
        }
        dirs::data_dir()
            .map(|dir| dir.join("classore-admin"))
            .context("Could not determine a data directory; set CLASSORE_DATA_DIR")
    }
}
