use std::str::FromStr;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use estimator_core::{DraftStore, StoreError};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::debug;

const MEMORY: &str = ":memory:";

/// [`DraftStore`] backed by a single SQLite table.
pub struct SqliteDraftStore {
    pool: SqlitePool,
}

impl SqliteDraftStore {
    /// Opens `connection_string`, which is either a bare file path (created
    /// if missing), `:memory:`, or a full `sqlite:` URL.
    pub async fn new(connection_string: &str) -> Result<Self> {
        let (options, in_memory) = connect_options(connection_string)?;

        // Each in-memory connection is its own database, so keep exactly one
        // alive for the lifetime of the pool.
        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new()
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .with_context(|| format!("Failed to connect to database: {}", connection_string))?;

        debug!(connection_string, "opened sqlite draft store");
        Ok(Self { pool })
    }

    /// Connects and brings the schema up to date; what the wizard calls.
    ///
    /// # Errors
    /// * [`StoreError::Connection`] when the database cannot be opened,
    ///   e.g. its directory does not exist.
    /// * [`StoreError::Database`] when a migration fails.
    pub async fn open(connection_string: &str) -> Result<Self, StoreError> {
        let store = Self::new(connection_string)
            .await
            .map_err(|e| StoreError::Connection(format!("{e:#}")))?;
        store
            .run_migrations()
            .await
            .map_err(|e| StoreError::Database(format!("{e:#}")))?;
        Ok(store)
    }

    pub async fn new_with_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Failed to run migrations")?;
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn connect_options(connection_string: &str) -> Result<(SqliteConnectOptions, bool)> {
    let trimmed = connection_string.trim();
    if trimmed == MEMORY || trimmed == "sqlite::memory:" {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        return Ok((options, true));
    }
    if trimmed.starts_with("sqlite:") {
        let options = SqliteConnectOptions::from_str(trimmed)
            .with_context(|| format!("Invalid sqlite URL: {}", trimmed))?;
        return Ok((options, trimmed.contains("mode=memory")));
    }
    let options = SqliteConnectOptions::new()
        .filename(trimmed)
        .create_if_missing(true);
    Ok((options, false))
}

fn database_error(e: sqlx::Error) -> StoreError {
    StoreError::Database(e.to_string())
}

#[async_trait]
impl DraftStore for SqliteDraftStore {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        let value: Option<(String,)> =
            sqlx::query_as("SELECT value FROM local_storage WHERE key = ?")
                .bind(key)
                .fetch_optional(&self.pool)
                .await
                .map_err(database_error)?;

        Ok(value.map(|(v,)| v))
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO local_storage (key, value, updated_at) VALUES (?, ?, ?)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(database_error)?;

        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM local_storage WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(database_error)?;

        Ok(())
    }
}
