//! SQLite-backed key/value storage.

use std::path::Path;

use anyhow::Context;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};

use super::{KeyValueStorage, StorageError};

/// Durable storage in a single SQLite table.
#[derive(Debug, Clone)]
pub struct SqliteStorage {
    /// `SqlitePool` is cheap to clone and `Send + Sync`.
    pool: SqlitePool,
}

impl SqliteStorage {
    /// Open (or create) the database file at `path`.
    pub async fn open(path: &Path) -> anyhow::Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create storage directory at {:?}", parent))?;
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(options)
            .await
            .with_context(|| format!("failed to open SQLite storage at {:?}", path))?;

        Self::from_pool(pool).await
    }

    /// Private in-memory database (one connection, so every query sees the same data).
    pub async fn in_memory() -> anyhow::Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .context("failed to open in-memory SQLite storage")?;

        Self::from_pool(pool).await
    }

    /// Wrap an existing pool, creating the table if needed.
    pub async fn from_pool(pool: SqlitePool) -> anyhow::Result<Self> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS kv_store (
                key        TEXT    NOT NULL,
                durable    INTEGER NOT NULL,
                value      TEXT    NOT NULL,
                updated_at TEXT    NOT NULL,
                PRIMARY KEY (key, durable)
            )
            "#,
        )
        .execute(&pool)
        .await
        .context("failed to create kv_store table")?;

        Ok(Self { pool })
    }
}

fn backend(err: sqlx::Error) -> StorageError {
    match err {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => StorageError::Unavailable,
        other => StorageError::Backend(other.to_string()),
    }
}

#[async_trait]
impl KeyValueStorage for SqliteStorage {
    async fn get(&self, key: &str, durable: bool) -> Result<Option<String>, StorageError> {
        let row = sqlx::query(
            r#"
            SELECT value
            FROM kv_store
            WHERE key = ?1
              AND durable = ?2
            "#,
        )
        .bind(key)
        .bind(durable)
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)?;

        match row {
            Some(row) => row.try_get::<String, _>("value").map(Some).map_err(backend),
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &str, durable: bool) -> Result<(), StorageError> {
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO kv_store (key, durable, value, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(key, durable)
            DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(durable)
        .bind(value)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(backend)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn upsert_overwrites_and_missing_key_is_none() {
        let storage = SqliteStorage::in_memory().await.unwrap();

        assert_eq!(storage.get("inv_items", true).await.unwrap(), None);

        storage.set("inv_items", "[]", true).await.unwrap();
        storage.set("inv_items", "[{\"qty\":1}]", true).await.unwrap();
        storage.set("inv_items", "session", false).await.unwrap();

        assert_eq!(
            storage.get("inv_items", true).await.unwrap().as_deref(),
            Some("[{\"qty\":1}]")
        );
        assert_eq!(storage.get("inv_items", false).await.unwrap().as_deref(), Some("session"));
    }
}
