//! Local store adapter: one JSON document under one fixed key.

use chrono::Utc;
use sqlx::{Row, SqlitePool};

use crate::errors::AppError;
use crate::models::Document;

/// Key the current site document is stored under.
pub const DOCUMENT_KEY: &str = "current";

/// Key-value adapter over the local SQLite database.
#[derive(Clone)]
pub struct LocalStore {
    pool: SqlitePool,
}

impl LocalStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Read the stored document, if any.
    pub async fn get_document(&self) -> Result<Option<Document>, AppError> {
        match self.get_raw(DOCUMENT_KEY).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// Replace the stored document. Completes only once the write is committed.
    pub async fn put_document(&self, document: &Document) -> Result<(), AppError> {
        let raw = serde_json::to_string(document)?;
        self.put_raw(DOCUMENT_KEY, &raw).await
    }

    /// Read a raw value by key.
    pub async fn get_raw(&self, key: &str) -> Result<Option<String>, AppError> {
        let row = sqlx::query("SELECT value FROM kv WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|r| r.get("value")))
    }

    /// Upsert a raw value by key.
    pub async fn put_raw(&self, key: &str, value: &str) -> Result<(), AppError> {
        let now = Utc::now().to_rfc3339();
        sqlx::query(
            "INSERT INTO kv (key, value, updated_at) VALUES (?, ?, ?) \
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        )
        .bind(key)
        .bind(value)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_database;
    use crate::models::initial_document;
    use tempfile::TempDir;

    async fn store() -> (LocalStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let pool = init_database(&temp_dir.path().join("local.sqlite"))
            .await
            .unwrap();
        (LocalStore::new(pool), temp_dir)
    }

    #[tokio::test]
    async fn test_empty_store_has_no_document() {
        let (store, _dir) = store().await;
        assert!(store.get_document().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_put_replaces_single_key() {
        let (store, _dir) = store().await;
        let mut doc = initial_document();

        store.put_document(&doc).await.unwrap();
        doc.school_name = "Renamed".to_string();
        doc.notices.clear();
        store.put_document(&doc).await.unwrap();

        let keys: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM kv")
            .fetch_one(&store.pool)
            .await
            .unwrap();
        assert_eq!(keys, 1);
        assert_eq!(store.get_document().await.unwrap(), Some(doc));
    }

    #[tokio::test]
    async fn test_corrupt_value_is_an_error() {
        let (store, _dir) = store().await;
        store.put_raw(DOCUMENT_KEY, "{not json").await.unwrap();
        assert!(store.get_document().await.is_err());
    }
}
