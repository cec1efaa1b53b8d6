//! Key-value storage for building documents.
//!
//! DESIGN
//! ======
//! The API treats storage as a flat key-value namespace: each document is
//! written as opaque text under a key, with a small metadata record (`name`,
//! `updatedAt`) kept beside it so listings never parse documents. Two
//! backends implement [`BuildingStore`]: an in-memory map for development and
//! tests, and a `PostgreSQL` table for durable deployments.
//!
//! ERROR HANDLING
//! ==============
//! The memory backend cannot fail. Postgres errors surface as
//! [`StoreError::Database`]; callers decide the HTTP status.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tokio::sync::RwLock;

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Listing metadata stored next to each value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryMeta {
    pub name: Option<String>,
    pub updated_at: Option<String>,
}

/// One key returned by [`BuildingStore::list`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedKey {
    pub key: String,
    pub metadata: EntryMeta,
}

#[async_trait::async_trait]
pub trait BuildingStore: Send + Sync {
    /// Insert or replace the value under `key`.
    async fn put(&self, key: &str, value: String, metadata: EntryMeta) -> Result<(), StoreError>;

    /// The value under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// All keys starting with `prefix`, in key order.
    async fn list(&self, prefix: &str) -> Result<Vec<ListedKey>, StoreError>;
}

// =============================================================================
// MEMORY BACKEND
// =============================================================================

#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<String, (String, EntryMeta)>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl BuildingStore for MemoryStore {
    async fn put(&self, key: &str, value: String, metadata: EntryMeta) -> Result<(), StoreError> {
        self.entries.write().await.insert(key.to_owned(), (value, metadata));
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.read().await.get(key).map(|(value, _)| value.clone()))
    }

    async fn list(&self, prefix: &str) -> Result<Vec<ListedKey>, StoreError> {
        let entries = self.entries.read().await;
        Ok(entries
            .range(prefix.to_owned()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, (_, metadata))| ListedKey { key: key.clone(), metadata: metadata.clone() })
            .collect())
    }
}

// =============================================================================
// POSTGRES BACKEND
// =============================================================================

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl BuildingStore for PgStore {
    async fn put(&self, key: &str, value: String, metadata: EntryMeta) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO buildings (key, value, name, updated_at, stored_at)
             VALUES ($1, $2, $3, $4, now())
             ON CONFLICT (key) DO UPDATE
             SET value = EXCLUDED.value,
                 name = EXCLUDED.name,
                 updated_at = EXCLUDED.updated_at,
                 stored_at = EXCLUDED.stored_at",
        )
        .bind(key)
        .bind(value)
        .bind(metadata.name)
        .bind(metadata.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let value = sqlx::query_scalar::<_, String>("SELECT value FROM buildings WHERE key = $1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(value)
    }

    async fn list(&self, prefix: &str) -> Result<Vec<ListedKey>, StoreError> {
        let rows = sqlx::query_as::<_, (String, Option<String>, Option<String>)>(
            "SELECT key, name, updated_at
             FROM buildings
             WHERE starts_with(key, $1)
             ORDER BY key ASC",
        )
        .bind(prefix)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(key, name, updated_at)| ListedKey { key, metadata: EntryMeta { name, updated_at } })
            .collect())
    }
}
