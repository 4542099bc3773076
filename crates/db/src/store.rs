//! String-keyed persistence used for the API credential, the genre table and
//! cached lookups. Entries never expire.

use std::collections::HashMap;
use std::sync::Mutex;

use sqlx::SqlitePool;

use crate::StoreError;
use crate::repo::kv;

#[async_trait::async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    async fn delete(&self, key: &str) -> Result<bool, StoreError>;
}

/// Store backed by the `kv` table.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl KeyValueStore for SqliteStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(kv::get(&self.pool, key).await?)
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        Ok(kv::set(&self.pool, key, value).await?)
    }

    async fn delete(&self, key: &str) -> Result<bool, StoreError> {
        Ok(kv::delete(&self.pool, key).await?)
    }
}

/// Process-local store for tests and throwaway sessions.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
    writes: Mutex<Vec<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keys in the order they were written, repeats included.
    pub fn writes(&self) -> Vec<String> {
        self.writes.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait::async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), value.to_string());
        self.writes
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(key.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, StoreError> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        Ok(entries.remove(key).is_some())
    }
}
