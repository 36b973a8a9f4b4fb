//! In-process cache store
//!
//! Backend on Moka. Each entry carries its own TTL, applied through an
//! `Expiry` policy, and the entry API supplies the atomic create-if-absent
//! that namespace-token creation relies on.

use super::CacheStore;
use crate::error::Result;
use async_trait::async_trait;
use moka::Expiry;
use moka::future::Cache;
use std::time::{Duration, Instant};

/// Stored value plus its requested lifetime; the expiry policy reads the
/// TTL back out of the entry.
#[derive(Debug, Clone)]
struct StoredEntry {
    payload: String,
    ttl: Duration,
}

struct PerEntryExpiry;

impl Expiry<String, StoredEntry> for PerEntryExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        entry: &StoredEntry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        entry: &StoredEntry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }
}

/// In-memory store used when no Redis URL is configured.
#[derive(Clone)]
pub struct MemoryStore {
    cache: Cache<String, StoredEntry>,
    max_entries: u64,
}

impl MemoryStore {
    /// Default capacity in entries.
    pub const DEFAULT_MAX_ENTRIES: u64 = 10_000;

    /// Create a store bounded to `max_entries` live entries.
    pub fn new(max_entries: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_entries)
            .expire_after(PerEntryExpiry)
            .build();
        Self { cache, max_entries }
    }

    /// Maximum number of entries the store will hold.
    pub fn max_entries(&self) -> u64 {
        self.max_entries
    }

    /// Number of live entries, with pending maintenance applied first.
    pub async fn entry_count(&self) -> u64 {
        self.cache.run_pending_tasks().await;
        self.cache.entry_count()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_ENTRIES)
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.cache.get(key).await.map(|entry| entry.payload))
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        let entry = StoredEntry {
            payload: value.to_string(),
            ttl,
        };
        self.cache.insert(key.to_string(), entry).await;
        Ok(())
    }

    async fn add(&self, key: &str, value: &str, ttl: Duration) -> Result<bool> {
        let entry = StoredEntry {
            payload: value.to_string(),
            ttl,
        };
        let stored = self.cache.entry(key.to_string()).or_insert(entry).await;
        Ok(stored.is_fresh())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.cache.invalidate(key).await;
        Ok(())
    }

    fn store_name(&self) -> &str {
        "memory"
    }
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("max_entries", &self.max_entries)
            .field("entries", &self.cache.entry_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TTL: Duration = Duration::from_secs(60);

    #[tokio::test]
    async fn set_then_get_returns_value() {
        let store = MemoryStore::default();
        store.set("k", "v", TTL).await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), Some("v".to_string()));
    }

    #[tokio::test]
    async fn get_missing_key_returns_none() {
        let store = MemoryStore::default();
        assert_eq!(store.get("absent").await.unwrap(), None);
    }

    #[tokio::test]
    async fn delete_removes_value() {
        let store = MemoryStore::default();
        store.set("k", "v", TTL).await.unwrap();
        store.delete("k").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn add_is_first_writer_wins() {
        let store = MemoryStore::default();
        assert!(store.add("k", "first", TTL).await.unwrap());
        assert!(!store.add("k", "second", TTL).await.unwrap());
        assert_eq!(store.get("k").await.unwrap(), Some("first".to_string()));
    }

    #[tokio::test]
    async fn entries_expire_after_their_ttl() {
        let store = MemoryStore::default();
        store
            .set("short", "v", Duration::from_millis(50))
            .await
            .unwrap();
        store.set("long", "v", TTL).await.unwrap();

        tokio::time::sleep(Duration::from_millis(120)).await;

        assert_eq!(store.get("short").await.unwrap(), None);
        assert_eq!(store.get("long").await.unwrap(), Some("v".to_string()));
    }

    #[tokio::test]
    async fn set_overwrites_and_renews_ttl() {
        let store = MemoryStore::default();
        store
            .set("k", "old", Duration::from_millis(50))
            .await
            .unwrap();
        store.set("k", "new", TTL).await.unwrap();

        tokio::time::sleep(Duration::from_millis(120)).await;

        assert_eq!(store.get("k").await.unwrap(), Some("new".to_string()));
    }
}
