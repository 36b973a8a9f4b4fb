//! Null cache store
//!
//! A store that doesn't keep anything. Useful for tests and for disabling
//! caching without changing call sites.

use super::CacheStore;
use crate::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Store that accepts every write and answers every read with absent.
#[derive(Debug, Clone, Default)]
pub struct NullStore;

impl NullStore {
    /// Create a new null store.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CacheStore for NullStore {
    async fn get(&self, _key: &str) -> Result<Option<String>> {
        Ok(None)
    }

    async fn set(&self, _key: &str, _value: &str, _ttl: Duration) -> Result<()> {
        Ok(())
    }

    async fn add(&self, _key: &str, _value: &str, _ttl: Duration) -> Result<bool> {
        // Pretend the entry was created; nothing observes it afterwards.
        Ok(true)
    }

    async fn delete(&self, _key: &str) -> Result<()> {
        Ok(())
    }

    fn store_name(&self) -> &str {
        "null"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn never_returns_a_value() {
        let store = NullStore::new();
        store.set("k", "v", Duration::from_secs(60)).await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), None);
        assert!(store.add("k", "v", Duration::from_secs(60)).await.unwrap());
        store.delete("k").await.unwrap();
    }
}
