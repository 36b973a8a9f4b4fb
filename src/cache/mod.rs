//! Namespaced caching over an external key-value store
//!
//! Entries are grouped into namespaces, and a whole namespace is
//! invalidated in O(1) by rotating an indirection token instead of deleting
//! its keys: every physical key embeds the namespace's current token, so
//! after a rotation previously written entries are simply never addressed
//! again and age out through their own TTL.
//!
//! The store is treated as a pure optimization, never a correctness
//! dependency. Every store failure is swallowed, logged at `warn`, and
//! reported as a miss (reads) or an unacknowledged write (writes and
//! deletes). Callers must always have a fallback computation path.

pub mod config;
mod key;
mod stats;
pub mod store;

pub use config::CacheConfig;
pub use stats::CacheStats;

use crate::error::Result;
use key::KeyBuilder;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use store::{CacheStore, MemoryStore, RedisStore};

/// Namespaced cache facade.
///
/// Construct one at process start and hand out clones; cloning is cheap and
/// all clones share the same backend and counters.
#[derive(Clone)]
pub struct NamespacedCache {
    store: Arc<dyn CacheStore>,
    config: CacheConfig,
    keys: KeyBuilder,
    hits: Arc<AtomicU64>,
    misses: Arc<AtomicU64>,
}

impl NamespacedCache {
    /// Create a cache over an explicit store.
    pub fn new(config: CacheConfig, store: Arc<dyn CacheStore>) -> Self {
        let keys = KeyBuilder::new(config.prefix.clone());
        Self {
            store,
            config,
            keys,
            hits: Arc::new(AtomicU64::new(0)),
            misses: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Build a cache from configuration, selecting the backend.
    ///
    /// A non-empty `redis_url` selects Redis and the connection is verified
    /// up front; an unreachable server is a hard error here rather than a
    /// silently degraded cache. An empty URL selects the in-memory backend.
    pub async fn from_config(config: CacheConfig) -> Result<Self> {
        config.validate()?;
        let store: Arc<dyn CacheStore> = if config.enabled && !config.redis_url.is_empty() {
            let store = RedisStore::connect(&config.redis_url).await?;
            tracing::info!("redis cache connection established: {}", config.redis_url);
            Arc::new(store)
        } else {
            Arc::new(MemoryStore::new(config.max_entries))
        };
        Ok(Self::new(config, store))
    }

    /// Get a value from the cache.
    ///
    /// Returns `None` for a miss, a store failure, or an entry that no
    /// longer deserializes; the three are indistinguishable to the caller.
    pub async fn get<T>(&self, namespace: &str, key: &str) -> Option<T>
    where
        T: DeserializeOwned,
    {
        if !self.config.enabled {
            return None;
        }

        let cache_key = match self.entry_key(namespace, key).await {
            Ok(cache_key) => cache_key,
            Err(e) => {
                tracing::warn!("cache get for namespace {} degraded to miss: {}", namespace, e);
                self.misses.fetch_add(1, Ordering::Relaxed);
                return None;
            }
        };

        match self.store.get(&cache_key).await {
            Ok(Some(json)) => match serde_json::from_str(&json) {
                Ok(value) => {
                    self.hits.fetch_add(1, Ordering::Relaxed);
                    Some(value)
                }
                Err(e) => {
                    tracing::warn!("discarding undeserializable cache entry {}: {}", cache_key, e);
                    self.misses.fetch_add(1, Ordering::Relaxed);
                    None
                }
            },
            Ok(None) => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
            Err(e) => {
                tracing::warn!("cache get failed: {}", e);
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Set a value with the configured default TTL.
    ///
    /// Returns whether the write was acknowledged by the store. A `false`
    /// is not an error condition; the cache is allowed to lose data.
    pub async fn set<T>(&self, namespace: &str, key: &str, value: &T) -> bool
    where
        T: Serialize,
    {
        self.set_with_ttl(namespace, key, value, self.config.default_ttl())
            .await
    }

    /// Set a value with an explicit TTL.
    pub async fn set_with_ttl<T>(
        &self,
        namespace: &str,
        key: &str,
        value: &T,
        ttl: Duration,
    ) -> bool
    where
        T: Serialize,
    {
        if !self.config.enabled {
            return true;
        }

        let json = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!("cache set skipped, value failed to serialize: {}", e);
                return false;
            }
        };

        let cache_key = match self.entry_key(namespace, key).await {
            Ok(cache_key) => cache_key,
            Err(e) => {
                tracing::warn!("cache set for namespace {} skipped: {}", namespace, e);
                return false;
            }
        };

        match self.store.set(&cache_key, &json, ttl).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("cache set failed: {}", e);
                false
            }
        }
    }

    /// Delete a single entry.
    pub async fn delete(&self, namespace: &str, key: &str) -> bool {
        if !self.config.enabled {
            return true;
        }

        let cache_key = match self.entry_key(namespace, key).await {
            Ok(cache_key) => cache_key,
            Err(e) => {
                tracing::warn!("cache delete for namespace {} skipped: {}", namespace, e);
                return false;
            }
        };

        match self.store.delete(&cache_key).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("cache delete failed: {}", e);
                false
            }
        }
    }

    /// Invalidate every entry in a namespace by rotating its token.
    ///
    /// The overwrite is deliberately unconditional rather than an atomic
    /// add: concurrent invalidations each install their own token and the
    /// last write wins, which is safe because any of the fresh tokens
    /// orphans the pre-invalidation entries.
    pub async fn invalidate_namespace(&self, namespace: &str) -> bool {
        if !self.config.enabled {
            return true;
        }

        let token_key = self.keys.token_key(namespace);
        let fresh = self.keys.fresh_token(namespace);
        match self
            .store
            .set(&token_key, &fresh, self.config.namespace_ttl())
            .await
        {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("invalidation of namespace {} failed: {}", namespace, e);
                false
            }
        }
    }

    /// Read-through helper: on a miss the producer runs and its result is
    /// stored best-effort before being returned.
    pub async fn get_or_compute<T, F, Fut>(
        &self,
        namespace: &str,
        key: &str,
        ttl: Option<Duration>,
        compute: F,
    ) -> T
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        if let Some(cached) = self.get(namespace, key).await {
            return cached;
        }
        let value = compute().await;
        let ttl = ttl.unwrap_or_else(|| self.config.default_ttl());
        self.set_with_ttl(namespace, key, &value, ttl).await;
        value
    }

    /// Create a view bound to one namespace.
    pub fn namespace<S: Into<String>>(&self, namespace: S) -> NamespaceHandle {
        NamespaceHandle {
            cache: self.clone(),
            namespace: namespace.into(),
        }
    }

    /// Snapshot of the hit/miss counters.
    pub fn stats(&self) -> CacheStats {
        CacheStats::from_counts(
            self.hits.load(Ordering::Relaxed),
            self.misses.load(Ordering::Relaxed),
        )
    }

    /// Check if the cache is enabled.
    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Get the configuration.
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Resolve the current token for `namespace`, creating one if absent.
    async fn resolve_token(&self, namespace: &str) -> Result<String> {
        let token_key = self.keys.token_key(namespace);
        if let Some(token) = self.store.get(&token_key).await? {
            return Ok(token);
        }

        let fresh = self.keys.fresh_token(namespace);
        self.store
            .add(&token_key, &fresh, self.config.namespace_ttl())
            .await?;
        // Re-read instead of trusting our own write: if another caller's
        // add won the race between the get above and this add, everyone
        // must agree on that winning token.
        Ok(self.store.get(&token_key).await?.unwrap_or(fresh))
    }

    async fn entry_key(&self, namespace: &str, key: &str) -> Result<String> {
        let token = self.resolve_token(namespace).await?;
        Ok(self.keys.composite_key(namespace, &token, key))
    }
}

impl std::fmt::Debug for NamespacedCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NamespacedCache")
            .field("store", &self.store.store_name())
            .field("enabled", &self.config.enabled)
            .finish()
    }
}

/// View of a [`NamespacedCache`] bound to one namespace.
#[derive(Debug, Clone)]
pub struct NamespaceHandle {
    cache: NamespacedCache,
    namespace: String,
}

impl NamespaceHandle {
    /// The namespace this handle is bound to.
    pub fn name(&self) -> &str {
        &self.namespace
    }

    /// Get a value from this namespace.
    pub async fn get<T>(&self, key: &str) -> Option<T>
    where
        T: DeserializeOwned,
    {
        self.cache.get(&self.namespace, key).await
    }

    /// Set a value in this namespace with the default TTL.
    pub async fn set<T>(&self, key: &str, value: &T) -> bool
    where
        T: Serialize,
    {
        self.cache.set(&self.namespace, key, value).await
    }

    /// Set a value in this namespace with an explicit TTL.
    pub async fn set_with_ttl<T>(&self, key: &str, value: &T, ttl: Duration) -> bool
    where
        T: Serialize,
    {
        self.cache
            .set_with_ttl(&self.namespace, key, value, ttl)
            .await
    }

    /// Delete a value from this namespace.
    pub async fn delete(&self, key: &str) -> bool {
        self.cache.delete(&self.namespace, key).await
    }

    /// Invalidate everything in this namespace.
    pub async fn invalidate(&self) -> bool {
        self.cache.invalidate_namespace(&self.namespace).await
    }
}
