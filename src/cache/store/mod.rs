//! Cache store backends
//!
//! The external key-value collaborator is expressed as the [`CacheStore`]
//! trait. Three implementations ship with the crate:
//!
//! 1. **Memory (Moka)**: in-process cache, used when no Redis URL is
//!    configured.
//! 2. **Redis**: distributed cache for deployments where several processes
//!    must share one view.
//! 3. **Null**: stores nothing; used in tests and when caching is disabled.

mod memory;
mod null;
mod redis;

pub use self::redis::RedisStore;
pub use memory::MemoryStore;
pub use null::NullStore;

use crate::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Contract for the external key-value store backing the cache facade.
///
/// Implementations provide string-keyed storage with per-key expiry and an
/// atomic create-if-absent primitive. The atomicity of `add` is what lets
/// concurrent first-accessors of a namespace converge on a single token.
#[async_trait]
pub trait CacheStore: Send + Sync + std::fmt::Debug {
    /// Get a value, `None` if absent or expired.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store a value with the given time to live, overwriting any existing
    /// value.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<()>;

    /// Store a value only if the key is currently absent.
    ///
    /// Returns `true` if this call created the entry, `false` if a value
    /// already existed. Must be atomic.
    async fn add(&self, key: &str, value: &str, ttl: Duration) -> Result<bool>;

    /// Remove a value. Removing an absent key is not an error.
    async fn delete(&self, key: &str) -> Result<()>;

    /// Identifier of the backend implementation (e.g. "memory", "redis").
    fn store_name(&self) -> &str;
}
