//! Redis cache store
//!
//! Distributed backend using multiplexed connections for efficient
//! connection reuse. Create-if-absent maps to `SET NX EX`, so token
//! creation stays atomic across processes.

use super::CacheStore;
use crate::error::Result;
use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, Client, ExistenceCheck, SetExpiry, SetOptions};
use std::time::Duration;

/// Store backed by a Redis server, for deployments where several processes
/// share one cache.
#[derive(Clone)]
pub struct RedisStore {
    client: Client,
}

impl RedisStore {
    /// Create a store from a connection URL without contacting the server.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let store = RedisStore::new("redis://localhost:6379")?;
    /// ```
    pub fn new(connection_string: &str) -> Result<Self> {
        let client = Client::open(connection_string)?;
        Ok(Self { client })
    }

    /// Create a store and verify the server is reachable.
    pub async fn connect(connection_string: &str) -> Result<Self> {
        let store = Self::new(connection_string)?;
        let mut conn = store.connection().await?;
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(store)
    }

    async fn connection(&self) -> Result<MultiplexedConnection> {
        Ok(self.client.get_multiplexed_async_connection().await?)
    }
}

#[async_trait]
impl CacheStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.connection().await?;
        Ok(conn.get::<_, Option<String>>(key).await?)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        let mut conn = self.connection().await?;
        conn.set_ex::<_, _, ()>(key, value, ttl.as_secs()).await?;
        Ok(())
    }

    async fn add(&self, key: &str, value: &str, ttl: Duration) -> Result<bool> {
        let mut conn = self.connection().await?;
        let options = SetOptions::default()
            .conditional_set(ExistenceCheck::NX)
            .with_expiration(SetExpiry::EX(ttl.as_secs()));
        // SET NX answers nil when the key already exists, which the client
        // maps to false.
        Ok(conn.set_options::<_, _, bool>(key, value, options).await?)
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut conn = self.connection().await?;
        conn.del::<_, ()>(key).await?;
        Ok(())
    }

    fn store_name(&self) -> &str {
        "redis"
    }
}

impl std::fmt::Debug for RedisStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisStore").finish_non_exhaustive()
    }
}
