//! Cache configuration
//!
//! Configuration is loaded through Figment: defaults, then an optional TOML
//! file, then `APPSTASH_*` environment variables, with later sources
//! overriding earlier ones.

use crate::error::{Error, Result};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default TTL applied to cache entries stored without an explicit one (24 hours).
pub const DEFAULT_ENTRY_TTL_SECS: u64 = 24 * 60 * 60;

/// Lifetime of a namespace token that is never rotated (24 hours).
pub const NAMESPACE_TOKEN_TTL_SECS: u64 = 24 * 60 * 60;

/// Entry TTL used by the fast-iteration development preset.
pub const DEVELOPMENT_ENTRY_TTL_SECS: u64 = 20;

/// Environment variable prefix for configuration overrides.
const ENV_PREFIX: &str = "APPSTASH_";

/// Cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Master switch; when false every cache operation is a successful no-op.
    pub enabled: bool,
    /// Application prefix embedded in every physical key.
    pub prefix: String,
    /// Redis connection URL; empty selects the in-memory backend.
    pub redis_url: String,
    /// TTL in seconds for entries stored without an explicit TTL.
    pub default_ttl_secs: u64,
    /// TTL in seconds for namespace tokens.
    pub namespace_ttl_secs: u64,
    /// Capacity of the in-memory backend, in entries.
    pub max_entries: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            prefix: "appstash".to_string(),
            redis_url: String::new(),
            default_ttl_secs: DEFAULT_ENTRY_TTL_SECS,
            namespace_ttl_secs: NAMESPACE_TOKEN_TTL_SECS,
            max_entries: 10_000,
        }
    }
}

impl CacheConfig {
    /// Preset for local development: entries expire after a few seconds so
    /// stale data never hides a code change.
    pub fn development() -> Self {
        Self {
            default_ttl_secs: DEVELOPMENT_ENTRY_TTL_SECS,
            ..Self::default()
        }
    }

    /// Load configuration from defaults and `APPSTASH_*` environment variables.
    pub fn load() -> Result<Self> {
        Self::extract(Figment::from(Serialized::defaults(Self::default())))
    }

    /// Load configuration from defaults, the given TOML file, and
    /// `APPSTASH_*` environment variables.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let figment =
            Figment::from(Serialized::defaults(Self::default())).merge(Toml::file(path.as_ref()));
        Self::extract(figment)
    }

    fn extract(figment: Figment) -> Result<Self> {
        let config: Self = figment
            .merge(Env::prefixed(ENV_PREFIX))
            .extract()
            .map_err(|e| Error::config(format!("failed to load cache configuration: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.prefix.is_empty() {
            return Err(Error::config("cache prefix must not be empty"));
        }
        if self.prefix.contains(':') {
            // Colon is the physical-key separator.
            return Err(Error::config("cache prefix must not contain ':'"));
        }
        if self.default_ttl_secs == 0 {
            return Err(Error::config("default entry TTL must be positive"));
        }
        if self.namespace_ttl_secs == 0 {
            return Err(Error::config("namespace token TTL must be positive"));
        }
        Ok(())
    }

    /// Default TTL for cache entries.
    pub fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl_secs)
    }

    /// TTL for namespace tokens.
    pub fn namespace_ttl(&self) -> Duration {
        Duration::from_secs(self.namespace_ttl_secs)
    }
}
