//! Cache key derivation
//!
//! Memcached-style stores limit key length and character set, so logical
//! keys are never stored verbatim: the physical key combines the
//! application prefix, the namespace name, the namespace's current token,
//! and a seahash of the logical key. Embedding the token in the address is
//! what makes token rotation invalidate a namespace without touching its
//! entries.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Derives the physical store keys used by the cache facade.
#[derive(Debug, Clone)]
pub(crate) struct KeyBuilder {
    prefix: String,
    /// Disambiguates tokens generated within the same clock reading.
    sequence: Arc<AtomicU64>,
}

impl KeyBuilder {
    pub(crate) fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            sequence: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Store key holding the current token for `namespace`.
    pub(crate) fn token_key(&self, namespace: &str) -> String {
        let digest = hash_hex(format!("namespace:{namespace}").as_bytes());
        format!("{}:ns:{}", self.prefix, digest)
    }

    /// Physical key for a (namespace, logical key) pair under `token`.
    pub(crate) fn composite_key(&self, namespace: &str, token: &str, key: &str) -> String {
        format!(
            "{}:{}:{}:{}",
            self.prefix,
            namespace,
            token,
            hash_hex(key.as_bytes())
        )
    }

    /// Generate a token value distinct from every token previously issued
    /// for the namespace.
    pub(crate) fn fresh_token(&self, namespace: &str) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_nanos())
            .unwrap_or_default();
        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed);
        hash_hex(format!("{namespace}:{nanos}:{sequence}").as_bytes())
    }
}

fn hash_hex(bytes: &[u8]) -> String {
    format!("{:016x}", seahash::hash(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composite_key_is_deterministic() {
        let keys = KeyBuilder::new("app");
        let first = keys.composite_key("users", "token", "42");
        let second = keys.composite_key("users", "token", "42");
        assert_eq!(first, second);
    }

    #[test]
    fn composite_key_separates_logical_keys() {
        let keys = KeyBuilder::new("app");
        let first = keys.composite_key("users", "token", "42");
        let second = keys.composite_key("users", "token", "43");
        assert_ne!(first, second);
    }

    #[test]
    fn composite_key_embeds_token() {
        let keys = KeyBuilder::new("app");
        let before = keys.composite_key("users", "old", "42");
        let after = keys.composite_key("users", "new", "42");
        assert_ne!(before, after);
    }

    #[test]
    fn token_key_is_stable_and_namespace_specific() {
        let keys = KeyBuilder::new("app");
        assert_eq!(keys.token_key("users"), keys.token_key("users"));
        assert_ne!(keys.token_key("users"), keys.token_key("sessions"));
    }

    #[test]
    fn fresh_tokens_do_not_repeat() {
        let keys = KeyBuilder::new("app");
        let first = keys.fresh_token("users");
        let second = keys.fresh_token("users");
        assert_ne!(first, second);
    }

    #[test]
    fn keys_are_short_ascii() {
        let keys = KeyBuilder::new("app");
        let token = keys.fresh_token("users");
        let key = keys.composite_key("users", &token, "a logical key with spaces");
        assert!(key.is_ascii());
        assert!(key.len() < 250);
    }
}
