//! Cache statistics

use serde::{Deserialize, Serialize};

/// Snapshot of the facade's hit/miss counters.
///
/// Swallowed store failures count as misses, so a degraded store shows up
/// here even though callers never see an error.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CacheStats {
    /// Number of cache hits
    pub hits: u64,
    /// Number of cache misses
    pub misses: u64,
    /// Cache hit rate (0.0 to 1.0)
    pub hit_rate: f64,
}

impl CacheStats {
    pub(crate) fn from_counts(hits: u64, misses: u64) -> Self {
        let total = hits + misses;
        let hit_rate = if total > 0 {
            hits as f64 / total as f64
        } else {
            0.0
        };
        Self {
            hits,
            misses,
            hit_rate,
        }
    }
}
