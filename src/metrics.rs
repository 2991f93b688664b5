//! Drop cache metrics: lock-free counters with a serializable snapshot
//!
//! Uses atomics for all counters. Counters survive `DropResolver::reset`;
//! only the memoized data is dropped.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Shared counters for the drop resolution caches
#[derive(Debug, Default)]
pub struct DropCacheStats {
    /// Catalog lookups answered from memory
    pub catalog_hits: AtomicU64,
    /// Catalog lookups that queried the backing store
    pub catalog_loads: AtomicU64,
    /// Backing store queries that failed (never memoized)
    pub store_failures: AtomicU64,
    /// Global table loads (construction + every reset)
    pub global_loads: AtomicU64,
    /// Completed resets
    pub resets: AtomicU64,
}

impl DropCacheStats {
    pub fn record_catalog_hit(&self) {
        self.catalog_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_catalog_load(&self) {
        self.catalog_loads.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_store_failure(&self) {
        self.store_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_global_load(&self) {
        self.global_loads.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_reset(&self) {
        self.resets.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> DropCacheSnapshot {
        DropCacheSnapshot {
            catalog_hits: self.catalog_hits.load(Ordering::Relaxed),
            catalog_loads: self.catalog_loads.load(Ordering::Relaxed),
            store_failures: self.store_failures.load(Ordering::Relaxed),
            global_loads: self.global_loads.load(Ordering::Relaxed),
            resets: self.resets.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`DropCacheStats`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DropCacheSnapshot {
    pub catalog_hits: u64,
    pub catalog_loads: u64,
    pub store_failures: u64,
    pub global_loads: u64,
    pub resets: u64,
}

impl DropCacheSnapshot {
    /// Catalog hit rate in percent
    pub fn catalog_hit_rate(&self) -> f32 {
        let total = self.catalog_hits + self.catalog_loads;
        if total == 0 {
            0.0
        } else {
            (self.catalog_hits as f32 / total as f32) * 100.0
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_rate() {
        let stats = DropCacheStats::default();
        assert_eq!(stats.snapshot().catalog_hit_rate(), 0.0);

        stats.record_catalog_load();
        stats.record_catalog_hit();
        stats.record_catalog_hit();
        stats.record_catalog_hit();
        assert_eq!(stats.snapshot().catalog_hit_rate(), 75.0);
    }

    #[test]
    fn test_snapshot_json() {
        let stats = DropCacheStats::default();
        stats.record_reset();
        stats.record_global_load();
        let json = stats.snapshot().to_json();
        assert!(json.contains("\"resets\":1"));
        assert!(json.contains("\"global_loads\":1"));
    }
}
