//! World-wide bonus drops and their per-region views

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{error, info};

use super::types::{region_of, GlobalDropEntry, MapId, RegionId};
use crate::metrics::DropCacheStats;
use crate::storage::repository::DropRepo;

/// Global drop table plus memoized per-region filtered views
pub struct GlobalDropMerger {
    entries: Arc<[GlobalDropEntry]>,
    by_region: RwLock<HashMap<RegionId, Arc<[GlobalDropEntry]>>>,
}

impl GlobalDropMerger {
    /// Load `drop_data_global` from the store
    ///
    /// A failed load is logged and yields an empty table; the next reset
    /// retries.
    pub async fn load(repo: &dyn DropRepo, stats: &DropCacheStats) -> Self {
        stats.record_global_load();
        match repo.global_drops().await {
            Ok(rows) => {
                let merger = Self::from_entries(rows);
                info!(global_drops = merger.len(), "Global drop table loaded");
                merger
            }
            Err(e) => {
                stats.record_store_failure();
                error!(error = %e, "Error retrieving global drops");
                Self::from_entries(Vec::new())
            }
        }
    }

    /// Build from already-loaded rows (rows without a positive chance are dropped)
    pub fn from_entries(mut rows: Vec<GlobalDropEntry>) -> Self {
        rows.retain(|entry| entry.chance > 0);
        Self {
            entries: Arc::from(rows),
            by_region: RwLock::new(HashMap::new()),
        }
    }

    /// Global drops relevant to `map_id`, in table order
    pub fn relevant(&self, map_id: MapId) -> Arc<[GlobalDropEntry]> {
        let region = region_of(map_id);

        if let Some(view) = self.by_region.read().get(&region) {
            return view.clone();
        }

        self.by_region
            .write()
            .entry(region)
            .or_insert_with(|| {
                self.entries
                    .iter()
                    .filter(|entry| entry.applies_to(region))
                    .copied()
                    .collect()
            })
            .clone()
    }

    /// Every loaded global entry
    pub fn entries(&self) -> &[GlobalDropEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Regions with a memoized view
    pub fn cached_regions(&self) -> usize {
        self.by_region.read().len()
    }
}
