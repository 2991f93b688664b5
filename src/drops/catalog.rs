//! Per-creature drop catalog

use std::sync::Arc;
use tracing::{debug, error};

use super::types::{CreatureId, DropEntry};
use super::DropError;
use crate::memo::MemoTable;
use crate::metrics::DropCacheStats;
use crate::storage::repository::DropRepo;

/// Memoized `drop_data` rows, keyed by creature
///
/// The first lookup of a creature queries the store and publishes the rows;
/// every later lookup returns the same `Arc`. Store failures are not
/// published, so the next lookup queries again.
#[derive(Default)]
pub struct DropCatalog {
    entries: MemoTable<CreatureId, Arc<[DropEntry]>>,
}

impl DropCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog for `creature_id`, loading it on first access
    pub async fn get(
        &self,
        repo: &dyn DropRepo,
        stats: &DropCacheStats,
        creature_id: CreatureId,
    ) -> Result<Arc<[DropEntry]>, DropError> {
        if let Some(hit) = self.entries.get(creature_id) {
            stats.record_catalog_hit();
            return Ok(hit);
        }

        let mut loaded = false;
        let result = self
            .entries
            .get_or_try_init(creature_id, || {
                loaded = true;
                async move {
                    debug!(creature_id, "Drop catalog miss, querying store");
                    stats.record_catalog_load();

                    match repo.drops_for(creature_id).await {
                        Ok(rows) => {
                            debug!(creature_id, rows = rows.len(), "Drop catalog published");
                            Ok(Arc::from(rows))
                        }
                        Err(e) => {
                            stats.record_store_failure();
                            error!(creature_id, error = %e, "Error retrieving drops");
                            Err(DropError::Store(e))
                        }
                    }
                }
            })
            .await;

        // waited on another caller's load
        if result.is_ok() && !loaded {
            stats.record_catalog_hit();
        }
        result
    }

    /// Number of creatures with a published catalog
    pub fn len(&self) -> usize {
        self.entries.published()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
