//! Drop resolution service
//!
//! Owns every memoized drop view and the cache invalidation entry point.
//!
//! ## Epochs
//! ```text
//! DropResolver
//!   └─ RwLock<Arc<DropEpoch>>   ← swapped wholesale by reset()
//!        ├─ DropCatalog         (creature → drop_data rows)
//!        ├─ sampling pools      (creature → cumulative weights)
//!        ├─ multi-equip sets    (creature → qualifying entries / none)
//!        └─ GlobalDropMerger    (global rows + region views)
//! ```
//! Each public call snapshots the current epoch once, so a single call never
//! mixes data from before and after a reset.

use parking_lot::{Mutex, RwLock};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use std::sync::Arc;
use tracing::{debug, info};

use super::catalog::DropCatalog;
use super::global::GlobalDropMerger;
use super::multi_equip::{self, MultiEquipSet};
use super::pool;
use super::types::{CreatureId, DropEntry, GlobalDropEntry, MapId};
use super::DropError;
use crate::config::DropConfig;
use crate::memo::MemoTable;
use crate::metrics::{DropCacheSnapshot, DropCacheStats};
use crate::storage::repository::{DropRepo, ItemClassifier};

/// All state cleared by a reset
struct DropEpoch {
    catalog: DropCatalog,
    pools: MemoTable<CreatureId, Arc<[i32]>>,
    multi_equip: MemoTable<CreatureId, MultiEquipSet>,
    global: GlobalDropMerger,
}

impl DropEpoch {
    fn new(global: GlobalDropMerger) -> Self {
        Self {
            catalog: DropCatalog::new(),
            pools: MemoTable::default(),
            multi_equip: MemoTable::default(),
            global,
        }
    }
}

/// Shared drop resolution service (one per process, passed around in an `Arc`)
pub struct DropResolver {
    repo: Arc<dyn DropRepo>,
    classifier: Arc<dyn ItemClassifier>,
    config: DropConfig,
    epoch: RwLock<Arc<DropEpoch>>,
    /// Serializes concurrent resets
    reset_lock: tokio::sync::Mutex<()>,
    rng: Mutex<Xoshiro256PlusPlus>,
    stats: DropCacheStats,
}

impl DropResolver {
    /// Create the resolver and load the global drop table
    pub async fn new(
        repo: Arc<dyn DropRepo>,
        classifier: Arc<dyn ItemClassifier>,
        config: DropConfig,
    ) -> Self {
        let seed: u64 = rand::thread_rng().gen();
        Self::with_rng(repo, classifier, config, Xoshiro256PlusPlus::seed_from_u64(seed)).await
    }

    /// Create the resolver with an explicit random source (deterministic tests)
    pub async fn with_rng(
        repo: Arc<dyn DropRepo>,
        classifier: Arc<dyn ItemClassifier>,
        config: DropConfig,
        rng: Xoshiro256PlusPlus,
    ) -> Self {
        let stats = DropCacheStats::default();
        let global = GlobalDropMerger::load(repo.as_ref(), &stats).await;

        info!(
            "DropResolver initialized: {} global drops, multi-equip drops {}",
            global.len(),
            if config.multi_equip_drops { "enabled" } else { "disabled" }
        );

        Self {
            repo,
            classifier,
            config,
            epoch: RwLock::new(Arc::new(DropEpoch::new(global))),
            reset_lock: tokio::sync::Mutex::new(()),
            rng: Mutex::new(rng),
            stats,
        }
    }

    fn current(&self) -> Arc<DropEpoch> {
        self.epoch.read().clone()
    }

    async fn catalog_in(&self, epoch: &DropEpoch, creature_id: CreatureId) -> Result<Arc<[DropEntry]>, DropError> {
        epoch.catalog.get(self.repo.as_ref(), &self.stats, creature_id).await
    }

    async fn pool_in(&self, epoch: &DropEpoch, creature_id: CreatureId) -> Arc<[i32]> {
        epoch
            .pools
            .get_or_try_init(creature_id, || async {
                let catalog = self.catalog_in(epoch, creature_id).await?;
                Ok::<_, DropError>(pool::build_sampling_pool(&catalog, self.classifier.as_ref()))
            })
            .await
            .unwrap_or_else(|_| Arc::from(Vec::new()))
    }

    // ========================================================================
    // Public surface
    // ========================================================================

    /// Raw `drop_data` rows for a creature (empty on store failure, retried next call)
    pub async fn catalog(&self, creature_id: CreatureId) -> Arc<[DropEntry]> {
        let epoch = self.current();
        self.catalog_in(&epoch, creature_id)
            .await
            .unwrap_or_else(|_| Arc::from(Vec::new()))
    }

    /// Global drops that apply to the region containing `map_id`
    pub fn relevant_global_drops(&self, map_id: MapId) -> Arc<[GlobalDropEntry]> {
        self.current().global.relevant(map_id)
    }

    /// Catalog plus freshly rolled multi-equip copies
    ///
    /// The catalog prefix is stable between resets; only the appended copies
    /// vary from call to call.
    pub async fn effective_drops(&self, creature_id: CreatureId) -> Vec<DropEntry> {
        let epoch = self.current();
        let catalog = match self.catalog_in(&epoch, creature_id).await {
            Ok(catalog) => catalog,
            Err(_) => return Vec::new(),
        };

        if !self.config.multi_equip_drops {
            return catalog.to_vec();
        }

        let set = match epoch.multi_equip.get(creature_id) {
            Some(set) => set,
            None => {
                epoch
                    .multi_equip
                    .get_or_init(creature_id, || async {
                        let set = MultiEquipSet::from_catalog(&catalog, self.classifier.as_ref());
                        if set.is_empty() {
                            debug!(creature_id, "No multi-equip drops");
                        }
                        set
                    })
                    .await
            }
        };

        let entries = match set {
            MultiEquipSet::NoMultiEquip => return catalog.to_vec(),
            MultiEquipSet::Entries(entries) => entries,
        };

        let extra = {
            let mut rng = self.rng.lock();
            multi_equip::expand(&entries, &mut *rng)
        };

        let mut drops = Vec::with_capacity(catalog.len() + extra.len());
        drops.extend_from_slice(&catalog);
        drops.extend(extra);
        drops
    }

    /// Droppable item weighting: cumulative weights aligned with the catalog
    ///
    /// Empty when no catalog entry carries sampleable weight.
    pub async fn sampling_pool(&self, creature_id: CreatureId) -> Arc<[i32]> {
        let epoch = self.current();
        self.pool_in(&epoch, creature_id).await
    }

    /// Weighted random pick of one catalog entry (quest items excluded)
    pub async fn roll_drop(&self, creature_id: CreatureId) -> Option<DropEntry> {
        let epoch = self.current();
        let pool = self.pool_in(&epoch, creature_id).await;
        let total = pool::total_weight(&pool);
        if total <= 0 {
            return None;
        }

        let catalog = self.catalog_in(&epoch, creature_id).await.ok()?;
        let roll = self.rng.lock().gen_range(0..total);
        pool::pick_weighted(&pool, roll).and_then(|index| catalog.get(index).copied())
    }

    /// Drop every memoized view and reload the global table
    ///
    /// Creature facts and combat metadata are not touched.
    pub async fn reset(&self) {
        let _guard = self.reset_lock.lock().await;
        info!("Clearing drop caches...");

        let global = GlobalDropMerger::load(self.repo.as_ref(), &self.stats).await;
        let global_count = global.len();
        *self.epoch.write() = Arc::new(DropEpoch::new(global));

        self.stats.record_reset();
        info!(global_drops = global_count, "Drop caches cleared and global table reloaded");
    }

    // ========================================================================
    // Introspection
    // ========================================================================

    /// Creatures with a published catalog in the current epoch
    pub fn cached_creatures(&self) -> usize {
        self.current().catalog.len()
    }

    /// Number of loaded global drops
    pub fn global_drop_count(&self) -> usize {
        self.current().global.len()
    }

    pub fn config(&self) -> DropConfig {
        self.config
    }

    pub fn stats(&self) -> DropCacheSnapshot {
        self.stats.snapshot()
    }
}
