//! Cumulative-weight sampling pools
//!
//! A pool has one cumulative value per catalog entry, so a drawn position maps
//! straight back to the catalog. Quest and party-quest items occupy a position
//! but add no weight.

use std::sync::Arc;
use tracing::warn;

use super::types::DropEntry;
use crate::storage::repository::ItemClassifier;

/// Build the sampling pool for a catalog
///
/// Returns an empty pool when nothing in the catalog carries weight.
pub fn build_sampling_pool(catalog: &[DropEntry], classifier: &dyn ItemClassifier) -> Arc<[i32]> {
    let mut pool = Vec::with_capacity(catalog.len());
    let mut accumulated: i32 = 0;
    let mut saturated = false;

    for entry in catalog {
        if !classifier.is_quest_item(entry.item_id) && !classifier.is_party_quest_item(entry.item_id) {
            let weight = entry.chance.max(0);
            accumulated = accumulated.checked_add(weight).unwrap_or_else(|| {
                saturated = true;
                i32::MAX
            });
        }
        pool.push(accumulated);
    }

    if saturated {
        warn!(
            entries = catalog.len(),
            "Drop weights overflow i32, sampling pool capped at i32::MAX"
        );
    }

    if accumulated == 0 {
        pool.clear();
    }
    Arc::from(pool)
}

/// Total weight of a pool
pub fn total_weight(pool: &[i32]) -> i32 {
    pool.last().copied().unwrap_or(0)
}

/// Catalog position selected by `roll` (expected in `0..total_weight(pool)`)
pub fn pick_weighted(pool: &[i32], roll: i32) -> Option<usize> {
    if roll < 0 || roll >= total_weight(pool) {
        return None;
    }
    Some(pool.partition_point(|&cumulative| cumulative <= roll))
}
