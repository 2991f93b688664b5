//! Repository traits - abstraction layer for data access
//!
//! The drop caches talk to every external collaborator through these traits,
//! making it easy to swap storage backends (PostgreSQL, LMDB, in-memory fakes).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::error::Error;

use crate::drops::{CreatureId, DropEntry, GlobalDropEntry, ItemId};

/// Generic result type for repository operations
pub type RepoResult<T> = Result<T, Box<dyn Error + Send + Sync>>;

// ============================================================================
// Template types (static content)
// ============================================================================

/// Creature template as stored in the static content store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatureTemplate {
    pub id: CreatureId,
    /// Localized display name (may be empty)
    pub name: String,
    pub is_boss: bool,
}

/// Item template subset needed for drop classification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemTemplate {
    pub id: ItemId,
    pub name: String,
    /// Only obtainable while a quest is active
    pub quest: bool,
    /// Party quest item
    pub party_quest: bool,
}

// ============================================================================
// Drop tables (PostgreSQL-backed)
// ============================================================================

/// Read access to `drop_data` / `drop_data_global`
#[async_trait]
pub trait DropRepo: Send + Sync {
    /// All rows of `drop_data` owned by `creature_id`, in load order
    async fn drops_for(&self, creature_id: CreatureId) -> RepoResult<Vec<DropEntry>>;
    /// All rows of `drop_data_global` with a positive chance
    async fn global_drops(&self) -> RepoResult<Vec<GlobalDropEntry>>;
}

// ============================================================================
// Static content (LMDB-backed)
// ============================================================================

/// Answers "does creature X exist, and what is it"
#[async_trait]
pub trait CreatureFactory: Send + Sync {
    async fn get_creature(&self, id: CreatureId) -> RepoResult<Option<CreatureTemplate>>;
}

/// Localized creature names
#[async_trait]
pub trait CreatureNameDirectory: Send + Sync {
    async fn name_of(&self, id: CreatureId) -> RepoResult<Option<String>>;
    /// Every known creature with its display name
    async fn all_names(&self) -> RepoResult<Vec<(CreatureId, String)>>;
}

/// Item classification predicates used while building drop views
pub trait ItemClassifier: Send + Sync {
    fn is_quest_item(&self, item_id: ItemId) -> bool;
    fn is_party_quest_item(&self, item_id: ItemId) -> bool;

    /// Equipment lives in the 1xxxxxx item id range
    fn is_equipment(&self, item_id: ItemId) -> bool {
        item_id > 0 && item_id < 2_000_000
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NoQuests;

    impl ItemClassifier for NoQuests {
        fn is_quest_item(&self, _item_id: ItemId) -> bool {
            false
        }
        fn is_party_quest_item(&self, _item_id: ItemId) -> bool {
            false
        }
    }

    #[test]
    fn test_default_equipment_range() {
        let c = NoQuests;
        assert!(c.is_equipment(1_302_000));
        assert!(c.is_equipment(1));
        assert!(!c.is_equipment(0));
        assert!(!c.is_equipment(2_000_000));
        assert!(!c.is_equipment(4_000_019));
        assert!(!c.is_equipment(-5));
    }
}
