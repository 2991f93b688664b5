//! Drop-related type definitions

use serde::{Deserialize, Serialize};

/// Creature template identifier
pub type CreatureId = i32;
/// Item identifier
pub type ItemId = i32;
/// Map identifier
pub type MapId = i32;
/// Coarse world-area identifier derived from a map id
pub type RegionId = i8;

/// Maps per region (`map_id / 100_000_000`)
pub const MAPS_PER_REGION: MapId = 100_000_000;

/// Region a map belongs to
pub fn region_of(map_id: MapId) -> RegionId {
    (map_id / MAPS_PER_REGION) as RegionId
}

/// One possible loot outcome of a creature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DropEntry {
    pub item_id: ItemId,
    /// Relative drop weight (chance column)
    pub chance: i32,
    pub min_quantity: i32,
    pub max_quantity: i32,
    /// Quest restriction (0 = unrestricted)
    pub quest_id: i32,
}

impl DropEntry {
    pub fn new(item_id: ItemId, chance: i32, min_quantity: i32, max_quantity: i32, quest_id: i32) -> Self {
        Self {
            item_id,
            chance,
            min_quantity,
            max_quantity,
            quest_id,
        }
    }
}

/// World-wide bonus drop, optionally scoped to one region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GlobalDropEntry {
    pub item_id: ItemId,
    pub chance: i32,
    /// Region scope (negative = every region)
    pub region: RegionId,
    pub min_quantity: i32,
    pub max_quantity: i32,
    pub quest_id: i32,
}

impl GlobalDropEntry {
    /// Whether this entry applies to `region`
    pub fn applies_to(&self, region: RegionId) -> bool {
        self.region < 0 || self.region == region
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_of() {
        assert_eq!(region_of(0), 0);
        assert_eq!(region_of(50_000_000), 0);
        assert_eq!(region_of(100_000_000), 1);
        assert_eq!(region_of(250_000_000), 2);
        assert_eq!(region_of(999_999_999), 9);
    }

    #[test]
    fn test_global_entry_scope() {
        let everywhere = GlobalDropEntry {
            item_id: 4_001_126,
            chance: 10,
            region: -1,
            min_quantity: 1,
            max_quantity: 1,
            quest_id: 0,
        };
        let region_two = GlobalDropEntry { region: 2, ..everywhere };

        assert!(everywhere.applies_to(0));
        assert!(everywhere.applies_to(7));
        assert!(region_two.applies_to(2));
        assert!(!region_two.applies_to(0));
    }
}
