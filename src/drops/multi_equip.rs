//! Multi-equip drop expansion
//!
//! An equipment entry with `max_quantity > 1` stands for several independent
//! pieces of gear. Which entries qualify is structural and memoized per
//! creature; how many copies drop is rolled fresh on every resolution.

use rand::Rng;
use std::sync::Arc;

use super::types::DropEntry;
use crate::storage::repository::ItemClassifier;

/// Memoized multi-equip classification of one creature's catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MultiEquipSet {
    /// Nothing qualifies; resolution skips expansion entirely
    NoMultiEquip,
    /// Qualifying entries, in catalog order
    Entries(Arc<[DropEntry]>),
}

impl MultiEquipSet {
    /// Scan a catalog for equipment entries with `max_quantity > 1`
    pub fn from_catalog(catalog: &[DropEntry], classifier: &dyn ItemClassifier) -> Self {
        let entries: Vec<DropEntry> = catalog
            .iter()
            .filter(|entry| classifier.is_equipment(entry.item_id) && entry.max_quantity > 1)
            .copied()
            .collect();

        if entries.is_empty() {
            MultiEquipSet::NoMultiEquip
        } else {
            MultiEquipSet::Entries(Arc::from(entries))
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, MultiEquipSet::NoMultiEquip)
    }
}

/// Roll a quantity in `[min, max]`; an inverted range collapses to `min`
pub fn roll_quantity<R: Rng + ?Sized>(rng: &mut R, min: i32, max: i32) -> i32 {
    if max <= min {
        return min;
    }
    rng.gen_range(min..=max)
}

/// Extra copies for one resolution event: `n - 1` copies of each entry,
/// with `n` rolled independently per entry
pub fn expand<R: Rng + ?Sized>(entries: &[DropEntry], rng: &mut R) -> Vec<DropEntry> {
    let mut extra = Vec::new();
    for entry in entries {
        let rolled = roll_quantity(rng, entry.min_quantity, entry.max_quantity);
        for _ in 1..rolled {
            extra.push(*entry);
        }
    }
    extra
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    struct Plain;

    impl ItemClassifier for Plain {
        fn is_quest_item(&self, _item_id: i32) -> bool {
            false
        }
        fn is_party_quest_item(&self, _item_id: i32) -> bool {
            false
        }
    }

    #[test]
    fn test_only_multi_quantity_equipment_qualifies() {
        let catalog = [
            DropEntry::new(1_302_000, 50, 1, 3, 0), // equipment, multi
            DropEntry::new(1_060_002, 50, 1, 1, 0), // equipment, single
            DropEntry::new(4_000_019, 50, 1, 5, 0), // etc item, multi
        ];
        match MultiEquipSet::from_catalog(&catalog, &Plain) {
            MultiEquipSet::Entries(entries) => {
                assert_eq!(entries.len(), 1);
                assert_eq!(entries[0].item_id, 1_302_000);
            }
            MultiEquipSet::NoMultiEquip => panic!("sword entry should qualify"),
        }
    }

    #[test]
    fn test_no_qualifying_entries() {
        let catalog = [DropEntry::new(4_000_019, 50, 1, 5, 0)];
        assert!(MultiEquipSet::from_catalog(&catalog, &Plain).is_empty());
        assert!(MultiEquipSet::from_catalog(&[], &Plain).is_empty());
    }

    #[test]
    fn test_roll_quantity_bounds() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(7);
        for _ in 0..500 {
            let n = roll_quantity(&mut rng, 2, 4);
            assert!((2..=4).contains(&n));
        }
        assert_eq!(roll_quantity(&mut rng, 3, 3), 3);
        assert_eq!(roll_quantity(&mut rng, 5, 1), 5);
    }

    #[test]
    fn test_expand_copy_counts() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(11);
        let sword = DropEntry::new(1_302_000, 50, 1, 3, 0);
        let mut seen = [false; 3];
        for _ in 0..500 {
            let extra = expand(&[sword], &mut rng);
            assert!(extra.len() <= 2);
            assert!(extra.iter().all(|e| *e == sword));
            seen[extra.len()] = true;
        }
        assert_eq!(seen, [true, true, true], "0, 1 and 2 extra copies should all occur");
    }

    #[test]
    fn test_expand_fixed_quantity() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(3);
        let helm = DropEntry::new(1_002_000, 10, 4, 4, 0);
        assert_eq!(expand(&[helm], &mut rng).len(), 3);
    }
}
