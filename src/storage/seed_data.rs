//! Seed Data - Initial creature and item templates for LMDB
//!
//! Gives a fresh install something to resolve against. Seeding is a bulk put,
//! so running it again just rewrites the same records.

use super::lmdb_templates::{LmdbTemplateStore, TemplateStoreError};
use super::repository::{CreatureTemplate, ItemTemplate};
use tracing::info;

/// Seed all template databases with initial data
pub fn seed_all(store: &LmdbTemplateStore) -> Result<(), TemplateStoreError> {
    let mut total = 0;
    total += seed_creatures(store)?;
    total += seed_items(store)?;

    info!("Seeded {} total templates", total);
    Ok(())
}

fn creature(id: i32, name: &str, is_boss: bool) -> CreatureTemplate {
    CreatureTemplate {
        id,
        name: name.into(),
        is_boss,
    }
}

fn item(id: i32, name: &str, quest: bool, party_quest: bool) -> ItemTemplate {
    ItemTemplate {
        id,
        name: name.into(),
        quest,
        party_quest,
    }
}

/// Creature templates
pub fn creature_templates() -> Vec<CreatureTemplate> {
    vec![
        // === Field creatures ===
        creature(100_100, "Snail", false),
        creature(100_101, "Blue Snail", false),
        creature(130_101, "Red Snail", false),
        creature(1_210_100, "Pig", false),
        creature(2_230_100, "Evil Eye", false),
        creature(9_300_018, "", false),
        // === Bosses ===
        creature(8_800_000, "Zakum", true),
        creature(8_810_018, "Horntail", true),
        creature(9_400_121, "Anego", true),
    ]
}

/// Item templates
pub fn item_templates() -> Vec<ItemTemplate> {
    vec![
        // === Equipment ===
        item(1_002_000, "Blue Bandana", false, false),
        item(1_302_000, "Sword", false, false),
        item(1_060_002, "Blue Jean Shorts", false, false),
        // === Use / etc ===
        item(2_000_000, "Red Potion", false, false),
        item(4_000_019, "Snail Shell", false, false),
        item(4_000_000, "Blue Snail Shell", false, false),
        // === Quest items ===
        item(4_031_013, "Dark Marble", true, false),
        item(4_031_161, "Piece of Ice", true, false),
        // === Party quest items ===
        item(4_001_007, "Lost Coupon", false, true),
        item(4_001_008, "Pass", false, true),
    ]
}

fn seed_creatures(store: &LmdbTemplateStore) -> Result<usize, TemplateStoreError> {
    let creatures = creature_templates();
    let refs: Vec<(i32, &CreatureTemplate)> = creatures.iter().map(|c| (c.id, c)).collect();
    store.bulk_put(store.creatures, &refs)
}

fn seed_items(store: &LmdbTemplateStore) -> Result<usize, TemplateStoreError> {
    let items = item_templates();
    let refs: Vec<(i32, &ItemTemplate)> = items.iter().map(|i| (i.id, i)).collect();
    store.bulk_put(store.items, &refs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_is_repeatable() {
        let dir = tempfile::tempdir().unwrap();
        let store = LmdbTemplateStore::new(dir.path(), 10 * 1024 * 1024).unwrap();

        seed_all(&store).unwrap();
        let first = store.stats().unwrap();
        seed_all(&store).unwrap();
        let second = store.stats().unwrap();

        assert_eq!(first, second);
        assert_eq!(first.creatures, creature_templates().len());
        assert_eq!(first.items, item_templates().len());
    }

    #[test]
    fn test_seed_contains_bosses() {
        assert!(creature_templates().iter().any(|c| c.is_boss));
        assert!(item_templates().iter().any(|i| i.quest));
        assert!(item_templates().iter().any(|i| i.party_quest));
    }
}
