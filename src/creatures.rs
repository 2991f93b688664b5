//! Creature fact cache
//!
//! Boss flags and display names are looked up lazily through the creature
//! collaborators and memoized for the life of the process. `DropResolver::reset`
//! does not touch these; nonexistence is stable, so the defaults for unknown
//! creatures are memoized too.

use std::sync::Arc;
use tracing::{debug, warn};

use crate::drops::CreatureId;
use crate::memo::MemoTable;
use crate::storage::repository::{CreatureFactory, CreatureNameDirectory};

pub struct CreatureFacts {
    factory: Arc<dyn CreatureFactory>,
    names: Arc<dyn CreatureNameDirectory>,
    bosses: MemoTable<CreatureId, bool>,
    display_names: MemoTable<CreatureId, Arc<str>>,
}

impl CreatureFacts {
    pub fn new(factory: Arc<dyn CreatureFactory>, names: Arc<dyn CreatureNameDirectory>) -> Self {
        Self {
            factory,
            names,
            bosses: MemoTable::default(),
            display_names: MemoTable::default(),
        }
    }

    /// Whether `creature_id` is a boss
    ///
    /// Unknown creatures and lookup failures both answer `false`, and that
    /// answer is memoized.
    pub async fn is_boss(&self, creature_id: CreatureId) -> bool {
        if let Some(hit) = self.bosses.get(creature_id) {
            return hit;
        }

        self.bosses
            .get_or_init(creature_id, || async {
                match self.factory.get_creature(creature_id).await {
                    Ok(Some(template)) => template.is_boss,
                    Ok(None) => {
                        warn!(creature_id, "Non-existent creature id in boss lookup");
                        false
                    }
                    Err(e) => {
                        warn!(creature_id, error = %e, "Non-existent creature id in boss lookup");
                        false
                    }
                }
            })
            .await
    }

    /// Localized display name, empty when the creature has none
    ///
    /// A missing name is memoized as empty; a directory failure answers empty
    /// without memoizing so a later call retries.
    pub async fn display_name(&self, creature_id: CreatureId) -> Arc<str> {
        if let Some(hit) = self.display_names.get(creature_id) {
            return hit;
        }

        let loaded = self
            .display_names
            .get_or_try_init(creature_id, || async {
                debug!(creature_id, "Display name miss, querying directory");
                self.names
                    .name_of(creature_id)
                    .await
                    .map(|name| Arc::<str>::from(name.unwrap_or_default()))
            })
            .await;

        match loaded {
            Ok(name) => name,
            Err(e) => {
                warn!(creature_id, error = %e, "Error retrieving creature name");
                Arc::from("")
            }
        }
    }

    /// Every creature whose name contains `text`, ignoring case
    ///
    /// Scans the full directory on every call. A directory failure yields an
    /// empty result.
    pub async fn search_by_name(&self, text: &str) -> Vec<(CreatureId, String)> {
        let needle = text.to_lowercase();

        let all = match self.names.all_names().await {
            Ok(all) => all,
            Err(e) => {
                warn!(error = %e, "Error enumerating creature names");
                return Vec::new();
            }
        };

        all.into_iter()
            .filter(|(_, name)| name.to_lowercase().contains(&needle))
            .collect()
    }

    /// Boss flags memoized so far
    pub fn cached_boss_flags(&self) -> usize {
        self.bosses.published()
    }

    /// Display names memoized so far
    pub fn cached_names(&self) -> usize {
        self.display_names.published()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::memory::InMemoryStore;
    use crate::storage::repository::CreatureTemplate;

    fn store() -> Arc<InMemoryStore> {
        let store = InMemoryStore::new();
        store.add_creature(CreatureTemplate {
            id: 100_100,
            name: "Snail".into(),
            is_boss: false,
        });
        store.add_creature(CreatureTemplate {
            id: 8_800_000,
            name: "Zakum".into(),
            is_boss: true,
        });
        store.add_creature(CreatureTemplate {
            id: 100_101,
            name: "Blue Snail".into(),
            is_boss: false,
        });
        Arc::new(store)
    }

    fn facts(store: &Arc<InMemoryStore>) -> CreatureFacts {
        CreatureFacts::new(store.clone(), store.clone())
    }

    #[tokio::test]
    async fn test_boss_flag() {
        let store = store();
        let facts = facts(&store);
        assert!(facts.is_boss(8_800_000).await);
        assert!(!facts.is_boss(100_100).await);
        assert_eq!(facts.cached_boss_flags(), 2);
    }

    #[tokio::test]
    async fn test_unknown_creature_not_boss_and_memoized() {
        let store = store();
        let facts = facts(&store);

        assert!(!facts.is_boss(999).await);
        assert!(!facts.is_boss(999).await);
        assert_eq!(store.creature_queries(), 1);
    }

    #[tokio::test]
    async fn test_boss_lookup_failure_memoized_as_false() {
        let store = store();
        store.set_offline(true);
        let facts = facts(&store);

        assert!(!facts.is_boss(8_800_000).await);
        store.set_offline(false);
        assert!(!facts.is_boss(8_800_000).await);
        assert_eq!(store.creature_queries(), 1);
    }

    #[tokio::test]
    async fn test_display_name() {
        let store = store();
        let facts = facts(&store);

        assert_eq!(&*facts.display_name(100_100).await, "Snail");
        assert_eq!(&*facts.display_name(100_100).await, "Snail");
        assert_eq!(&*facts.display_name(42).await, "");
        assert_eq!(&*facts.display_name(42).await, "");
        assert_eq!(store.name_queries(), 2);
    }

    #[tokio::test]
    async fn test_display_name_failure_retried() {
        let store = store();
        let facts = facts(&store);

        store.set_offline(true);
        assert_eq!(&*facts.display_name(100_100).await, "");
        assert_eq!(facts.cached_names(), 0);

        store.set_offline(false);
        assert_eq!(&*facts.display_name(100_100).await, "Snail");
        assert_eq!(store.name_queries(), 2);
    }

    #[tokio::test]
    async fn test_search_case_insensitive() {
        let store = store();
        let facts = facts(&store);

        let mut found = facts.search_by_name("SNAIL").await;
        found.sort();
        assert_eq!(
            found,
            vec![(100_100, "Snail".to_string()), (100_101, "Blue Snail".to_string())]
        );
        assert!(facts.search_by_name("balrog").await.is_empty());
    }
}
