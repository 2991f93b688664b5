//! In-memory backend
//!
//! Implements every collaborator trait over plain maps. Each query path keeps
//! a call counter, and `set_offline` makes every fallible query fail, so tests
//! can assert exactly how often the caches reach the store.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use super::repository::*;
use crate::drops::{CreatureId, DropEntry, GlobalDropEntry, ItemId};

#[derive(Default)]
pub struct InMemoryStore {
    drops: RwLock<HashMap<CreatureId, Vec<DropEntry>>>,
    global: RwLock<Vec<GlobalDropEntry>>,
    creatures: RwLock<BTreeMap<CreatureId, CreatureTemplate>>,
    quest_items: RwLock<HashSet<ItemId>>,
    party_quest_items: RwLock<HashSet<ItemId>>,
    offline: AtomicBool,

    drop_queries: AtomicUsize,
    global_queries: AtomicUsize,
    creature_queries: AtomicUsize,
    name_queries: AtomicUsize,
    classifications: AtomicUsize,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Content
    // ========================================================================

    pub fn set_drops(&self, creature_id: CreatureId, entries: Vec<DropEntry>) {
        self.drops.write().insert(creature_id, entries);
    }

    pub fn set_global_drops(&self, entries: Vec<GlobalDropEntry>) {
        *self.global.write() = entries;
    }

    pub fn add_creature(&self, template: CreatureTemplate) {
        self.creatures.write().insert(template.id, template);
    }

    pub fn add_item_flags(&self, item_id: ItemId, quest: bool, party_quest: bool) {
        if quest {
            self.quest_items.write().insert(item_id);
        }
        if party_quest {
            self.party_quest_items.write().insert(item_id);
        }
    }

    /// Make every store query fail until switched back
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn check_online(&self) -> RepoResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err("store offline".into());
        }
        Ok(())
    }

    // ========================================================================
    // Counters
    // ========================================================================

    /// `drops_for` calls, failed ones included
    pub fn drop_queries(&self) -> usize {
        self.drop_queries.load(Ordering::SeqCst)
    }

    pub fn global_queries(&self) -> usize {
        self.global_queries.load(Ordering::SeqCst)
    }

    pub fn creature_queries(&self) -> usize {
        self.creature_queries.load(Ordering::SeqCst)
    }

    /// `name_of` calls
    pub fn name_queries(&self) -> usize {
        self.name_queries.load(Ordering::SeqCst)
    }

    /// `is_equipment` calls
    pub fn classifications(&self) -> usize {
        self.classifications.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DropRepo for InMemoryStore {
    async fn drops_for(&self, creature_id: CreatureId) -> RepoResult<Vec<DropEntry>> {
        self.drop_queries.fetch_add(1, Ordering::SeqCst);
        self.check_online()?;
        Ok(self.drops.read().get(&creature_id).cloned().unwrap_or_default())
    }

    async fn global_drops(&self) -> RepoResult<Vec<GlobalDropEntry>> {
        self.global_queries.fetch_add(1, Ordering::SeqCst);
        self.check_online()?;
        Ok(self
            .global
            .read()
            .iter()
            .filter(|entry| entry.chance > 0)
            .copied()
            .collect())
    }
}

#[async_trait]
impl CreatureFactory for InMemoryStore {
    async fn get_creature(&self, id: CreatureId) -> RepoResult<Option<CreatureTemplate>> {
        self.creature_queries.fetch_add(1, Ordering::SeqCst);
        self.check_online()?;
        Ok(self.creatures.read().get(&id).cloned())
    }
}

#[async_trait]
impl CreatureNameDirectory for InMemoryStore {
    async fn name_of(&self, id: CreatureId) -> RepoResult<Option<String>> {
        self.name_queries.fetch_add(1, Ordering::SeqCst);
        self.check_online()?;
        Ok(self
            .creatures
            .read()
            .get(&id)
            .map(|template| template.name.clone())
            .filter(|name| !name.is_empty()))
    }

    async fn all_names(&self) -> RepoResult<Vec<(CreatureId, String)>> {
        self.check_online()?;
        Ok(self
            .creatures
            .read()
            .values()
            .map(|template| (template.id, template.name.clone()))
            .collect())
    }
}

impl ItemClassifier for InMemoryStore {
    fn is_quest_item(&self, item_id: ItemId) -> bool {
        self.quest_items.read().contains(&item_id)
    }

    fn is_party_quest_item(&self, item_id: ItemId) -> bool {
        self.party_quest_items.read().contains(&item_id)
    }

    fn is_equipment(&self, item_id: ItemId) -> bool {
        self.classifications.fetch_add(1, Ordering::SeqCst);
        item_id > 0 && item_id < 2_000_000
    }
}
