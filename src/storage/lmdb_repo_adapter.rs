//! LMDB Repository Adapters
//!
//! Implements the collaborator traits from `repository.rs` on top of
//! LmdbTemplateStore. Creature lookups wrap synchronous LMDB reads in async
//! interfaces; item classification is synchronous, so the quest flags are
//! read once into memory when the adapter is built.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::info;

use super::lmdb_templates::{LmdbTemplateStore, TemplateStoreError};
use super::repository::*;
use crate::drops::{CreatureId, ItemId};

/// Name reported for creatures whose template carries none
pub const UNNAMED_CREATURE: &str = "NO-NAME";

/// Adapter exposing creature templates as factory and name directory
pub struct LmdbCreatureRepo {
    store: Arc<LmdbTemplateStore>,
}

impl LmdbCreatureRepo {
    pub fn new(store: Arc<LmdbTemplateStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl CreatureFactory for LmdbCreatureRepo {
    async fn get_creature(&self, id: CreatureId) -> RepoResult<Option<CreatureTemplate>> {
        Ok(self.store.get_creature(id)?)
    }
}

#[async_trait]
impl CreatureNameDirectory for LmdbCreatureRepo {
    async fn name_of(&self, id: CreatureId) -> RepoResult<Option<String>> {
        Ok(self
            .store
            .get_creature(id)?
            .map(|template| template.name)
            .filter(|name| !name.is_empty()))
    }

    async fn all_names(&self) -> RepoResult<Vec<(CreatureId, String)>> {
        let all = self.store.all_creatures()?;
        Ok(all
            .into_iter()
            .map(|template| {
                let name = if template.name.is_empty() {
                    UNNAMED_CREATURE.to_string()
                } else {
                    template.name
                };
                (template.id, name)
            })
            .collect())
    }
}

/// Item classifier backed by a snapshot of the item templates
pub struct LmdbItemClassifier {
    quest_items: HashSet<ItemId>,
    party_quest_items: HashSet<ItemId>,
}

impl LmdbItemClassifier {
    /// Read every item template and keep the quest flags
    pub fn load(store: &LmdbTemplateStore) -> Result<Self, TemplateStoreError> {
        let mut quest_items = HashSet::new();
        let mut party_quest_items = HashSet::new();

        for item in store.all_items()? {
            if item.quest {
                quest_items.insert(item.id);
            }
            if item.party_quest {
                party_quest_items.insert(item.id);
            }
        }

        info!(
            "Item classifier loaded: {} quest items, {} party quest items",
            quest_items.len(),
            party_quest_items.len()
        );

        Ok(Self {
            quest_items,
            party_quest_items,
        })
    }
}

impl ItemClassifier for LmdbItemClassifier {
    fn is_quest_item(&self, item_id: ItemId) -> bool {
        self.quest_items.contains(&item_id)
    }

    fn is_party_quest_item(&self, item_id: ItemId) -> bool {
        self.party_quest_items.contains(&item_id)
    }
}
