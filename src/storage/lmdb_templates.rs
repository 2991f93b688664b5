//! LMDB Template Store - Persistent storage for static creature/item data
//!
//! Creature templates (name, boss flag) and item templates (quest flags) are
//! loaded once at startup and rarely change. Keys are big-endian `i32` ids so
//! iteration follows id order; values are bincode-encoded templates.
//!
//! ## Performance
//! - Read: memory-mapped, zero-copy until decode
//! - Write: one ACID transaction per call (use the bulk variants when seeding)

use heed::byteorder::BigEndian;
use heed::types::{Bytes, I32};
use heed::{Database, Env, EnvOpenOptions};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

use super::repository::{CreatureTemplate, ItemTemplate};
use crate::drops::{CreatureId, ItemId};

/// Id-keyed template database
pub type TemplateDb = Database<I32<BigEndian>, Bytes>;

/// LMDB-backed template store for creature and item data
pub struct LmdbTemplateStore {
    env: Arc<Env>,
    /// Database for creature templates
    pub creatures: TemplateDb,
    /// Database for item templates
    pub items: TemplateDb,
}

/// Error type for LMDB template operations
#[derive(Debug, thiserror::Error)]
pub enum TemplateStoreError {
    #[error("LMDB error: {0}")]
    Heed(#[from] heed::Error),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<bincode::Error> for TemplateStoreError {
    fn from(e: bincode::Error) -> Self {
        TemplateStoreError::Serialization(e.to_string())
    }
}

impl LmdbTemplateStore {
    /// Open or create the template store
    ///
    /// # Arguments
    /// * `path` - Directory for LMDB data files
    /// * `max_size` - Maximum map size in bytes, a multiple of the OS page size
    pub fn new<P: AsRef<Path>>(path: P, max_size: usize) -> Result<Self, TemplateStoreError> {
        std::fs::create_dir_all(&path)?;

        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(max_size)
                .max_dbs(2)
                .open(path)?
        };

        let mut wtxn = env.write_txn()?;
        let creatures = env.create_database::<I32<BigEndian>, Bytes>(&mut wtxn, Some("creatures"))?;
        let items = env.create_database::<I32<BigEndian>, Bytes>(&mut wtxn, Some("items"))?;
        wtxn.commit()?;

        info!("LMDB template store initialized ({}MB)", max_size / (1024 * 1024));

        Ok(Self {
            env: Arc::new(env),
            creatures,
            items,
        })
    }

    // ========================================================================
    // Generic operations
    // ========================================================================

    pub fn put<T: Serialize>(&self, db: TemplateDb, id: i32, value: &T) -> Result<(), TemplateStoreError> {
        let bytes = bincode::serialize(value)?;
        let mut wtxn = self.env.write_txn()?;
        db.put(&mut wtxn, &id, &bytes)?;
        wtxn.commit()?;
        debug!(id, "Stored template");
        Ok(())
    }

    pub fn get<T: DeserializeOwned>(&self, db: TemplateDb, id: i32) -> Result<Option<T>, TemplateStoreError> {
        let rtxn = self.env.read_txn()?;
        match db.get(&rtxn, &id)? {
            Some(bytes) => Ok(Some(bincode::deserialize(bytes)?)),
            None => Ok(None),
        }
    }

    /// Every entry of a database, in id order
    pub fn get_all<T: DeserializeOwned>(&self, db: TemplateDb) -> Result<Vec<T>, TemplateStoreError> {
        let rtxn = self.env.read_txn()?;
        let mut results = Vec::new();
        for item in db.iter(&rtxn)? {
            let (_, bytes) = item?;
            results.push(bincode::deserialize(bytes)?);
        }
        Ok(results)
    }

    /// Insert many templates in a single transaction
    pub fn bulk_put<T: Serialize>(&self, db: TemplateDb, items: &[(i32, &T)]) -> Result<usize, TemplateStoreError> {
        let mut wtxn = self.env.write_txn()?;
        for (id, value) in items {
            let bytes = bincode::serialize(value)?;
            db.put(&mut wtxn, id, &bytes)?;
        }
        wtxn.commit()?;
        info!("Bulk inserted {} templates", items.len());
        Ok(items.len())
    }

    pub fn delete(&self, db: TemplateDb, id: i32) -> Result<bool, TemplateStoreError> {
        let mut wtxn = self.env.write_txn()?;
        let deleted = db.delete(&mut wtxn, &id)?;
        wtxn.commit()?;
        Ok(deleted)
    }

    pub fn count(&self, db: TemplateDb) -> Result<usize, TemplateStoreError> {
        let rtxn = self.env.read_txn()?;
        Ok(db.len(&rtxn)? as usize)
    }

    // ========================================================================
    // Typed accessors
    // ========================================================================

    pub fn put_creature(&self, template: &CreatureTemplate) -> Result<(), TemplateStoreError> {
        self.put(self.creatures, template.id, template)
    }

    pub fn get_creature(&self, id: CreatureId) -> Result<Option<CreatureTemplate>, TemplateStoreError> {
        self.get(self.creatures, id)
    }

    pub fn all_creatures(&self) -> Result<Vec<CreatureTemplate>, TemplateStoreError> {
        self.get_all(self.creatures)
    }

    pub fn put_item(&self, template: &ItemTemplate) -> Result<(), TemplateStoreError> {
        self.put(self.items, template.id, template)
    }

    pub fn get_item(&self, id: ItemId) -> Result<Option<ItemTemplate>, TemplateStoreError> {
        self.get(self.items, id)
    }

    pub fn all_items(&self) -> Result<Vec<ItemTemplate>, TemplateStoreError> {
        self.get_all(self.items)
    }

    pub fn stats(&self) -> Result<TemplateStoreStats, TemplateStoreError> {
        Ok(TemplateStoreStats {
            creatures: self.count(self.creatures)?,
            items: self.count(self.items)?,
        })
    }
}

/// Statistics for the template store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateStoreStats {
    pub creatures: usize,
    pub items: usize,
}

impl TemplateStoreStats {
    pub fn total(&self) -> usize {
        self.creatures + self.items
    }

    pub fn summary(&self) -> String {
        format!(
            "Template Store ({} total): {} creatures, {} items",
            self.total(),
            self.creatures,
            self.items
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open() -> (tempfile::TempDir, LmdbTemplateStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = LmdbTemplateStore::new(dir.path(), 10 * 1024 * 1024).unwrap();
        (dir, store)
    }

    #[test]
    fn test_template_store_creation() {
        let (_dir, store) = open();
        assert_eq!(store.stats().unwrap().total(), 0);
    }

    #[test]
    fn test_creature_template_crud() {
        let (_dir, store) = open();

        let zakum = CreatureTemplate {
            id: 8_800_000,
            name: "Zakum".to_string(),
            is_boss: true,
        };
        store.put_creature(&zakum).unwrap();

        assert_eq!(store.get_creature(8_800_000).unwrap(), Some(zakum));
        assert_eq!(store.count(store.creatures).unwrap(), 1);

        assert!(store.delete(store.creatures, 8_800_000).unwrap());
        assert!(store.get_creature(8_800_000).unwrap().is_none());
    }

    #[test]
    fn test_bulk_put_and_id_order() {
        let (_dir, store) = open();

        let items: Vec<ItemTemplate> = [4_031_013, 1_302_000, 2_000_000]
            .into_iter()
            .map(|id| ItemTemplate {
                id,
                name: format!("Item #{id}"),
                quest: false,
                party_quest: false,
            })
            .collect();
        let refs: Vec<(i32, &ItemTemplate)> = items.iter().map(|item| (item.id, item)).collect();

        assert_eq!(store.bulk_put(store.items, &refs).unwrap(), 3);

        let ids: Vec<i32> = store.all_items().unwrap().iter().map(|item| item.id).collect();
        assert_eq!(ids, vec![1_302_000, 2_000_000, 4_031_013]);
    }
}
