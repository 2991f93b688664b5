//! PostgreSQL Repository Adapter
//!
//! Implements `DropRepo` from `repository.rs` using PostgresStore as the
//! backend.

use async_trait::async_trait;
use std::sync::Arc;

use super::postgres::PostgresStore;
use super::repository::*;
use crate::drops::{CreatureId, DropEntry, GlobalDropEntry};

/// Adapter wrapping PostgresStore for DropRepo
pub struct PgDropRepo {
    store: Arc<PostgresStore>,
}

impl PgDropRepo {
    pub fn new(store: Arc<PostgresStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl DropRepo for PgDropRepo {
    async fn drops_for(&self, creature_id: CreatureId) -> RepoResult<Vec<DropEntry>> {
        Ok(self.store.drops_for(creature_id).await?)
    }

    async fn global_drops(&self) -> RepoResult<Vec<GlobalDropEntry>> {
        Ok(self.store.global_drops().await?)
    }
}
