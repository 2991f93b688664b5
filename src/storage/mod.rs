//! Storage Layer - Data access for the drop server
//!
//! Implements the Repository pattern over two stores:
//! - **LMDB**: Static templates (creatures, items)
//! - **PostgreSQL**: Loot tables (`drop_data`, `drop_data_global`)
//!
//! ## Architecture
//! ```text
//! [DropResolver / CreatureFacts]
//!       ↓
//! [Repository Traits]
//!       ↓
//! ┌─────────────────┬──────────────┐
//! │ LmdbStore       │ PostgresStore│
//! │ (templates)     │ (drop tables)│
//! │ + RepoAdapters  │ + PgDropRepo │
//! └─────────────────┴──────────────┘
//! ```
//! `memory::InMemoryStore` implements every trait for tests and demos.
//!
//! ## Usage
//! ```rust,ignore
//! let backends = init_storage(&config.lmdb_path, config.lmdb_max_size, &config.database_url, config.pg_max_connections).await?;
//! let resolver = DropResolver::new(backends.drops, backends.items, DropConfig::default()).await;
//! let facts = CreatureFacts::new(backends.creatures.clone(), backends.creatures);
//! ```

pub mod lmdb_repo_adapter;
pub mod lmdb_templates;
pub mod memory;
pub mod migrations;
pub mod postgres;
pub mod postgres_repo_adapter;
pub mod repository;
pub mod seed_data;

use std::sync::Arc;
use tracing::info;

use self::lmdb_repo_adapter::{LmdbCreatureRepo, LmdbItemClassifier};
use self::lmdb_templates::LmdbTemplateStore;
use self::postgres::PostgresStore;
use self::postgres_repo_adapter::PgDropRepo;
use self::repository::RepoResult;

/// Collaborators backed by the production stores
pub struct StorageBackends {
    pub drops: Arc<PgDropRepo>,
    pub creatures: Arc<LmdbCreatureRepo>,
    pub items: Arc<LmdbItemClassifier>,
    pub templates: Arc<LmdbTemplateStore>,
    pub postgres: Arc<PostgresStore>,
}

/// Initialize both stores
///
/// Opens and seeds the LMDB template store, connects PostgreSQL (running
/// migrations), and wraps both in repository adapters.
pub async fn init_storage(
    lmdb_path: &str,
    lmdb_max_size: usize,
    postgres_url: &str,
    pg_max_connections: u32,
) -> RepoResult<StorageBackends> {
    let templates = Arc::new(LmdbTemplateStore::new(lmdb_path, lmdb_max_size)?);
    seed_data::seed_all(&templates)?;
    info!("LMDB template store initialized and seeded");

    let items = Arc::new(LmdbItemClassifier::load(&templates)?);

    let postgres = Arc::new(PostgresStore::new(postgres_url, pg_max_connections).await?);
    info!("PostgreSQL drop store initialized");

    Ok(StorageBackends {
        drops: Arc::new(PgDropRepo::new(postgres.clone())),
        creatures: Arc::new(LmdbCreatureRepo::new(templates.clone())),
        items,
        templates,
        postgres,
    })
}
