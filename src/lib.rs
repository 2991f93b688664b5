//! Tower Drop Server Library
//!
//! This library provides the creature loot/combat metadata layer for the Tower game server:
//! - Per-creature drop catalogs memoized from PostgreSQL
//! - Region-scoped global bonus drops
//! - Cumulative-weight sampling pools and multi-equip drop expansion
//! - Boss flag / display name caches backed by the LMDB template store
//! - Attack animation timing and attack cost storage

pub mod config;
pub mod logging;
pub mod metrics;  // Lock-free cache counters
mod memo;  // Keyed single-flight memoization
pub mod storage;  // Repository traits + PostgreSQL / LMDB / in-memory backends
pub mod drops;  // Drop catalog, global drops, sampling pools, multi-equip expansion
pub mod creatures;  // Boss flag + display name caches, name search
pub mod combat_meta;  // Attack animation timing and attack cost

// Re-export commonly used types
pub use config::{DropConfig, ServerConfig};
pub use creatures::CreatureFacts;
pub use combat_meta::{AttackCost, AttackKey, CombatMetadataStore, SkillKey};
pub use drops::{region_of, DropEntry, DropResolver, GlobalDropEntry};
pub use metrics::{DropCacheSnapshot, DropCacheStats};
pub use storage::lmdb_templates::LmdbTemplateStore;
pub use storage::postgres::PostgresStore;
