//! PostgreSQL Storage - Drop table persistence
//!
//! Uses `sqlx` for async queries against the two loot tables.
//!
//! ## Tables
//! - drop_data (per-creature drops)
//! - drop_data_global (world-wide bonus drops)
//!
//! Reads decode row by row: a row that fails to decode is skipped and the rest
//! of the load continues. The migrated schema declares every read column
//! `NOT NULL`, so skips only occur on tables created outside these migrations
//! (legacy imports, hand-built tables).

use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::FromRow;
use tracing::{debug, info};

use super::migrations;
use crate::drops::{CreatureId, DropEntry, GlobalDropEntry, ItemId, RegionId};

/// PostgreSQL connection pool wrapper
#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

/// Error type for PostgreSQL operations
#[derive(Debug, thiserror::Error)]
pub enum PostgresError {
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("Migration error: {0}")]
    Migration(String),
}

impl PostgresStore {
    /// Connect to PostgreSQL and run migrations
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self, PostgresError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        info!("PostgreSQL connected (max_connections={})", max_connections);

        let store = Self { pool };
        store.run_migrations().await?;

        Ok(store)
    }

    /// Wrap an existing pool (migrations are not run)
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Run all pending migrations
    pub async fn run_migrations(&self) -> Result<(), PostgresError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS _migrations (
                name VARCHAR(100) PRIMARY KEY,
                applied_at TIMESTAMP WITH TIME ZONE DEFAULT NOW()
            )",
        )
        .execute(&self.pool)
        .await?;

        for (name, sql) in migrations::get_migrations() {
            let applied: bool =
                sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM _migrations WHERE name = $1)")
                    .bind(name)
                    .fetch_one(&self.pool)
                    .await?;

            if applied {
                debug!("Migration already applied: {}", name);
                continue;
            }

            info!("Running migration: {}", name);
            sqlx::raw_sql(sql)
                .execute(&self.pool)
                .await
                .map_err(|e| PostgresError::Migration(format!("{}: {}", name, e)))?;

            sqlx::query("INSERT INTO _migrations (name) VALUES ($1)")
                .bind(name)
                .execute(&self.pool)
                .await?;

            info!("Migration applied: {}", name);
        }

        Ok(())
    }

    // ========================================================================
    // Drop reads
    // ========================================================================

    /// `drop_data` rows for one creature, in insertion order
    pub async fn drops_for(&self, creature_id: CreatureId) -> Result<Vec<DropEntry>, PostgresError> {
        let rows = sqlx::query(
            "SELECT itemid, chance, minimum_quantity, maximum_quantity, questid
             FROM drop_data WHERE dropperid = $1 ORDER BY id",
        )
        .bind(creature_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(decode_rows::<DropRow>(&rows, "drop_data")
            .into_iter()
            .map(DropEntry::from)
            .collect())
    }

    /// `drop_data_global` rows with a positive chance, in insertion order
    pub async fn global_drops(&self) -> Result<Vec<GlobalDropEntry>, PostgresError> {
        let rows = sqlx::query(
            "SELECT itemid, chance, continent, minimum_quantity, maximum_quantity, questid
             FROM drop_data_global WHERE chance > 0 ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(decode_rows::<GlobalDropRow>(&rows, "drop_data_global")
            .into_iter()
            .map(GlobalDropEntry::from)
            .collect())
    }

    // ========================================================================
    // Admin writes (reload path)
    // ========================================================================

    pub async fn insert_drop(&self, creature_id: CreatureId, entry: &DropEntry) -> Result<i64, PostgresError> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO drop_data (dropperid, itemid, minimum_quantity, maximum_quantity, questid, chance)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING id",
        )
        .bind(creature_id)
        .bind(entry.item_id)
        .bind(entry.min_quantity)
        .bind(entry.max_quantity)
        .bind(entry.quest_id)
        .bind(entry.chance)
        .fetch_one(&self.pool)
        .await?;

        debug!(creature_id, item_id = entry.item_id, "Inserted drop row {}", id);
        Ok(id)
    }

    pub async fn insert_global_drop(&self, entry: &GlobalDropEntry) -> Result<i64, PostgresError> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO drop_data_global (continent, itemid, minimum_quantity, maximum_quantity, questid, chance)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING id",
        )
        .bind(i16::from(entry.region))
        .bind(entry.item_id)
        .bind(entry.min_quantity)
        .bind(entry.max_quantity)
        .bind(entry.quest_id)
        .bind(entry.chance)
        .fetch_one(&self.pool)
        .await?;

        debug!(item_id = entry.item_id, region = entry.region, "Inserted global drop row {}", id);
        Ok(id)
    }

    /// Remove every drop row of one creature
    pub async fn delete_drops_for(&self, creature_id: CreatureId) -> Result<u64, PostgresError> {
        let result = sqlx::query("DELETE FROM drop_data WHERE dropperid = $1")
            .bind(creature_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

/// Decode each row independently, skipping the ones that do not fit
fn decode_rows<T>(rows: &[PgRow], table: &str) -> Vec<T>
where
    T: for<'r> FromRow<'r, PgRow>,
{
    rows.iter()
        .filter_map(|row| match T::from_row(row) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                debug!(table, error = %e, "Skipping malformed drop row");
                None
            }
        })
        .collect()
}

// ============================================================================
// Row types
// ============================================================================

#[derive(Debug, Clone, FromRow)]
pub struct DropRow {
    pub itemid: ItemId,
    pub chance: i32,
    pub minimum_quantity: i32,
    pub maximum_quantity: i32,
    pub questid: i32,
}

impl From<DropRow> for DropEntry {
    fn from(row: DropRow) -> Self {
        DropEntry::new(
            row.itemid,
            row.chance,
            row.minimum_quantity,
            row.maximum_quantity,
            row.questid,
        )
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct GlobalDropRow {
    pub itemid: ItemId,
    pub chance: i32,
    pub continent: i16,
    pub minimum_quantity: i32,
    pub maximum_quantity: i32,
    pub questid: i32,
}

impl From<GlobalDropRow> for GlobalDropEntry {
    fn from(row: GlobalDropRow) -> Self {
        GlobalDropEntry {
            item_id: row.itemid,
            chance: row.chance,
            // continent ids fit a byte
            region: row.continent as RegionId,
            min_quantity: row.minimum_quantity,
            max_quantity: row.maximum_quantity,
            quest_id: row.questid,
        }
    }
}
