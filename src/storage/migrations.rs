//! Database Migrations - PostgreSQL schema for the drop tables
//!
//! Only the mutable loot data lives here. Creature and item templates live in
//! LMDB.

/// Per-creature and global drop tables
pub const MIGRATION_V1: &str = r#"
-- ============================================================================
-- Drop data schema v1
-- ============================================================================

-- Per-creature drops; load order is id order
CREATE TABLE IF NOT EXISTS drop_data (
    id                  BIGSERIAL PRIMARY KEY,
    dropperid           INTEGER NOT NULL,
    itemid              INTEGER NOT NULL DEFAULT 0,
    minimum_quantity    INTEGER NOT NULL DEFAULT 1,
    maximum_quantity    INTEGER NOT NULL DEFAULT 1,
    questid             INTEGER NOT NULL DEFAULT 0,
    chance              INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS idx_drop_data_dropper ON drop_data(dropperid);

-- World-wide bonus drops; continent -1 applies everywhere
CREATE TABLE IF NOT EXISTS drop_data_global (
    id                  BIGSERIAL PRIMARY KEY,
    continent           SMALLINT NOT NULL DEFAULT -1,
    itemid              INTEGER NOT NULL DEFAULT 0,
    minimum_quantity    INTEGER NOT NULL DEFAULT 1,
    maximum_quantity    INTEGER NOT NULL DEFAULT 1,
    questid             INTEGER NOT NULL DEFAULT 0,
    chance              INTEGER NOT NULL DEFAULT 0,
    comments            VARCHAR(45)
);
"#;

/// Ordered list of (name, sql) migrations
pub fn get_migrations() -> Vec<(&'static str, &'static str)> {
    vec![("v1_drop_tables", MIGRATION_V1)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_declare_both_tables() {
        let migrations = get_migrations();
        assert_eq!(migrations.len(), 1);
        assert!(migrations[0].1.contains("CREATE TABLE IF NOT EXISTS drop_data ("));
        assert!(migrations[0].1.contains("CREATE TABLE IF NOT EXISTS drop_data_global"));
    }
}
