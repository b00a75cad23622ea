//! SQL DDL for all karmacat tables.
//!
//! Defines the `karma`, `denominations`, `associations`, `reactions`, and
//! `schema_meta` tables. All DDL uses `IF NOT EXISTS` for idempotent
//! initialization.

use rusqlite::Connection;

/// All schema DDL statements for karmacat's core tables.
const SCHEMA_SQL: &str = r#"
-- Signed karma counter per normalized target
CREATE TABLE IF NOT EXISTS karma (
    target TEXT PRIMARY KEY NOT NULL,
    count INTEGER NOT NULL DEFAULT 0
);

-- Operator-managed exchange units for rendering karma counts.
-- Zero is not a denomination.
CREATE TABLE IF NOT EXISTS denominations (
    value INTEGER PRIMARY KEY NOT NULL CHECK(value != 0),
    label TEXT NOT NULL
);

-- Learned target→value associations. Duplicates are allowed and bias
-- random recall.
CREATE TABLE IF NOT EXISTS associations (
    target TEXT NOT NULL,
    value TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_associations_target ON associations(target);
CREATE INDEX IF NOT EXISTS idx_associations_target_value ON associations(target, value);

-- Emoji auto-reaction rules keyed by exact message text
CREATE TABLE IF NOT EXISTS reactions (
    target TEXT NOT NULL,
    emoji TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_reactions_target ON reactions(target);
CREATE INDEX IF NOT EXISTS idx_reactions_target_emoji ON reactions(target, emoji);

-- Schema metadata
CREATE TABLE IF NOT EXISTS schema_meta (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
"#;

/// Initialize all schema tables. Idempotent (uses IF NOT EXISTS).
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)?;

    // Set initial schema version if not already present
    conn.execute(
        "INSERT OR IGNORE INTO schema_meta (key, value) VALUES ('schema_version', '1')",
        [],
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_creates_all_tables() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();

        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();

        assert!(tables.contains(&"karma".to_string()));
        assert!(tables.contains(&"denominations".to_string()));
        assert!(tables.contains(&"associations".to_string()));
        assert!(tables.contains(&"reactions".to_string()));
        assert!(tables.contains(&"schema_meta".to_string()));
    }

    #[test]
    fn schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        init_schema(&conn).unwrap(); // second call should not error
    }

    #[test]
    fn zero_denomination_is_rejected_by_schema() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();

        let result = conn.execute(
            "INSERT INTO denominations (value, label) VALUES (0, 'void')",
            [],
        );
        assert!(result.is_err());
    }
}
