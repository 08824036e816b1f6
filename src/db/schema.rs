//! SQL DDL for the record store's durable layout.
//!
//! Defines the `memories` table (one row per record, embedding stored inline
//! as a little-endian f32 BLOB so a row is all-or-nothing) and `schema_meta`.
//! All DDL uses `IF NOT EXISTS` for idempotent initialization.

use rusqlite::Connection;

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS memories (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL CHECK(length(user_id) > 0),
    content TEXT NOT NULL CHECK(length(content) > 0),
    sender TEXT NOT NULL CHECK(sender IN ('user','companion','agent','system')),
    emotion TEXT,
    intensity TEXT CHECK(intensity IS NULL OR intensity IN ('Low','Medium','High')),
    cognitive_focus TEXT,
    session_id TEXT,
    created_at INTEGER NOT NULL,
    embedding BLOB NOT NULL,
    CHECK((emotion IS NULL) = (intensity IS NULL))
);

CREATE INDEX IF NOT EXISTS idx_memories_user_time ON memories(user_id, created_at);

CREATE TABLE IF NOT EXISTS schema_meta (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
"#;

/// Initialize all schema tables. Idempotent (uses IF NOT EXISTS).
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)?;

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

        assert!(tables.contains(&"memories".to_string()));
        assert!(tables.contains(&"schema_meta".to_string()));
    }

    #[test]
    fn schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        init_schema(&conn).unwrap();
    }

    #[test]
    fn check_constraints_reject_half_emotional_state() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();

        let result = conn.execute(
            "INSERT INTO memories (id, user_id, content, sender, emotion, intensity, created_at, embedding) \
             VALUES ('a', 'u1', 'hi', 'user', 'Happy', NULL, 0, x'00')",
            [],
        );
        assert!(result.is_err(), "emotion without intensity must be rejected");

        let result = conn.execute(
            "INSERT INTO memories (id, user_id, content, sender, created_at, embedding) \
             VALUES ('b', 'u1', 'hi', 'robot', 0, x'00')",
            [],
        );
        assert!(result.is_err(), "unknown sender must be rejected");
    }
}
