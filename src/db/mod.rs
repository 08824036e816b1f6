pub mod migrations;
pub mod pool;
pub mod schema;

pub use pool::DatabasePool;

use rusqlite::Connection;

/// Per-connection settings for file databases: WAL so readers never wait on
/// the writer, and a busy timeout so concurrent writers queue on SQLite's lock.
pub fn setup_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "PRAGMA busy_timeout=5000; \
         PRAGMA journal_mode=WAL; \
         PRAGMA synchronous=NORMAL;",
    )
}

/// Create the schema if missing and apply pending migrations.
pub fn prepare_schema(conn: &mut Connection) -> rusqlite::Result<()> {
    schema::init_schema(conn)?;
    migrations::run_migrations(conn)
}

/// Encode an embedding as little-endian f32 bytes.
pub fn embedding_to_bytes(embedding: &[f32]) -> Vec<u8> {
    embedding.iter().flat_map(|x| x.to_le_bytes()).collect()
}

/// Decode little-endian f32 bytes. Returns `None` if the length is not a multiple of 4.
pub fn bytes_to_embedding(bytes: &[u8]) -> Option<Vec<f32>> {
    if bytes.len() % 4 != 0 {
        return None;
    }
    Some(
        bytes
            .chunks_exact(4)
            .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect(),
    )
}
