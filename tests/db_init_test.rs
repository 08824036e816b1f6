use aura_memory::db::migrations::{get_schema_version, CURRENT_SCHEMA_VERSION};
use aura_memory::db::{self, DatabasePool};
use aura_memory::memory::StorageError;
use tempfile::TempDir;

#[tokio::test]
async fn open_creates_new_db_at_nonexistent_path() {
    let tmp = TempDir::new().unwrap();
    let db_path = tmp.path().join("subdir").join("new.db");

    assert!(!db_path.exists());

    let pool = DatabasePool::open(&db_path).await.unwrap();

    assert!(db_path.exists());

    let (count, version) = pool
        .interact(|conn| {
            let count: i64 = conn.query_row("SELECT COUNT(*) FROM memories", [], |row| row.get(0))?;
            Ok::<_, StorageError>((count, get_schema_version(conn)?))
        })
        .await
        .unwrap();
    assert_eq!(count, 0);
    assert_eq!(version, CURRENT_SCHEMA_VERSION);
}

#[tokio::test]
async fn wal_mode_is_enabled() {
    let tmp = TempDir::new().unwrap();
    let pool = DatabasePool::open(&tmp.path().join("wal.db")).await.unwrap();
    let mode: String = pool
        .interact(|conn| {
            conn.pragma_query_value(None, "journal_mode", |row| row.get(0))
                .map_err(StorageError::from)
        })
        .await
        .unwrap();
    assert_eq!(mode.to_lowercase(), "wal");
}

#[tokio::test]
async fn v1_database_upgrades_on_open() {
    let tmp = TempDir::new().unwrap();
    let db_path = tmp.path().join("old.db");
    {
        let conn = rusqlite::Connection::open(&db_path).unwrap();
        db::schema::init_schema(&conn).unwrap();
        assert_eq!(get_schema_version(&conn).unwrap(), 1);
    }

    let pool = DatabasePool::open(&db_path).await.unwrap();
    let version = pool
        .interact(|conn| get_schema_version(conn).map_err(StorageError::from))
        .await
        .unwrap();
    assert_eq!(version, CURRENT_SCHEMA_VERSION);
    drop(pool);

    // Opening again is a no-op.
    let pool = DatabasePool::open(&db_path).await.unwrap();
    let version = pool
        .interact(|conn| get_schema_version(conn).map_err(StorageError::from))
        .await
        .unwrap();
    assert_eq!(version, CURRENT_SCHEMA_VERSION);
}

#[tokio::test]
async fn schema_rejects_half_an_emotional_state() {
    let pool = DatabasePool::open_in_memory().await.unwrap();
    let result = pool
        .interact(|conn| {
            conn.execute(
                "INSERT INTO memories (id, user_id, content, sender, emotion, created_at, embedding) \
                 VALUES ('x', 'u1', 'hi', 'user', 'Happy', 0, x'00000000')",
                [],
            )
            .map_err(StorageError::from)
        })
        .await;
    assert!(result.is_err());
}
