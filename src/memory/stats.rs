use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Response from memory_stats.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsResponse {
    pub user_id: String,
    pub total_memories: u64,
    pub with_emotional_state: u64,
    pub sessions: u64,
    pub by_sender: BTreeMap<String, u64>,
    pub db_size_bytes: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oldest_memory: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub newest_memory: Option<DateTime<Utc>>,
}

/// Compute per-user statistics straight from the persisted rows.
///
/// `db_path` is used for file size calculation; pass None for in-memory databases.
pub fn memory_stats(
    conn: &Connection,
    user_id: &str,
    db_path: Option<&Path>,
) -> rusqlite::Result<StatsResponse> {
    let (total, with_emotional_state, sessions) = conn.query_row(
        "SELECT COUNT(*), COUNT(emotion), COUNT(DISTINCT session_id) \
         FROM memories WHERE user_id = ?1",
        params![user_id],
        |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, i64>(2)?,
            ))
        },
    )?;
    let by_sender = count_by_sender(conn, user_id)?;
    let (oldest, newest) = time_range(conn, user_id)?;

    let db_size_bytes = db_path
        .and_then(|p| std::fs::metadata(p).ok())
        .map(|m| m.len())
        .unwrap_or(0);

    Ok(StatsResponse {
        user_id: user_id.to_string(),
        total_memories: total as u64,
        with_emotional_state: with_emotional_state as u64,
        sessions: sessions as u64,
        by_sender,
        db_size_bytes,
        oldest_memory: oldest,
        newest_memory: newest,
    })
}

fn count_by_sender(conn: &Connection, user_id: &str) -> rusqlite::Result<BTreeMap<String, u64>> {
    let mut stmt = conn.prepare(
        "SELECT sender, COUNT(*) FROM memories WHERE user_id = ?1 GROUP BY sender",
    )?;
    let counts = stmt
        .query_map(params![user_id], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)? as u64))
        })?
        .collect::<rusqlite::Result<BTreeMap<_, _>>>()?;
    Ok(counts)
}

/// Oldest and newest `created_at` for the user.
fn time_range(
    conn: &Connection,
    user_id: &str,
) -> rusqlite::Result<(Option<DateTime<Utc>>, Option<DateTime<Utc>>)> {
    let (oldest, newest): (Option<i64>, Option<i64>) = conn.query_row(
        "SELECT MIN(created_at), MAX(created_at) FROM memories WHERE user_id = ?1",
        params![user_id],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )?;
    Ok((
        oldest.and_then(DateTime::from_timestamp_micros),
        newest.and_then(DateTime::from_timestamp_micros),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::EMBEDDING_DIM;
    use crate::memory::emotion::{Emotion, EmotionalState, Intensity};
    use crate::memory::store::RecordStore;
    use crate::memory::types::{NewRecord, Sender};

    fn embedding() -> Vec<f32> {
        vec![0.5; EMBEDDING_DIM]
    }

    #[tokio::test]
    async fn stats_for_unknown_user_are_zero() {
        let store = RecordStore::open_in_memory().await.unwrap();
        let stats = store.stats("nobody").await.unwrap();
        assert_eq!(stats.total_memories, 0);
        assert!(stats.by_sender.is_empty());
        assert!(stats.oldest_memory.is_none());
    }

    #[tokio::test]
    async fn stats_count_per_user() {
        let store = RecordStore::open_in_memory().await.unwrap();
        for record in [
            NewRecord::new("u1", "hello", Sender::User, embedding())
                .with_emotional_state(EmotionalState::new(Emotion::Happy, Intensity::Low))
                .with_session("s1"),
            NewRecord::new("u1", "hi there", Sender::Companion, embedding()).with_session("s1"),
            NewRecord::new("u1", "new thread", Sender::User, embedding()).with_session("s2"),
            NewRecord::new("u2", "someone else", Sender::User, embedding()),
        ] {
            store.insert(record).await.unwrap();
        }

        let stats = store.stats("u1").await.unwrap();
        assert_eq!(stats.total_memories, 3);
        assert_eq!(stats.with_emotional_state, 1);
        assert_eq!(stats.sessions, 2);
        assert_eq!(stats.by_sender.get("user"), Some(&2));
        assert_eq!(stats.by_sender.get("companion"), Some(&1));
        assert!(stats.oldest_memory < stats.newest_memory);
    }

    #[tokio::test]
    async fn file_size_is_reported() {
        let tmp = tempfile::TempDir::new().unwrap();
        let store = RecordStore::open(tmp.path().join("aura.db")).await.unwrap();
        store
            .insert(NewRecord::new("u1", "hello", Sender::User, embedding()))
            .await
            .unwrap();
        assert!(store.stats("u1").await.unwrap().db_size_bytes > 0);
    }
}
