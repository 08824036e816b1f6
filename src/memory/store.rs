//! Record store: durable, per-user partitioned storage of [`MemoryRecord`]s.
//!
//! Records live in an in-memory arena partitioned by `user_id`. Each partition
//! keeps its records in timestamp order (the time index `range` and `search`
//! binary-search) plus an id index. SQLite is the durability layer: a record is
//! committed there first and only then published to its partition, as one
//! immutable `Arc`, so readers never see a half-written record.
//!
//! Locking: a partition has an async writer mutex that serializes inserts for
//! that user, and a `RwLock` over its contents that writers hold only while
//! publishing. Commits go through the connection pool on the blocking pool;
//! different users only meet at SQLite's own write lock.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Duration, Utc};
use rusqlite::{params, Connection, TransactionBehavior};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::db::{self, DatabasePool};
use crate::embedding::EMBEDDING_DIM;
use crate::memory::emotion::{CognitiveFocus, EmotionalState};
use crate::memory::error::{MemoryError, Result, StorageError, ValidationError};
use crate::memory::search;
use crate::memory::stats::{self, StatsResponse};
use crate::memory::types::{MemoryRecord, NewRecord, ScoredRecord, SearchFilter, MAX_TEXT_CHARS};

#[derive(Default)]
struct PartitionState {
    /// Timestamp ascending; equal timestamps keep insertion order.
    records: Vec<Arc<MemoryRecord>>,
    by_id: HashMap<Uuid, Arc<MemoryRecord>>,
    session_latest: HashMap<String, DateTime<Utc>>,
}

impl PartitionState {
    fn publish(&mut self, record: Arc<MemoryRecord>) {
        let pos = self
            .records
            .partition_point(|r| r.timestamp <= record.timestamp);
        if let Some(session) = &record.session_id {
            let latest = self
                .session_latest
                .entry(session.clone())
                .or_insert(record.timestamp);
            if record.timestamp > *latest {
                *latest = record.timestamp;
            }
        }
        self.by_id.insert(record.id, Arc::clone(&record));
        self.records.insert(pos, record);
    }

    fn latest_timestamp(&self) -> Option<DateTime<Utc>> {
        self.records.last().map(|r| r.timestamp)
    }

    /// Indices `[lo, hi)` of records with `from <= timestamp < to`.
    fn span(&self, from: Option<DateTime<Utc>>, to: Option<DateTime<Utc>>) -> (usize, usize) {
        let lo = from.map_or(0, |f| self.records.partition_point(|r| r.timestamp < f));
        let hi = to.map_or(self.records.len(), |t| {
            self.records.partition_point(|r| r.timestamp < t)
        });
        (lo, hi.max(lo))
    }
}

#[derive(Default)]
struct Partition {
    writer: Mutex<()>,
    state: RwLock<PartitionState>,
}

pub struct RecordStore {
    db: DatabasePool,
    partitions: RwLock<HashMap<String, Arc<Partition>>>,
    dimensions: usize,
}

impl RecordStore {
    /// Open (or create) a store backed by the database at `path`, loading every
    /// persisted record.
    pub async fn open(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let db = DatabasePool::open(path.as_ref()).await?;
        Ok(Self::from_pool(db).await?)
    }

    /// A store backed by a private in-memory database.
    pub async fn open_in_memory() -> anyhow::Result<Self> {
        let db = DatabasePool::open_in_memory().await?;
        Ok(Self::from_pool(db).await?)
    }

    /// Wrap an initialized pool and load its records.
    pub async fn from_pool(db: DatabasePool) -> Result<Self> {
        let loaded = db.interact(|conn| load_records(conn)).await?;
        let count = loaded.len();

        let mut partitions: HashMap<String, Arc<Partition>> = HashMap::new();
        for record in loaded {
            let partition = partitions.entry(record.user_id.clone()).or_default();
            let mut state = partition
                .state
                .write()
                .map_err(|_| StorageError::LockPoisoned("partition"))?;
            state.publish(Arc::new(record));
        }

        tracing::info!(records = count, users = partitions.len(), "record store loaded");

        Ok(Self {
            db,
            partitions: RwLock::new(partitions),
            dimensions: EMBEDDING_DIM,
        })
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Database file, if the store is file-backed.
    pub fn path(&self) -> Option<&Path> {
        self.db.path()
    }

    /// Run `f` against a pooled connection (schema metadata, diagnostics).
    pub async fn with_connection<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> rusqlite::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        self.db
            .interact(move |conn| f(conn).map_err(MemoryError::from))
            .await
    }

    /// Validate, persist and publish a record. Returns its id.
    ///
    /// Missing `id`/`timestamp` are assigned here. An auto-assigned timestamp
    /// is strictly greater than every earlier timestamp of the same user.
    /// Re-inserting an identical record under an existing id returns that id
    /// without writing anything.
    pub async fn insert(&self, new: NewRecord) -> Result<Uuid> {
        self.validate(&new)?;

        let partition = self.partition_or_create(&new.user_id)?;
        let _writer = partition.writer.lock().await;

        let (timestamp, id) = {
            let state = partition
                .state
                .read()
                .map_err(|_| StorageError::LockPoisoned("partition"))?;

            if let Some(id) = new.id {
                if let Some(existing) = state.by_id.get(&id) {
                    return if is_same_record(existing, &new) {
                        tracing::debug!(id = %id, "idempotent re-insert");
                        Ok(id)
                    } else {
                        Err(ValidationError::DuplicateId(id).into())
                    };
                }
            }

            let timestamp = match new.timestamp {
                Some(ts) => truncate_to_micros(ts),
                None => next_timestamp(state.latest_timestamp()),
            };

            if let Some(session) = &new.session_id {
                if state
                    .session_latest
                    .get(session)
                    .is_some_and(|latest| timestamp < *latest)
                {
                    return Err(ValidationError::SessionOutOfOrder {
                        session_id: session.clone(),
                    }
                    .into());
                }
            }

            (timestamp, new.id.unwrap_or_else(Uuid::now_v7))
        };

        let record = Arc::new(MemoryRecord {
            id,
            user_id: new.user_id,
            text: new.text,
            sender: new.sender,
            embedding: new.embedding,
            emotional_state: new.emotional_state,
            cognitive_focus: new.cognitive_focus,
            session_id: new.session_id,
            timestamp,
        });

        let row = Arc::clone(&record);
        self.db.interact(move |conn| persist(conn, &row)).await?;

        tracing::debug!(
            id = %record.id,
            user_id = %record.user_id,
            sender = %record.sender,
            "record stored"
        );

        let mut state = partition
            .state
            .write()
            .map_err(|_| StorageError::LockPoisoned("partition"))?;
        state.publish(record);

        Ok(id)
    }

    /// Records of `user_id` with `start <= timestamp < end`, oldest first.
    pub fn range(
        &self,
        user_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<MemoryRecord>> {
        let Some(partition) = self.partition(user_id)? else {
            return Ok(Vec::new());
        };
        let state = partition
            .state
            .read()
            .map_err(|_| StorageError::LockPoisoned("partition"))?;
        let (lo, hi) = state.span(Some(start), Some(end));
        Ok(state.records[lo..hi].iter().map(|r| (**r).clone()).collect())
    }

    /// Every record of `user_id`, oldest first.
    pub fn records(&self, user_id: &str) -> Result<Vec<MemoryRecord>> {
        let Some(partition) = self.partition(user_id)? else {
            return Ok(Vec::new());
        };
        let state = partition
            .state
            .read()
            .map_err(|_| StorageError::LockPoisoned("partition"))?;
        Ok(state.records.iter().map(|r| (**r).clone()).collect())
    }

    /// Top-`k` records of `user_id` by cosine similarity to `query`, after
    /// applying `filter`. `k` is clamped into `[1, 20]`.
    pub fn search(
        &self,
        user_id: &str,
        query: &[f32],
        k: usize,
        filter: &SearchFilter,
    ) -> Result<Vec<ScoredRecord>> {
        self.validate_vector(query)?;

        let Some(partition) = self.partition(user_id)? else {
            return Ok(Vec::new());
        };
        let state = partition
            .state
            .read()
            .map_err(|_| StorageError::LockPoisoned("partition"))?;
        let (lo, hi) = state.span(filter.from, filter.to);
        Ok(search::rank(&state.records[lo..hi], query, k, filter))
    }

    /// Per-user counts, computed from the committed rows.
    pub async fn stats(&self, user_id: &str) -> Result<StatsResponse> {
        let user_id = user_id.to_owned();
        let path = self.path().map(Path::to_path_buf);
        self.with_connection(move |conn| stats::memory_stats(conn, &user_id, path.as_deref()))
            .await
    }

    /// Timestamp of the user's most recent record.
    pub fn latest_timestamp(&self, user_id: &str) -> Result<Option<DateTime<Utc>>> {
        let Some(partition) = self.partition(user_id)? else {
            return Ok(None);
        };
        let state = partition
            .state
            .read()
            .map_err(|_| StorageError::LockPoisoned("partition"))?;
        Ok(state.latest_timestamp())
    }

    /// Number of records owned by `user_id`.
    pub fn count(&self, user_id: &str) -> Result<usize> {
        let Some(partition) = self.partition(user_id)? else {
            return Ok(0);
        };
        let state = partition
            .state
            .read()
            .map_err(|_| StorageError::LockPoisoned("partition"))?;
        Ok(state.records.len())
    }

    fn validate(&self, new: &NewRecord) -> Result<(), ValidationError> {
        if new.user_id.trim().is_empty() {
            return Err(ValidationError::EmptyUserId);
        }
        validate_text(&new.text)?;
        self.validate_vector(&new.embedding)
    }

    fn validate_vector(&self, v: &[f32]) -> Result<(), ValidationError> {
        if v.len() != self.dimensions {
            return Err(ValidationError::DimensionMismatch {
                expected: self.dimensions,
                actual: v.len(),
            });
        }
        if v.iter().any(|x| !x.is_finite()) {
            return Err(ValidationError::NonFiniteEmbedding);
        }
        if v.iter().all(|x| *x == 0.0) {
            return Err(ValidationError::ZeroNormEmbedding);
        }
        Ok(())
    }

    fn partition(&self, user_id: &str) -> Result<Option<Arc<Partition>>> {
        let partitions = self
            .partitions
            .read()
            .map_err(|_| StorageError::LockPoisoned("partition directory"))?;
        Ok(partitions.get(user_id).cloned())
    }

    fn partition_or_create(&self, user_id: &str) -> Result<Arc<Partition>> {
        if let Some(p) = self.partition(user_id)? {
            return Ok(p);
        }
        let mut partitions = self
            .partitions
            .write()
            .map_err(|_| StorageError::LockPoisoned("partition directory"))?;
        Ok(Arc::clone(partitions.entry(user_id.to_string()).or_default()))
    }
}

/// Non-empty and at most [`MAX_TEXT_CHARS`] characters.
pub fn validate_text(text: &str) -> Result<(), ValidationError> {
    if text.trim().is_empty() {
        return Err(ValidationError::EmptyText);
    }
    let len = text.chars().count();
    if len > MAX_TEXT_CHARS {
        return Err(ValidationError::TextTooLong {
            len,
            max: MAX_TEXT_CHARS,
        });
    }
    Ok(())
}

fn persist(conn: &mut Connection, record: &MemoryRecord) -> Result<()> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let inserted = tx.execute(
        "INSERT INTO memories (id, user_id, content, sender, emotion, intensity, \
         cognitive_focus, session_id, created_at, embedding) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            record.id.to_string(),
            record.user_id,
            record.text,
            record.sender.as_str(),
            record.emotional_state.map(|s| s.emotion.as_str()),
            record.emotional_state.map(|s| s.intensity.as_str()),
            record.cognitive_focus.map(|c| c.as_str()),
            record.session_id,
            record.timestamp.timestamp_micros(),
            db::embedding_to_bytes(&record.embedding),
        ],
    );
    match inserted {
        Ok(_) => {}
        Err(rusqlite::Error::SqliteFailure(e, _))
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY =>
        {
            return Err(ValidationError::DuplicateId(record.id).into());
        }
        Err(e) => return Err(e.into()),
    }
    tx.commit()?;
    Ok(())
}

fn is_same_record(existing: &MemoryRecord, new: &NewRecord) -> bool {
    existing.text == new.text
        && existing.sender == new.sender
        && existing.embedding == new.embedding
        && existing.emotional_state == new.emotional_state
        && existing.cognitive_focus == new.cognitive_focus
        && existing.session_id == new.session_id
        && new
            .timestamp
            .is_none_or(|ts| truncate_to_micros(ts) == existing.timestamp)
}

fn truncate_to_micros(t: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::from_timestamp_micros(t.timestamp_micros()).unwrap_or(t)
}

/// Current time, bumped past `latest` so a user's timestamps strictly increase.
fn next_timestamp(latest: Option<DateTime<Utc>>) -> DateTime<Utc> {
    let now = truncate_to_micros(Utc::now());
    match latest {
        Some(latest) if now <= latest => latest + Duration::microseconds(1),
        _ => now,
    }
}

fn load_records(conn: &Connection) -> Result<Vec<MemoryRecord>> {
    struct Row {
        id: String,
        user_id: String,
        content: String,
        sender: String,
        emotion: Option<String>,
        intensity: Option<String>,
        cognitive_focus: Option<String>,
        session_id: Option<String>,
        created_at: i64,
        embedding: Vec<u8>,
    }

    let mut stmt = conn.prepare(
        "SELECT id, user_id, content, sender, emotion, intensity, cognitive_focus, \
         session_id, created_at, embedding \
         FROM memories ORDER BY created_at, rowid",
    )?;
    let rows = stmt
        .query_map([], |row| {
            Ok(Row {
                id: row.get(0)?,
                user_id: row.get(1)?,
                content: row.get(2)?,
                sender: row.get(3)?,
                emotion: row.get(4)?,
                intensity: row.get(5)?,
                cognitive_focus: row.get(6)?,
                session_id: row.get(7)?,
                created_at: row.get(8)?,
                embedding: row.get(9)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    rows.into_iter()
        .map(|row| {
            let corrupt = |reason: String| -> MemoryError {
                StorageError::Corrupt {
                    id: row.id.clone(),
                    reason,
                }
                .into()
            };

            let id = Uuid::parse_str(&row.id).map_err(|e| corrupt(format!("bad id: {e}")))?;
            let embedding = db::bytes_to_embedding(&row.embedding)
                .filter(|v| v.len() == EMBEDDING_DIM)
                .ok_or_else(|| {
                    corrupt(format!("embedding blob is {} bytes", row.embedding.len()))
                })?;
            let emotional_state = match (&row.emotion, &row.intensity) {
                (Some(e), Some(i)) => Some(EmotionalState::new(
                    e.parse().map_err(|e| corrupt(format!("{e}")))?,
                    i.parse().map_err(|e| corrupt(format!("{e}")))?,
                )),
                (None, None) => None,
                _ => return Err(corrupt("half an emotional state".into())),
            };
            let cognitive_focus = row
                .cognitive_focus
                .as_deref()
                .map(str::parse::<CognitiveFocus>)
                .transpose()
                .map_err(|e| corrupt(format!("{e}")))?;
            let timestamp = DateTime::from_timestamp_micros(row.created_at)
                .ok_or_else(|| corrupt(format!("timestamp {} out of range", row.created_at)))?;

            Ok(MemoryRecord {
                id,
                sender: row.sender.parse().map_err(|e| corrupt(format!("{e}")))?,
                user_id: row.user_id,
                text: row.content,
                embedding,
                emotional_state,
                cognitive_focus,
                session_id: row.session_id,
                timestamp,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::emotion::{Emotion, Intensity};
    use crate::memory::types::Sender;

    async fn test_store() -> RecordStore {
        RecordStore::open_in_memory().await.unwrap()
    }

    /// Unit vector along dimension `i`.
    fn axis(i: usize) -> Vec<f32> {
        let mut v = vec![0.0f32; EMBEDDING_DIM];
        v[i % EMBEDDING_DIM] = 1.0;
        v
    }

    fn far_past() -> DateTime<Utc> {
        DateTime::from_timestamp(0, 0).unwrap()
    }

    fn far_future() -> DateTime<Utc> {
        Utc::now() + Duration::days(365)
    }

    #[tokio::test]
    async fn test_insert_assigns_id_and_timestamp() {
        let store = test_store().await;
        let before = Utc::now() - Duration::seconds(1);
        let id = store
            .insert(NewRecord::new("u1", "hello", Sender::User, axis(0)))
            .await
            .unwrap();

        let records = store.range("u1", far_past(), far_future()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, id);
        assert!(records[0].timestamp > before);
        assert_eq!(id.get_version_num(), 7);
    }

    #[tokio::test]
    async fn test_row_written_to_database() {
        let store = test_store().await;
        let id = store
            .insert(
                NewRecord::new("u1", "feeling calm", Sender::User, axis(3))
                    .with_emotional_state(EmotionalState::new(Emotion::Peace, Intensity::Low))
                    .with_cognitive_focus(CognitiveFocus::EmotionalStateAlgorithms),
            )
            .await
            .unwrap();

        let (emotion, intensity, focus, blob_len): (String, String, String, usize) = store
            .with_connection(move |conn| {
                conn.query_row(
                    "SELECT emotion, intensity, cognitive_focus, length(embedding) FROM memories WHERE id = ?1",
                    params![id.to_string()],
                    |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
                )
            })
            .await
            .unwrap();
        assert_eq!(emotion, "Peace");
        assert_eq!(intensity, "Low");
        assert_eq!(focus, "ESA");
        assert_eq!(blob_len, EMBEDDING_DIM * 4);
    }

    #[tokio::test]
    async fn test_rejects_empty_text() {
        let store = test_store().await;
        let err = store
            .insert(NewRecord::new("u1", "   ", Sender::User, axis(0)))
            .await
            .unwrap_err();
        assert!(matches!(err, MemoryError::Validation(ValidationError::EmptyText)));
        assert_eq!(store.count("u1").unwrap(), 0);
    }

    #[tokio::test]
    async fn test_rejects_long_text() {
        let store = test_store().await;
        let text = "a".repeat(MAX_TEXT_CHARS + 1);
        let err = store
            .insert(NewRecord::new("u1", text, Sender::User, axis(0)))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            MemoryError::Validation(ValidationError::TextTooLong { .. })
        ));
    }

    #[tokio::test]
    async fn test_rejects_wrong_dimension() {
        let store = test_store().await;
        let err = store
            .insert(NewRecord::new("u1", "hi", Sender::User, vec![1.0; 10]))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            MemoryError::Validation(ValidationError::DimensionMismatch {
                expected: EMBEDDING_DIM,
                actual: 10
            })
        ));
    }

    #[tokio::test]
    async fn test_rejects_degenerate_vectors() {
        let store = test_store().await;
        let zero = vec![0.0f32; EMBEDDING_DIM];
        assert!(store
            .insert(NewRecord::new("u1", "hi", Sender::User, zero.clone()))
            .await
            .is_err());

        let mut nan = axis(0);
        nan[1] = f32::NAN;
        assert!(store
            .insert(NewRecord::new("u1", "hi", Sender::User, nan))
            .await
            .is_err());

        assert!(store.search("u1", &zero, 5, &SearchFilter::default()).is_err());
    }

    #[tokio::test]
    async fn test_sequential_timestamps_strictly_increase() {
        let store = test_store().await;
        for i in 0..50 {
            store
                .insert(NewRecord::new("u1", format!("msg {i}"), Sender::User, axis(i)))
                .await
                .unwrap();
        }
        let records = store.range("u1", far_past(), far_future()).unwrap();
        assert_eq!(records.len(), 50);
        assert!(records.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
        assert!(records.iter().enumerate().all(|(i, r)| r.text == format!("msg {i}")));
    }

    #[tokio::test]
    async fn test_range_is_half_open_and_sorted() {
        let store = test_store().await;
        let t0 = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        for (minutes, text) in [(20, "c"), (0, "a"), (10, "b")] {
            store
                .insert(
                    NewRecord::new("u1", text, Sender::User, axis(minutes as usize))
                        .with_timestamp(t0 + Duration::minutes(minutes)),
                )
                .await
                .unwrap();
        }

        let all = store.range("u1", t0, t0 + Duration::minutes(30)).unwrap();
        let texts: Vec<&str> = all.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["a", "b", "c"]);

        let window = store
            .range("u1", t0 + Duration::minutes(10), t0 + Duration::minutes(20))
            .unwrap();
        assert_eq!(window.len(), 1);
        assert_eq!(window[0].text, "b");

        assert!(store.range("u1", t0 + Duration::minutes(30), t0).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_users_are_isolated() {
        let store = test_store().await;
        store
            .insert(NewRecord::new("alice", "alice's secret", Sender::User, axis(0)))
            .await
            .unwrap();
        store
            .insert(NewRecord::new("bob", "bob's note", Sender::User, axis(0)))
            .await
            .unwrap();

        let hits = store
            .search("alice", &axis(0), 20, &SearchFilter::default())
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].record.user_id, "alice");
        assert!(store.range("carol", far_past(), far_future()).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_supplied_id_is_idempotent() {
        let store = test_store().await;
        let id = Uuid::now_v7();
        let record = NewRecord::new("u1", "retry me", Sender::User, axis(1)).with_id(id);

        assert_eq!(store.insert(record.clone()).await.unwrap(), id);
        assert_eq!(store.insert(record).await.unwrap(), id);
        assert_eq!(store.count("u1").unwrap(), 1);

        let conflicting = NewRecord::new("u1", "different", Sender::User, axis(1)).with_id(id);
        let err = store.insert(conflicting).await.unwrap_err();
        assert!(matches!(err, MemoryError::Validation(ValidationError::DuplicateId(_))));
    }

    #[tokio::test]
    async fn test_id_unique_across_users() {
        let store = test_store().await;
        let id = Uuid::now_v7();
        store
            .insert(NewRecord::new("u1", "first", Sender::User, axis(1)).with_id(id))
            .await
            .unwrap();
        let err = store
            .insert(NewRecord::new("u2", "second", Sender::User, axis(1)).with_id(id))
            .await
            .unwrap_err();
        assert!(matches!(err, MemoryError::Validation(ValidationError::DuplicateId(_))));
        assert_eq!(store.count("u2").unwrap(), 0);
    }

    #[tokio::test]
    async fn test_session_timestamps_cannot_go_backwards() {
        let store = test_store().await;
        let t0 = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        store
            .insert(
                NewRecord::new("u1", "later", Sender::User, axis(0))
                    .with_session("s1")
                    .with_timestamp(t0 + Duration::minutes(5)),
            )
            .await
            .unwrap();

        let err = store
            .insert(
                NewRecord::new("u1", "earlier", Sender::User, axis(1))
                    .with_session("s1")
                    .with_timestamp(t0),
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            MemoryError::Validation(ValidationError::SessionOutOfOrder { .. })
        ));

        // Other sessions are unaffected.
        store
            .insert(
                NewRecord::new("u1", "other session", Sender::User, axis(2))
                    .with_session("s2")
                    .with_timestamp(t0),
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_reopen_preserves_records() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("aura.db");

        let original = {
            let store = RecordStore::open(&path).await.unwrap();
            let id = store
                .insert(
                    NewRecord::new("u1", "persist me", Sender::Companion, axis(9))
                        .with_emotional_state(EmotionalState::new(Emotion::Hope, Intensity::High))
                        .with_session("s1"),
                )
                .await
                .unwrap();
            let records = store.records("u1").unwrap();
            assert_eq!(records[0].id, id);
            records
        };

        let reopened = RecordStore::open(&path).await.unwrap();
        assert_eq!(reopened.records("u1").unwrap(), original);
    }

    #[tokio::test]
    async fn test_corrupt_row_is_reported() {
        let db = DatabasePool::open_in_memory().await.unwrap();
        db.interact(|conn| {
            conn.execute(
                "INSERT INTO memories (id, user_id, content, sender, created_at, embedding) \
                 VALUES (?1, 'u1', 'broken', 'user', 0, x'0000')",
                params![Uuid::now_v7().to_string()],
            )
            .map_err(StorageError::from)
        })
        .await
        .unwrap();

        let err = RecordStore::from_pool(db).await.err().unwrap();
        assert!(matches!(err, MemoryError::Storage(StorageError::Corrupt { .. })));
    }
}
