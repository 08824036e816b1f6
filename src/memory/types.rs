//! Core record type definitions.
//!
//! Defines [`Sender`] (who produced a turn), [`MemoryRecord`] (one stored
//! conversational turn), [`NewRecord`] (the insert payload), and the search
//! types [`SearchFilter`] and [`ScoredRecord`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::memory::emotion::{CognitiveFocus, EmotionalState};
use crate::memory::error::ValidationError;

/// Maximum length of a record's text, in characters.
pub const MAX_TEXT_CHARS: usize = 10_000;

/// Who produced a conversational turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    /// The human the companion is talking to.
    User,
    /// The companion persona itself.
    Companion,
    /// A tool-using sub-agent acting on the companion's behalf.
    Agent,
    /// System notices (session markers, imported context).
    System,
}

impl Sender {
    pub const ALL: [Sender; 4] = [Self::User, Self::Companion, Self::Agent, Self::System];

    /// SQL-compatible string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Companion => "companion",
            Self::Agent => "agent",
            Self::System => "system",
        }
    }
}

impl std::fmt::Display for Sender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Sender {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "companion" => Ok(Self::Companion),
            "agent" => Ok(Self::Agent),
            "system" => Ok(Self::System),
            _ => Err(ValidationError::UnknownSender(s.to_string())),
        }
    }
}

/// One stored conversational turn. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryRecord {
    /// UUID v7 (time-sortable), stable across restarts.
    pub id: Uuid,
    /// Owner. Every query is scoped to exactly one owner.
    pub user_id: String,
    /// The message content.
    pub text: String,
    pub sender: Sender,
    /// Embedding of `text`, always [`EMBEDDING_DIM`](crate::embedding::EMBEDDING_DIM) long.
    pub embedding: Vec<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emotional_state: Option<EmotionalState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cognitive_focus: Option<CognitiveFocus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    /// Creation time, microsecond precision.
    pub timestamp: DateTime<Utc>,
}

/// Insert payload for the record store.
///
/// `id` and `timestamp` are assigned by the store when absent. Supplying an
/// `id` makes retries idempotent.
#[derive(Debug, Clone)]
pub struct NewRecord {
    pub id: Option<Uuid>,
    pub user_id: String,
    pub text: String,
    pub sender: Sender,
    pub embedding: Vec<f32>,
    pub emotional_state: Option<EmotionalState>,
    pub cognitive_focus: Option<CognitiveFocus>,
    pub session_id: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
}

impl NewRecord {
    pub fn new(
        user_id: impl Into<String>,
        text: impl Into<String>,
        sender: Sender,
        embedding: Vec<f32>,
    ) -> Self {
        Self {
            id: None,
            user_id: user_id.into(),
            text: text.into(),
            sender,
            embedding,
            emotional_state: None,
            cognitive_focus: None,
            session_id: None,
            timestamp: None,
        }
    }

    pub fn with_emotional_state(mut self, state: EmotionalState) -> Self {
        self.emotional_state = Some(state);
        self
    }

    pub fn with_cognitive_focus(mut self, focus: CognitiveFocus) -> Self {
        self.cognitive_focus = Some(focus);
        self
    }

    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}

/// Restrictions applied before ranking. `None` fields do not filter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchFilter {
    pub sender: Option<Sender>,
    pub cognitive_focus: Option<CognitiveFocus>,
    /// Inclusive lower bound on `timestamp`.
    pub from: Option<DateTime<Utc>>,
    /// Exclusive upper bound on `timestamp`.
    pub to: Option<DateTime<Utc>>,
}

impl SearchFilter {
    pub fn matches(&self, record: &MemoryRecord) -> bool {
        if self.sender.is_some_and(|s| s != record.sender) {
            return false;
        }
        if self
            .cognitive_focus
            .is_some_and(|c| record.cognitive_focus != Some(c))
        {
            return false;
        }
        if self.from.is_some_and(|from| record.timestamp < from) {
            return false;
        }
        if self.to.is_some_and(|to| record.timestamp >= to) {
            return false;
        }
        true
    }
}

/// A search hit: the record and its cosine similarity to the query.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredRecord {
    pub record: MemoryRecord,
    pub score: f32,
}

/// Half-open time interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn contains(&self, t: DateTime<Utc>) -> bool {
        self.start <= t && t < self.end
    }
}
