//! Typed failures returned by the memory engine.

use std::time::Duration;

use thiserror::Error;
use uuid::Uuid;

use crate::embedding::EmbeddingError;

pub type Result<T, E = MemoryError> = std::result::Result<T, E>;

/// Every failure the engine can surface to a caller.
#[derive(Debug, Error)]
pub enum MemoryError {
    /// Malformed input. Never worth retrying.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Durability or I/O fault. The caller decides whether to retry.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The embedding provider failed; nothing was written.
    #[error(transparent)]
    Embedding(#[from] EmbeddingError),

    /// The embedding call exceeded the caller's timeout; nothing was written.
    #[error("embedding timed out after {after:?}")]
    Timeout { after: Duration },

    /// The caller cancelled the operation before the embedding returned.
    #[error("operation cancelled")]
    Cancelled,
}

impl MemoryError {
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<rusqlite::Error> for MemoryError {
    fn from(e: rusqlite::Error) -> Self {
        Self::Storage(StorageError::Sqlite(e))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("user_id must not be empty")]
    EmptyUserId,

    #[error("text must not be empty")]
    EmptyText,

    #[error("text is {len} characters, maximum is {max}")]
    TextTooLong { len: usize, max: usize },

    #[error("embedding has {actual} dimensions, expected {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("embedding contains non-finite values")]
    NonFiniteEmbedding,

    #[error("embedding has zero norm")]
    ZeroNormEmbedding,

    #[error("unknown emotion: {0}")]
    UnknownEmotion(String),

    #[error("unknown intensity: {0}")]
    UnknownIntensity(String),

    #[error("emotional state must look like Emotion:Intensity, got {0:?}")]
    MalformedEmotionalState(String),

    #[error("unknown sender: {0}")]
    UnknownSender(String),

    #[error("unknown cognitive focus: {0}")]
    UnknownCognitiveFocus(String),

    #[error("id {0} already belongs to a different record")]
    DuplicateId(Uuid),

    #[error("timestamp precedes the latest record in session {session_id}")]
    SessionOutOfOrder { session_id: String },

    #[error("analysis window must be at least one day")]
    EmptyWindow,
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("connection pool error: {0}")]
    Pool(String),

    #[error("stored record {id} is corrupt: {reason}")]
    Corrupt { id: String, reason: String },

    #[error("{0} lock poisoned")]
    LockPoisoned(&'static str),
}
