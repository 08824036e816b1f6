//! Memory engine: records, the emotion vocabulary, storage, search and
//! pattern analysis. [`MemoryFacade`] is the entry point for callers.

pub mod emotion;
pub mod error;
pub mod facade;
pub mod patterns;
pub mod search;
pub mod stats;
pub mod store;
pub mod types;

pub use emotion::{CognitiveFocus, Emotion, EmotionalState, Intensity, Valence};
pub use error::{MemoryError, StorageError, ValidationError};
pub use facade::{MemoryFacade, SearchRequest, StoreRequest};
pub use patterns::{DominantEmotion, EmotionalPatternSummary, PatternAnalyzer, Trend};
pub use store::RecordStore;
pub use types::{MemoryRecord, NewRecord, ScoredRecord, SearchFilter, Sender, TimeWindow};
