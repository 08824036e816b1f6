#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use aura_memory::embedding::hashed::HashedEmbeddingProvider;
use aura_memory::embedding::{EmbeddingError, EmbeddingProvider, EMBEDDING_DIM};
use aura_memory::memory::{MemoryFacade, RecordStore};

/// A fresh in-memory record store with schema and migrations applied.
pub async fn test_store() -> Arc<RecordStore> {
    Arc::new(RecordStore::open_in_memory().await.unwrap())
}

/// A facade over an in-memory store using the feature-hashing provider.
pub async fn test_facade() -> MemoryFacade {
    MemoryFacade::new(test_store().await, Arc::new(HashedEmbeddingProvider::new()))
}

/// A facade over the database file at `path`.
pub async fn facade_at(path: &Path) -> MemoryFacade {
    let store = Arc::new(RecordStore::open(path).await.unwrap());
    MemoryFacade::new(store, Arc::new(HashedEmbeddingProvider::new()))
}

pub async fn facade_with(provider: impl EmbeddingProvider + 'static) -> MemoryFacade {
    MemoryFacade::new(test_store().await, Arc::new(provider))
}

/// Generate a deterministic 384-dim embedding with a spike at position `seed`.
/// Each seed produces a distinct, orthogonal vector.
pub fn test_embedding(seed: usize) -> Vec<f32> {
    let mut v = vec![0.0f32; EMBEDDING_DIM];
    v[seed % EMBEDDING_DIM] = 1.0;
    v
}

/// Embedding whose cosine similarity to `test_embedding(0)` decreases as
/// `rank` grows.
pub fn ranked_embedding(rank: usize) -> Vec<f32> {
    let mut v = test_embedding(0);
    v[1] = rank as f32 * 0.25;
    v
}

/// Sleeps before answering, to exercise timeouts.
pub struct SlowProvider {
    pub delay: Duration,
}

impl EmbeddingProvider for SlowProvider {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        std::thread::sleep(self.delay);
        HashedEmbeddingProvider::new().embed(text)
    }

    fn model_id(&self) -> &str {
        "slow-test"
    }
}

/// Always fails.
pub struct FailingProvider;

impl EmbeddingProvider for FailingProvider {
    fn embed(&self, _text: &str) -> Result<Vec<f32>, EmbeddingError> {
        Err(EmbeddingError::ModelUnavailable("provider offline".into()))
    }

    fn model_id(&self) -> &str {
        "failing-test"
    }
}

/// Returns vectors of the wrong width.
pub struct ShortVectorProvider;

impl EmbeddingProvider for ShortVectorProvider {
    fn embed(&self, _text: &str) -> Result<Vec<f32>, EmbeddingError> {
        Ok(vec![1.0; 8])
    }

    fn model_id(&self) -> &str {
        "short-test"
    }
}
