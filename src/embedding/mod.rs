//! Text-to-vector embedding pipeline.
//!
//! Provides the [`EmbeddingProvider`] trait plus two implementations: a local
//! ONNX provider running all-MiniLM-L6-v2 ([`local`]) and a deterministic
//! feature-hashing provider ([`hashed`]). Both produce L2-normalized vectors of
//! [`EMBEDDING_DIM`] dimensions. The provider is created via
//! [`create_provider`] from configuration.

pub mod hashed;
pub mod local;

use thiserror::Error;

/// Number of dimensions in the embedding vectors (all-MiniLM-L6-v2).
pub const EMBEDDING_DIM: usize = 384;

/// Provider-side failures.
#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("embedding model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("embedding inference failed: {0}")]
    Inference(String),

    #[error("embedding task failed: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

/// Trait for embedding text into vectors.
///
/// Implementations must be deterministic for identical input within a
/// process. All methods are synchronous; async callers go through
/// `tokio::task::spawn_blocking`.
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a single text string into a vector.
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    /// Embed a batch of text strings. Implementations may override for batched inference.
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        texts.iter().map(|t| self.embed(t)).collect()
    }

    /// Return the number of dimensions this provider produces.
    fn dimensions(&self) -> usize {
        EMBEDDING_DIM
    }

    /// Identifier recorded in `schema_meta` to detect model changes.
    fn model_id(&self) -> &str;
}

/// Create an embedding provider from config.
///
/// `"local"` needs the ONNX model on disk (run `aura-memory model download`
/// first); `"hashed"` needs nothing.
pub fn create_provider(
    config: &crate::config::EmbeddingConfig,
) -> anyhow::Result<Box<dyn EmbeddingProvider>> {
    match config.provider.as_str() {
        "local" => {
            let provider = local::LocalEmbeddingProvider::new(config)?;
            Ok(Box::new(provider))
        }
        "hashed" => Ok(Box::new(hashed::HashedEmbeddingProvider::new())),
        other => anyhow::bail!("unknown embedding provider: {other}. Supported: local, hashed"),
    }
}

/// L2-normalize a vector. Returns the input unchanged if its norm is zero.
pub(crate) fn l2_normalize(v: &[f32]) -> Vec<f32> {
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        v.iter().map(|x| x / norm).collect()
    } else {
        v.to_vec()
    }
}
