//! Feature-hashing embedding provider.
//!
//! Maps each lowercase word (and each adjacent word pair) to a signed bucket of
//! a [`EMBEDDING_DIM`]-wide vector, then L2-normalizes. No model files, no
//! network; deterministic within a process. Texts sharing words land close in
//! cosine space, which is enough for offline use and tests.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use super::{l2_normalize, EmbeddingError, EmbeddingProvider, EMBEDDING_DIM};

pub const HASHED_MODEL_ID: &str = "feature-hash-v1";

#[derive(Debug, Default, Clone)]
pub struct HashedEmbeddingProvider;

impl HashedEmbeddingProvider {
    pub fn new() -> Self {
        Self
    }
}

fn bucket(feature: &str) -> (usize, f32) {
    let mut hasher = DefaultHasher::new();
    feature.hash(&mut hasher);
    let h = hasher.finish();
    let index = (h % EMBEDDING_DIM as u64) as usize;
    let sign = if (h >> 63) == 0 { 1.0 } else { -1.0 };
    (index, sign)
}

impl EmbeddingProvider for HashedEmbeddingProvider {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let words: Vec<String> = text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .map(|w| w.to_lowercase())
            .collect();

        let mut v = vec![0.0f32; EMBEDDING_DIM];
        for word in &words {
            let (i, sign) = bucket(word);
            v[i] += sign;
        }
        for pair in words.windows(2) {
            let (i, sign) = bucket(&format!("{} {}", pair[0], pair[1]));
            v[i] += 0.5 * sign;
        }

        // Punctuation-only or empty input: fall back to the raw text so the
        // vector still has a direction.
        if v.iter().all(|x| *x == 0.0) {
            let (i, _) = bucket(text);
            v[i] = 1.0;
        }

        Ok(l2_normalize(&v))
    }

    fn model_id(&self) -> &str {
        HASHED_MODEL_ID
    }
}
