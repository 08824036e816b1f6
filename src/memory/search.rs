//! Similarity ranking over a user's records.
//!
//! [`rank`] applies a [`SearchFilter`] first and only then keeps the top `k`
//! by cosine similarity, so `k` always counts *matching* records. Equal scores
//! are ordered most-recent first.

use std::cmp::Ordering;
use std::sync::Arc;

use crate::memory::types::{MemoryRecord, ScoredRecord, SearchFilter};

/// Smallest and largest number of results a search may return.
pub const MIN_RESULTS: usize = 1;
pub const MAX_RESULTS: usize = 20;

/// Clamp a requested result count into `[MIN_RESULTS, MAX_RESULTS]`.
pub fn clamp_k(k: usize) -> usize {
    k.clamp(MIN_RESULTS, MAX_RESULTS)
}

/// Cosine similarity. Returns 0.0 when either vector has zero norm.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}

/// Rank `records` against `query`.
///
/// `records` must be in storage order (timestamp ascending, insertion order for
/// equal timestamps); that order is the final tie-break, later first.
pub fn rank(
    records: &[Arc<MemoryRecord>],
    query: &[f32],
    k: usize,
    filter: &SearchFilter,
) -> Vec<ScoredRecord> {
    let k = clamp_k(k);

    let mut scored: Vec<(usize, f32)> = records
        .iter()
        .enumerate()
        .filter(|(_, r)| filter.matches(r))
        .map(|(pos, r)| (pos, cosine_similarity(query, &r.embedding)))
        .collect();

    scored.sort_by(|(pos_a, score_a), (pos_b, score_b)| {
        score_b
            .partial_cmp(score_a)
            .unwrap_or(Ordering::Equal)
            .then_with(|| records[*pos_b].timestamp.cmp(&records[*pos_a].timestamp))
            .then_with(|| pos_b.cmp(pos_a))
    });
    scored.truncate(k);

    scored
        .into_iter()
        .map(|(pos, score)| ScoredRecord {
            record: (*records[pos]).clone(),
            score,
        })
        .collect()
}
