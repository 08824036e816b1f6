//! The single entry point the rest of the system talks to.
//!
//! [`MemoryFacade`] turns raw tokens into validated records, embeds text on
//! tokio's blocking pool and hands the result to the [`RecordStore`]. The
//! embedding call is the only place an operation suspends: it is bounded by a
//! timeout and can be cancelled, and in both cases nothing is written.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::config::AuraConfig;
use crate::embedding::{EmbeddingError, EmbeddingProvider};
use crate::memory::emotion::{CognitiveFocus, EmotionalState};
use crate::memory::error::{MemoryError, Result, StorageError, ValidationError};
use crate::memory::patterns::{EmotionalPatternSummary, PatternAnalyzer};
use crate::memory::stats::StatsResponse;
use crate::memory::store::{validate_text, RecordStore};
use crate::memory::types::{MemoryRecord, NewRecord, ScoredRecord, SearchFilter, Sender};

pub const DEFAULT_EMBED_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_RESULTS: usize = 5;
pub const DEFAULT_DAYS: u32 = 7;

/// A store request as it arrives from a caller: closed vocabularies are still
/// raw tokens and get validated before anything else happens.
#[derive(Debug, Clone, Default)]
pub struct StoreRequest {
    pub user_id: String,
    pub text: String,
    /// `user`, `companion`, `agent` or `system`.
    pub sender: String,
    /// `Emotion:Intensity`, e.g. `Happy:Medium`.
    pub emotional_state: Option<String>,
    /// ASEKE code, e.g. `ESA`.
    pub cognitive_focus: Option<String>,
    pub session_id: Option<String>,
}

impl StoreRequest {
    pub fn new(
        user_id: impl Into<String>,
        text: impl Into<String>,
        sender: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            text: text.into(),
            sender: sender.into(),
            ..Default::default()
        }
    }

    pub fn emotional_state(mut self, token: impl Into<String>) -> Self {
        self.emotional_state = Some(token.into());
        self
    }

    pub fn cognitive_focus(mut self, token: impl Into<String>) -> Self {
        self.cognitive_focus = Some(token.into());
        self
    }

    pub fn session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct SearchRequest {
    pub user_id: String,
    pub query: String,
    /// Defaults to the configured result count; clamped into `[1, 20]`.
    pub n_results: Option<usize>,
    pub sender: Option<String>,
    pub cognitive_focus: Option<String>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl SearchRequest {
    pub fn new(user_id: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            query: query.into(),
            ..Default::default()
        }
    }

    pub fn limit(mut self, n: usize) -> Self {
        self.n_results = Some(n);
        self
    }

    fn filter(&self) -> Result<SearchFilter, ValidationError> {
        Ok(SearchFilter {
            sender: self.sender.as_deref().map(str::parse).transpose()?,
            cognitive_focus: self.cognitive_focus.as_deref().map(str::parse).transpose()?,
            from: self.from,
            to: self.to,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    user_id: String,
    key: String,
    days: u32,
}

/// Caller-keyed summaries. Entries are tagged with the user's write generation
/// at the time they were computed and are dropped when a store bumps it.
#[derive(Default)]
struct AnalysisCache {
    generations: HashMap<String, u64>,
    entries: HashMap<CacheKey, (u64, EmotionalPatternSummary)>,
}

impl AnalysisCache {
    fn generation(&self, user_id: &str) -> u64 {
        self.generations.get(user_id).copied().unwrap_or(0)
    }

    fn get(&self, key: &CacheKey) -> Option<&EmotionalPatternSummary> {
        let current = self.generation(&key.user_id);
        self.entries
            .get(key)
            .filter(|(generation, _)| *generation == current)
            .map(|(_, summary)| summary)
    }

    fn invalidate(&mut self, user_id: &str) {
        *self.generations.entry(user_id.to_string()).or_insert(0) += 1;
        self.entries.retain(|k, _| k.user_id != user_id);
    }
}

pub struct MemoryFacade {
    store: Arc<RecordStore>,
    embedder: Arc<dyn EmbeddingProvider>,
    analyzer: PatternAnalyzer,
    embed_timeout: Duration,
    default_results: usize,
    default_days: u32,
    cache: Mutex<AnalysisCache>,
}

impl MemoryFacade {
    pub fn new(store: Arc<RecordStore>, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            store,
            embedder,
            analyzer: PatternAnalyzer::default(),
            embed_timeout: DEFAULT_EMBED_TIMEOUT,
            default_results: DEFAULT_RESULTS,
            default_days: DEFAULT_DAYS,
            cache: Mutex::new(AnalysisCache::default()),
        }
    }

    /// Build a facade using the embedding, retrieval and analysis settings of `config`.
    pub fn from_config(
        store: Arc<RecordStore>,
        embedder: Arc<dyn EmbeddingProvider>,
        config: &AuraConfig,
    ) -> Self {
        Self::new(store, embedder)
            .with_embed_timeout(config.embedding.timeout())
            .with_analyzer(PatternAnalyzer::new(config.analysis.trend_threshold))
            .with_defaults(
                config.retrieval.default_max_results,
                config.analysis.default_days,
            )
    }

    pub fn with_embed_timeout(mut self, timeout: Duration) -> Self {
        self.embed_timeout = timeout;
        self
    }

    pub fn with_analyzer(mut self, analyzer: PatternAnalyzer) -> Self {
        self.analyzer = analyzer;
        self
    }

    pub fn with_defaults(mut self, results: usize, days: u32) -> Self {
        self.default_results = results;
        self.default_days = days;
        self
    }

    pub fn record_store(&self) -> &Arc<RecordStore> {
        &self.store
    }

    pub fn default_days(&self) -> u32 {
        self.default_days
    }

    /// Validate, embed and persist one conversational turn.
    pub async fn store(&self, req: StoreRequest) -> Result<Uuid> {
        self.store_within(req, self.embed_timeout, None).await
    }

    pub async fn store_within(
        &self,
        req: StoreRequest,
        timeout: Duration,
        cancel: Option<&CancellationToken>,
    ) -> Result<Uuid> {
        let sender: Sender = req.sender.parse()?;
        let emotional_state = req
            .emotional_state
            .as_deref()
            .map(str::parse::<EmotionalState>)
            .transpose()?;
        let cognitive_focus = req
            .cognitive_focus
            .as_deref()
            .map(str::parse::<CognitiveFocus>)
            .transpose()?;
        if req.user_id.trim().is_empty() {
            return Err(ValidationError::EmptyUserId.into());
        }
        validate_text(&req.text)?;

        let embedding = self.embed(&req.text, timeout, cancel).await?;

        let mut record = NewRecord::new(req.user_id, req.text, sender, embedding);
        record.emotional_state = emotional_state;
        record.cognitive_focus = cognitive_focus;
        record.session_id = req.session_id;

        let user_id = record.user_id.clone();
        let id = self.store.insert(record).await?;
        self.invalidate_cache(&user_id)?;

        tracing::info!(
            id = %id,
            user_id = %user_id,
            sender = %sender,
            emotional_state = ?emotional_state.map(|s| s.to_string()),
            "memory stored"
        );
        Ok(id)
    }

    /// Semantic search over one user's memories.
    pub async fn search(&self, req: SearchRequest) -> Result<Vec<ScoredRecord>> {
        self.search_within(req, self.embed_timeout, None).await
    }

    pub async fn search_within(
        &self,
        req: SearchRequest,
        timeout: Duration,
        cancel: Option<&CancellationToken>,
    ) -> Result<Vec<ScoredRecord>> {
        let filter = req.filter()?;
        if req.user_id.trim().is_empty() {
            return Err(ValidationError::EmptyUserId.into());
        }
        if req.query.trim().is_empty() {
            return Err(ValidationError::EmptyText.into());
        }

        let query = self.embed(&req.query, timeout, cancel).await?;
        let k = req.n_results.unwrap_or(self.default_results);
        let hits = self.store.search(&req.user_id, &query, k, &filter)?;

        tracing::debug!(user_id = %req.user_id, k, hits = hits.len(), "search complete");
        Ok(hits)
    }

    /// Emotional pattern summary over the user's last `days` days.
    pub fn analyze(&self, user_id: &str, days: u32) -> Result<EmotionalPatternSummary> {
        self.analyzer.analyze(&self.store, user_id, days)
    }

    /// Like [`analyze`](Self::analyze), but reuses the summary computed under
    /// the same `cache_key` until the user stores something new.
    pub fn analyze_cached(
        &self,
        user_id: &str,
        days: u32,
        cache_key: &str,
    ) -> Result<EmotionalPatternSummary> {
        let key = CacheKey {
            user_id: user_id.to_string(),
            key: cache_key.to_string(),
            days,
        };

        let generation = {
            let cache = self.lock_cache()?;
            if let Some(summary) = cache.get(&key) {
                tracing::debug!(user_id, cache_key, "analysis cache hit");
                return Ok(summary.clone());
            }
            cache.generation(user_id)
        };

        let summary = self.analyze(user_id, days)?;

        let mut cache = self.lock_cache()?;
        // A store that landed meanwhile bumped the generation; skip caching.
        if cache.generation(user_id) == generation {
            cache.entries.insert(key, (generation, summary.clone()));
        }
        Ok(summary)
    }

    pub async fn stats(&self, user_id: &str) -> Result<StatsResponse> {
        self.store.stats(user_id).await
    }

    /// Every record of the user, oldest first.
    pub fn export(&self, user_id: &str) -> Result<Vec<MemoryRecord>> {
        self.store.records(user_id)
    }

    async fn embed(
        &self,
        text: &str,
        timeout: Duration,
        cancel: Option<&CancellationToken>,
    ) -> Result<Vec<f32>> {
        let embedder = Arc::clone(&self.embedder);
        let text = text.to_owned();
        let task = tokio::task::spawn_blocking(move || embedder.embed(&text));
        let bounded = tokio::time::timeout(timeout, task);

        let joined = match cancel {
            Some(token) => tokio::select! {
                biased;
                _ = token.cancelled() => return Err(MemoryError::Cancelled),
                joined = bounded => joined,
            },
            None => bounded.await,
        };

        let embedding = joined
            .map_err(|_| MemoryError::Timeout { after: timeout })?
            .map_err(EmbeddingError::from)??;
        Ok(embedding)
    }

    fn lock_cache(&self) -> Result<std::sync::MutexGuard<'_, AnalysisCache>> {
        self.cache
            .lock()
            .map_err(|_| StorageError::LockPoisoned("analysis cache").into())
    }

    fn invalidate_cache(&self, user_id: &str) -> Result<()> {
        self.lock_cache()?.invalidate(user_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::hashed::HashedEmbeddingProvider;
    use crate::memory::emotion::Emotion;
    use crate::memory::patterns::DominantEmotion;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingProvider {
        inner: HashedEmbeddingProvider,
        calls: AtomicUsize,
    }

    impl EmbeddingProvider for CountingProvider {
        fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.embed(text)
        }

        fn dimensions(&self) -> usize {
            self.inner.dimensions()
        }

        fn model_id(&self) -> &str {
            self.inner.model_id()
        }
    }

    async fn facade() -> MemoryFacade {
        let store = Arc::new(RecordStore::open_in_memory().await.unwrap());
        MemoryFacade::new(store, Arc::new(HashedEmbeddingProvider::new()))
    }

    #[tokio::test]
    async fn store_then_search() {
        let f = facade().await;
        let id = f
            .store(StoreRequest::new("u1", "walked the dog in the park", "user"))
            .await
            .unwrap();
        f.store(StoreRequest::new("u1", "quarterly tax filing", "user"))
            .await
            .unwrap();

        let hits = f
            .search(SearchRequest::new("u1", "dog park").limit(1))
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].record.id, id);
    }

    #[tokio::test]
    async fn bad_tokens_are_rejected_before_embedding() {
        let f = facade().await;
        for req in [
            StoreRequest::new("u1", "hi", "robot"),
            StoreRequest::new("u1", "hi", "user").emotional_state("happy:High"),
            StoreRequest::new("u1", "hi", "user").emotional_state("Happy"),
            StoreRequest::new("u1", "hi", "user").cognitive_focus("XYZ"),
            StoreRequest::new("", "hi", "user"),
            StoreRequest::new("u1", "", "user"),
        ] {
            let err = f.store(req).await.unwrap_err();
            assert!(err.is_validation(), "{err}");
        }
        assert_eq!(f.export("u1").unwrap().len(), 0);
    }

    #[tokio::test]
    async fn oversized_text_is_rejected_before_embedding() {
        let store = Arc::new(RecordStore::open_in_memory().await.unwrap());
        let provider = Arc::new(CountingProvider::default());
        let f = MemoryFacade::new(store, provider.clone());

        let text = "a".repeat(crate::memory::types::MAX_TEXT_CHARS + 1);
        let err = f.store(StoreRequest::new("u1", text, "user")).await.unwrap_err();
        assert!(matches!(
            err,
            MemoryError::Validation(ValidationError::TextTooLong { .. })
        ));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn search_filters_are_validated() {
        let f = facade().await;
        let req = SearchRequest {
            sender: Some("nobody".into()),
            ..SearchRequest::new("u1", "anything")
        };
        assert!(f.search(req).await.unwrap_err().is_validation());
    }

    #[tokio::test]
    async fn cancelled_store_writes_nothing() {
        let f = facade().await;
        let token = CancellationToken::new();
        token.cancel();
        let err = f
            .store_within(
                StoreRequest::new("u1", "never stored", "user"),
                Duration::from_secs(5),
                Some(&token),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, MemoryError::Cancelled));
        assert!(f.export("u1").unwrap().is_empty());
    }

    #[tokio::test]
    async fn cached_analysis_is_invalidated_by_store() {
        let f = facade().await;
        f.store(StoreRequest::new("u1", "great day", "user").emotional_state("Happy:High"))
            .await
            .unwrap();

        let first = f.analyze_cached("u1", 7, "dashboard").unwrap();
        assert_eq!(first.total, 1);
        assert_eq!(f.analyze_cached("u1", 7, "dashboard").unwrap(), first);

        f.store(StoreRequest::new("u1", "rough evening", "user").emotional_state("Sad:Low"))
            .await
            .unwrap();
        let second = f.analyze_cached("u1", 7, "dashboard").unwrap();
        assert_eq!(second.total, 2);
    }

    #[tokio::test]
    async fn analyze_reports_dominant_emotion() {
        let f = facade().await;
        f.store(StoreRequest::new("u1", "so curious", "user").emotional_state("Curiosity:Medium"))
            .await
            .unwrap();
        let summary = f.analyze("u1", 7).unwrap();
        assert_eq!(
            summary.dominant_emotion,
            DominantEmotion::Emotion(Emotion::Curiosity)
        );
    }
}
