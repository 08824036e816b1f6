pub mod analyze_patterns;
pub mod memory_stats;
pub mod search_memories;
pub mod store_memory;

use analyze_patterns::AnalyzePatternsParams;
use memory_stats::MemoryStatsParams;
use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::{tool, tool_handler, tool_router, ServerHandler};
use search_memories::SearchMemoriesParams;
use std::sync::Arc;
use store_memory::StoreMemoryParams;

use crate::memory::{MemoryError, MemoryFacade};

/// The Aura MCP tool handler. Holds the shared [`MemoryFacade`] and exposes
/// its operations via the `#[tool_router]` macro.
#[derive(Clone)]
pub struct AuraTools {
    tool_router: ToolRouter<Self>,
    facade: Arc<MemoryFacade>,
}

/// Human-readable tool error. Validation failures are the caller's to fix;
/// everything else is reported as a server-side fault.
fn tool_error(e: MemoryError) -> String {
    match e {
        MemoryError::Validation(v) => format!("invalid input: {v}"),
        other => {
            tracing::error!(error = %other, "tool call failed");
            format!("memory engine error: {other}")
        }
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("serialization failed: {e}"))
}

#[tool_router]
impl AuraTools {
    pub fn new(facade: Arc<MemoryFacade>) -> Self {
        Self {
            tool_router: Self::tool_router(),
            facade,
        }
    }

    /// Store one conversational turn with optional emotional and cognitive tags.
    #[tool(description = "Store a conversational turn as a searchable memory. Optionally tag it with an emotional state ('Emotion:Intensity', e.g. 'Happy:Medium') and an ASEKE cognitive focus code.")]
    async fn store_memory(
        &self,
        Parameters(params): Parameters<StoreMemoryParams>,
    ) -> Result<String, String> {
        tracing::info!(
            user_id = %params.user_id,
            message_len = params.message.len(),
            sender = %params.sender,
            "store_memory called"
        );

        let id = self
            .facade
            .store(params.into())
            .await
            .map_err(tool_error)?;

        Ok(serde_json::json!({ "id": id, "status": "stored" }).to_string())
    }

    /// Semantic search over one user's memories.
    #[tool(description = "Search a user's memories by meaning. Filters (sender, cognitive_focus, from/to) are applied before ranking; results are ordered by similarity.")]
    async fn search_memories(
        &self,
        Parameters(params): Parameters<SearchMemoriesParams>,
    ) -> Result<String, String> {
        tracing::info!(user_id = %params.user_id, query = %params.query, "search_memories called");

        let hits = self
            .facade
            .search(params.into())
            .await
            .map_err(tool_error)?;

        to_json(&serde_json::json!({ "total": hits.len(), "results": hits }))
    }

    /// Emotional pattern summary over a window of days.
    #[tool(description = "Summarize a user's emotional patterns over the last N days (default 7): emotion and intensity distributions, dominant emotion, valence trend and recommendations.")]
    async fn analyze_emotional_patterns(
        &self,
        Parameters(params): Parameters<AnalyzePatternsParams>,
    ) -> Result<String, String> {
        let days = params.days.unwrap_or(self.facade.default_days());
        tracing::info!(user_id = %params.user_id, days, "analyze_emotional_patterns called");

        let summary = match params.cache_key.as_deref() {
            Some(key) => self.facade.analyze_cached(&params.user_id, days, key),
            None => self.facade.analyze(&params.user_id, days),
        }
        .map_err(tool_error)?;

        to_json(&summary)
    }

    /// Per-user storage statistics.
    #[tool(description = "Get memory statistics for a user: totals, emotionally tagged turns, sessions, counts by sender, time span.")]
    async fn memory_stats(
        &self,
        Parameters(params): Parameters<MemoryStatsParams>,
    ) -> Result<String, String> {
        tracing::info!(user_id = %params.user_id, "memory_stats called");
        let stats = self.facade.stats(&params.user_id).await.map_err(tool_error)?;
        to_json(&stats)
    }
}

#[tool_handler]
impl ServerHandler for AuraTools {
    fn get_info(&self) -> rmcp::model::ServerInfo {
        rmcp::model::ServerInfo {
            instructions: Some(
                "Aura is a companion memory server. Use store_memory to save each turn, \
                 search_memories to recall related turns, and analyze_emotional_patterns \
                 to see how the user has been feeling."
                    .into(),
            ),
            capabilities: rmcp::model::ServerCapabilities::builder()
                .enable_tools()
                .build(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::hashed::HashedEmbeddingProvider;
    use crate::memory::RecordStore;

    async fn tools() -> AuraTools {
        let store = Arc::new(RecordStore::open_in_memory().await.unwrap());
        let facade = MemoryFacade::new(store, Arc::new(HashedEmbeddingProvider::new()));
        AuraTools::new(Arc::new(facade))
    }

    fn store_params(message: &str, emotional_state: Option<&str>) -> StoreMemoryParams {
        StoreMemoryParams {
            user_id: "u1".into(),
            message: message.into(),
            sender: "user".into(),
            emotional_state: emotional_state.map(String::from),
            cognitive_focus: None,
            session_id: None,
        }
    }

    #[tokio::test]
    async fn store_and_analyze_through_tools() {
        let t = tools().await;
        let out = t
            .store_memory(Parameters(store_params("I feel great today", Some("Happy:High"))))
            .await
            .unwrap();
        let stored: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(stored["status"], "stored");

        let out = t
            .analyze_emotional_patterns(Parameters(AnalyzePatternsParams {
                user_id: "u1".into(),
                days: None,
                cache_key: None,
            }))
            .await
            .unwrap();
        let summary: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(summary["total"], 1);
        assert_eq!(summary["emotion_distribution"]["Happy"], 1);
    }

    #[tokio::test]
    async fn invalid_emotion_is_a_tool_error() {
        let t = tools().await;
        let err = t
            .store_memory(Parameters(store_params("hi", Some("Ecstatic:High"))))
            .await
            .unwrap_err();
        assert!(err.starts_with("invalid input"), "{err}");
    }

    #[tokio::test]
    async fn huge_analysis_window_is_not_an_error() {
        let t = tools().await;
        t.store_memory(Parameters(store_params("steady week", Some("Peace:Low"))))
            .await
            .unwrap();
        let out = t
            .analyze_emotional_patterns(Parameters(AnalyzePatternsParams {
                user_id: "u1".into(),
                days: Some(u32::MAX),
                cache_key: None,
            }))
            .await
            .unwrap();
        let summary: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(summary["total"], 1);
    }

    #[tokio::test]
    async fn search_returns_results_json() {
        let t = tools().await;
        t.store_memory(Parameters(store_params("the dog loved the park", None)))
            .await
            .unwrap();
        let out = t
            .search_memories(Parameters(SearchMemoriesParams {
                user_id: "u1".into(),
                query: "dog park".into(),
                n_results: Some(3),
                sender: None,
                cognitive_focus: None,
                from: None,
                to: None,
            }))
            .await
            .unwrap();
        let v: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(v["total"], 1);
    }
}
