//! MCP `search_memories` tool parameter definition.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::memory::SearchRequest;

/// Parameters for the `search_memories` MCP tool.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct SearchMemoriesParams {
    #[schemars(description = "Whose memories to search")]
    pub user_id: String,

    #[schemars(description = "Natural language query")]
    pub query: String,

    /// Maximum number of results to return (1–20). Defaults to 5.
    #[schemars(description = "Maximum number of results to return (1-20). Defaults to 5.")]
    pub n_results: Option<usize>,

    #[schemars(description = "Only return turns from this sender: 'user', 'companion', 'agent', 'system'")]
    pub sender: Option<String>,

    #[schemars(description = "Only return turns tagged with this ASEKE code")]
    pub cognitive_focus: Option<String>,

    #[schemars(description = "Only return turns at or after this RFC 3339 timestamp")]
    pub from: Option<DateTime<Utc>>,

    #[schemars(description = "Only return turns before this RFC 3339 timestamp")]
    pub to: Option<DateTime<Utc>>,
}

impl From<SearchMemoriesParams> for SearchRequest {
    fn from(p: SearchMemoriesParams) -> Self {
        Self {
            user_id: p.user_id,
            query: p.query,
            n_results: p.n_results,
            sender: p.sender,
            cognitive_focus: p.cognitive_focus,
            from: p.from,
            to: p.to,
        }
    }
}
