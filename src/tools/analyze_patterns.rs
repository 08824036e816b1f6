//! MCP `analyze_emotional_patterns` tool parameter definition.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct AnalyzePatternsParams {
    #[schemars(description = "Whose emotional patterns to analyze")]
    pub user_id: String,

    #[schemars(description = "Window length in days, at least 1. Defaults to 7.")]
    pub days: Option<u32>,

    #[schemars(
        description = "Optional cache key. Repeated calls with the same key reuse the summary until the user stores a new memory."
    )]
    pub cache_key: Option<String>,
}
