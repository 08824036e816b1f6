use anyhow::Result;
use serde::Serialize;

use aura_memory::config::AuraConfig;
use aura_memory::memory::{EmotionalPatternSummary, MemoryRecord, PatternAnalyzer};

/// Export format: a user's records plus a pattern summary over the default window.
#[derive(Debug, Serialize)]
struct ExportData {
    user_id: String,
    records: Vec<MemoryRecord>,
    summary: EmotionalPatternSummary,
}

/// Export all of a user's memories as JSON to stdout.
pub async fn export(config: &AuraConfig, user_id: &str) -> Result<()> {
    let store = super::open_store(config).await?;
    let analyzer = PatternAnalyzer::new(config.analysis.trend_threshold);

    let data = ExportData {
        user_id: user_id.to_string(),
        records: store.records(user_id)?,
        summary: analyzer.analyze(&store, user_id, config.analysis.default_days)?,
    };

    let json = serde_json::to_string_pretty(&data)?;
    println!("{json}");

    eprintln!("Exported {} memories.", data.records.len());

    Ok(())
}
