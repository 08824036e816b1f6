use anyhow::Result;

use aura_memory::config::AuraConfig;
use aura_memory::memory::SearchRequest;

/// Run a semantic search from the terminal.
pub async fn search(config: &AuraConfig, user_id: &str, query: &str, n: Option<usize>) -> Result<()> {
    let facade = aura_memory::server::setup_shared_state(config).await?;

    let request = SearchRequest {
        n_results: n,
        ..SearchRequest::new(user_id, query)
    };
    let hits = facade.search(request).await?;

    if hits.is_empty() {
        println!("No results found.");
        return Ok(());
    }

    println!("Found {} result(s)\n", hits.len());

    for (i, hit) in hits.iter().enumerate() {
        let record = &hit.record;
        let preview: String = if record.text.chars().count() > 120 {
            format!("{}...", record.text.chars().take(120).collect::<String>())
        } else {
            record.text.clone()
        };
        let emotion = record
            .emotional_state
            .map(|s| s.to_string())
            .unwrap_or_else(|| "-".into());

        println!(
            "  {}. [{}] {} {} (emotion: {}, score: {:.4})",
            i + 1,
            record.sender,
            record.timestamp.format("%Y-%m-%d %H:%M"),
            record.id,
            emotion,
            hit.score,
        );
        println!("     {}", preview);
        println!();
    }

    Ok(())
}
