use anyhow::Result;

use aura_memory::config::AuraConfig;
use aura_memory::memory::Sender;

/// Display a user's memory statistics in the terminal.
pub async fn stats(config: &AuraConfig, user_id: &str) -> Result<()> {
    let store = super::open_store(config).await?;
    let response = store.stats(user_id).await?;

    println!("Memory Statistics for {user_id}");
    println!("{}", "=".repeat(40));
    println!("  Total memories:      {}", response.total_memories);
    println!("  Emotionally tagged:  {}", response.with_emotional_state);
    println!("  Sessions:            {}", response.sessions);
    println!();

    println!("By Sender:");
    for sender in Sender::ALL {
        let count = response.by_sender.get(sender.as_str()).copied().unwrap_or(0);
        println!("  {:<12} {}", sender.as_str(), count);
    }
    println!();

    println!("Database size:         {} bytes", response.db_size_bytes);

    if let Some(oldest) = response.oldest_memory {
        println!("Oldest memory:         {}", oldest.to_rfc3339());
    }
    if let Some(newest) = response.newest_memory {
        println!("Newest memory:         {}", newest.to_rfc3339());
    }

    Ok(())
}
