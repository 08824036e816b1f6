use anyhow::Result;

use aura_memory::config::AuraConfig;
use aura_memory::memory::{DominantEmotion, PatternAnalyzer};

/// Print an emotional pattern summary for the last `days` days.
pub async fn analyze(config: &AuraConfig, user_id: &str, days: Option<u32>) -> Result<()> {
    let store = super::open_store(config).await?;
    let days = days.unwrap_or(config.analysis.default_days);
    let summary = PatternAnalyzer::new(config.analysis.trend_threshold).analyze(&store, user_id, days)?;

    println!("Emotional Patterns for {user_id} (last {days} days)");
    println!("{}", "=".repeat(40));
    println!("  Records:             {}", summary.total);
    println!("  Emotionally tagged:  {}", summary.tagged);

    match summary.dominant_emotion {
        DominantEmotion::NoData => println!("  Dominant emotion:    (no data)"),
        DominantEmotion::Emotion(e) => {
            let intensity = summary
                .dominant_intensity
                .map(|i| i.to_string())
                .unwrap_or_default();
            println!("  Dominant emotion:    {e} {intensity}");
        }
    }
    println!("  Trend:               {:?}", summary.trend);
    if let (Some(earlier), Some(later)) = (summary.earlier_valence, summary.later_valence) {
        println!("  Valence:             {earlier:+.2} -> {later:+.2}");
    }
    println!();

    if !summary.emotion_distribution.is_empty() {
        println!("Emotions:");
        for (emotion, count) in &summary.emotion_distribution {
            println!("  {:<16} {}", emotion.as_str(), count);
        }
        println!();
    }

    if !summary.focus_distribution.is_empty() {
        println!("Cognitive focus:");
        for (focus, count) in &summary.focus_distribution {
            println!("  {:<28} {}", focus.description(), count);
        }
        println!();
    }

    if let Some(correlates) = &summary.correlates {
        println!(
            "Correlates:            {:?} waves; {:?}",
            correlates.brainwave, correlates.neurotransmitters
        );
        println!();
    }

    println!("Recommendations:");
    for hint in &summary.recommendations {
        println!("  - {hint}");
    }

    Ok(())
}
