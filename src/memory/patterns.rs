//! Emotional pattern analysis over a window of a user's records.
//!
//! [`summarize`] is a pure function of the records it is given; the
//! [`PatternAnalyzer`] only adds the window lookup against the record store.
//!
//! The trend compares mean valence of the earlier and later halves of the
//! emotion-tagged records (earlier half = first `n / 2`). Fewer than two tagged
//! records is always [`Trend::Stable`].

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::memory::emotion::{CognitiveFocus, Correlates, Emotion, Intensity, Valence};
use crate::memory::error::{Result, ValidationError};
use crate::memory::store::RecordStore;
use crate::memory::types::{MemoryRecord, TimeWindow};

pub const DEFAULT_TREND_THRESHOLD: f64 = 0.15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Improving,
    Declining,
    Stable,
}

/// The most frequent emotion in a window, or an explicit marker when the
/// window holds no emotion-tagged records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DominantEmotion {
    NoData,
    Emotion(Emotion),
}

impl DominantEmotion {
    pub fn emotion(&self) -> Option<Emotion> {
        match self {
            Self::NoData => None,
            Self::Emotion(e) => Some(*e),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionalPatternSummary {
    pub user_id: String,
    /// Window length the caller asked for.
    pub requested_days: u32,
    /// Span actually covered: first record to just after the last. `None`
    /// when the window is empty.
    pub window: Option<TimeWindow>,
    pub total: usize,
    /// Records carrying an emotional state.
    pub tagged: usize,
    pub emotion_distribution: BTreeMap<Emotion, usize>,
    pub intensity_distribution: BTreeMap<Intensity, usize>,
    pub focus_distribution: BTreeMap<CognitiveFocus, usize>,
    pub dominant_emotion: DominantEmotion,
    pub dominant_intensity: Option<Intensity>,
    pub trend: Trend,
    pub earlier_valence: Option<f64>,
    pub later_valence: Option<f64>,
    /// Brainwave/neurotransmitter correlates of the dominant emotion.
    pub correlates: Option<Correlates>,
    pub recommendations: Vec<String>,
}

/// Summarize `records`, which must be in timestamp order.
pub fn summarize(
    user_id: &str,
    requested_days: u32,
    records: &[MemoryRecord],
    trend_threshold: f64,
) -> EmotionalPatternSummary {
    let mut emotion_distribution = BTreeMap::new();
    let mut intensity_distribution = BTreeMap::new();
    let mut focus_distribution = BTreeMap::new();
    let mut last_seen: HashMap<Emotion, DateTime<Utc>> = HashMap::new();
    let mut tagged = Vec::new();

    for record in records {
        if let Some(focus) = record.cognitive_focus {
            *focus_distribution.entry(focus).or_insert(0) += 1;
        }
        if let Some(state) = record.emotional_state {
            *emotion_distribution.entry(state.emotion).or_insert(0) += 1;
            *intensity_distribution.entry(state.intensity).or_insert(0) += 1;
            last_seen.insert(state.emotion, record.timestamp);
            tagged.push(state.emotion);
        }
    }

    let dominant_emotion = emotion_distribution
        .iter()
        .max_by(|(a, count_a), (b, count_b)| {
            count_a
                .cmp(count_b)
                .then_with(|| last_seen.get(*a).cmp(&last_seen.get(*b)))
                // earlier declaration wins
                .then_with(|| b.cmp(a))
        })
        .map_or(DominantEmotion::NoData, |(e, _)| DominantEmotion::Emotion(*e));

    let dominant_intensity = intensity_distribution
        .iter()
        .max_by(|(a, count_a), (b, count_b)| count_a.cmp(count_b).then_with(|| a.cmp(b)))
        .map(|(i, _)| *i);

    let (earlier_valence, later_valence, trend) = if tagged.len() < 2 {
        (None, None, Trend::Stable)
    } else {
        let (earlier, later) = tagged.split_at(tagged.len() / 2);
        let earlier = mean_valence(earlier);
        let later = mean_valence(later);
        let trend = if later - earlier > trend_threshold {
            Trend::Improving
        } else if earlier - later > trend_threshold {
            Trend::Declining
        } else {
            Trend::Stable
        };
        (Some(earlier), Some(later), trend)
    };

    let window = match (records.first(), records.last()) {
        (Some(first), Some(last)) => Some(TimeWindow {
            start: first.timestamp,
            end: last.timestamp + Duration::microseconds(1),
        }),
        _ => None,
    };

    EmotionalPatternSummary {
        user_id: user_id.to_string(),
        requested_days,
        window,
        total: records.len(),
        tagged: tagged.len(),
        emotion_distribution,
        intensity_distribution,
        focus_distribution,
        correlates: dominant_emotion.emotion().map(|e| e.correlates()),
        recommendations: recommendations(dominant_emotion, dominant_intensity, trend),
        dominant_emotion,
        dominant_intensity,
        trend,
        earlier_valence,
        later_valence,
    }
}

fn mean_valence(emotions: &[Emotion]) -> f64 {
    let sum: f64 = emotions.iter().map(|e| e.valence().score()).sum();
    sum / emotions.len() as f64
}

/// Hints for the companion. Always returns at least one.
pub fn recommendations(
    dominant: DominantEmotion,
    intensity: Option<Intensity>,
    trend: Trend,
) -> Vec<String> {
    let Some(emotion) = dominant.emotion() else {
        return vec![
            "No emotional data in this window yet; invite the user to share how they are feeling."
                .into(),
        ];
    };

    let mut hints = Vec::new();
    match (emotion.valence(), intensity) {
        (Valence::Negative, Some(Intensity::High)) => hints.push(format!(
            "Strong {emotion} dominates; offer a supportive follow-up and check in on wellbeing."
        )),
        (Valence::Negative, _) => hints.push(format!(
            "{emotion} dominates; gently explore what is weighing on them."
        )),
        (Valence::Positive, _) if trend != Trend::Declining => hints.push(format!(
            "{emotion} dominates; encourage whatever is going well."
        )),
        _ => {}
    }
    match trend {
        Trend::Declining => {
            hints.push("Mood is trending down; follow up on recent stressors.".into())
        }
        Trend::Improving => {
            hints.push("Mood is improving; reinforce what has been helping.".into())
        }
        Trend::Stable => {}
    }
    if hints.is_empty() {
        hints.push("Emotional state appears stable; keep up regular check-ins.".into());
    }
    hints
}

/// Runs [`summarize`] over a window of the record store.
#[derive(Debug, Clone, Copy)]
pub struct PatternAnalyzer {
    trend_threshold: f64,
}

impl Default for PatternAnalyzer {
    fn default() -> Self {
        Self::new(DEFAULT_TREND_THRESHOLD)
    }
}

impl PatternAnalyzer {
    pub fn new(trend_threshold: f64) -> Self {
        Self { trend_threshold }
    }

    pub fn trend_threshold(&self) -> f64 {
        self.trend_threshold
    }

    /// Summarize the last `days` of `user_id`'s records.
    ///
    /// The window ends at the user's logical now: the wall clock, or just
    /// after the newest record if the store has assigned timestamps ahead of
    /// it. History shorter than the window is simply what is returned.
    pub fn analyze(
        &self,
        store: &RecordStore,
        user_id: &str,
        days: u32,
    ) -> Result<EmotionalPatternSummary> {
        if user_id.trim().is_empty() {
            return Err(ValidationError::EmptyUserId.into());
        }
        if days == 0 {
            return Err(ValidationError::EmptyWindow.into());
        }

        let now = Utc::now();
        let end = match store.latest_timestamp(user_id)? {
            Some(latest) if latest >= now => latest + Duration::microseconds(1),
            _ => now,
        };
        let start = end
            .checked_sub_signed(Duration::days(i64::from(days)))
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        let records = store.range(user_id, start, end)?;

        tracing::debug!(user_id, days, records = records.len(), "analyzing window");

        Ok(summarize(user_id, days, &records, self.trend_threshold))
    }
}
