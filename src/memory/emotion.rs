//! Closed emotional and cognitive vocabularies.
//!
//! Defines [`Emotion`], [`Intensity`] and the combined [`EmotionalState`]
//! token (`Emotion:Intensity`), the fixed [`valence`](Emotion::valence) and
//! [`correlates`](Emotion::correlates) lookup tables, and the ASEKE
//! [`CognitiveFocus`] taxonomy. Every vocabulary parses strictly: an unknown
//! token is a [`ValidationError`], never a default value.

use serde::{Deserialize, Serialize};

use crate::memory::error::ValidationError;

/// Emotional states a conversational turn can be tagged with.
///
/// Declaration order is significant: it is the final tie-break when picking a
/// dominant emotion, and it is the iteration order of frequency tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Emotion {
    Normal,
    Happy,
    Excited,
    Joy,
    Love,
    Friendliness,
    Peace,
    Hope,
    Gratitude,
    Curiosity,
    Creativity,
    Awe,
    Surprise,
    DeepMeditation,
    Sad,
    Angry,
    Fear,
    Anxiety,
    Disgust,
    Shame,
    Guilt,
    Envy,
}

impl Emotion {
    /// Every emotion, in declaration order.
    pub const ALL: [Emotion; 22] = [
        Self::Normal,
        Self::Happy,
        Self::Excited,
        Self::Joy,
        Self::Love,
        Self::Friendliness,
        Self::Peace,
        Self::Hope,
        Self::Gratitude,
        Self::Curiosity,
        Self::Creativity,
        Self::Awe,
        Self::Surprise,
        Self::DeepMeditation,
        Self::Sad,
        Self::Angry,
        Self::Fear,
        Self::Anxiety,
        Self::Disgust,
        Self::Shame,
        Self::Guilt,
        Self::Envy,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::Happy => "Happy",
            Self::Excited => "Excited",
            Self::Joy => "Joy",
            Self::Love => "Love",
            Self::Friendliness => "Friendliness",
            Self::Peace => "Peace",
            Self::Hope => "Hope",
            Self::Gratitude => "Gratitude",
            Self::Curiosity => "Curiosity",
            Self::Creativity => "Creativity",
            Self::Awe => "Awe",
            Self::Surprise => "Surprise",
            Self::DeepMeditation => "DeepMeditation",
            Self::Sad => "Sad",
            Self::Angry => "Angry",
            Self::Fear => "Fear",
            Self::Anxiety => "Anxiety",
            Self::Disgust => "Disgust",
            Self::Shame => "Shame",
            Self::Guilt => "Guilt",
            Self::Envy => "Envy",
        }
    }

    /// Coarse valence, used only for trend direction.
    pub fn valence(&self) -> Valence {
        match self {
            Self::Happy
            | Self::Excited
            | Self::Joy
            | Self::Love
            | Self::Friendliness
            | Self::Peace
            | Self::Hope
            | Self::Gratitude
            | Self::Creativity
            | Self::Awe => Valence::Positive,
            Self::Normal | Self::Curiosity | Self::Surprise | Self::DeepMeditation => {
                Valence::Neutral
            }
            Self::Sad
            | Self::Angry
            | Self::Fear
            | Self::Anxiety
            | Self::Disgust
            | Self::Shame
            | Self::Guilt
            | Self::Envy => Valence::Negative,
        }
    }

    /// Physiological correlates. Informational only; no decision reads these.
    pub fn correlates(&self) -> Correlates {
        use BrainwaveBand::*;
        use Neurotransmitter::*;

        let (brainwave, neurotransmitters): (BrainwaveBand, &'static [Neurotransmitter]) =
            match self {
                Self::Normal => (Alpha, &[Serotonin]),
                Self::Happy => (Beta, &[Serotonin, Dopamine]),
                Self::Excited => (Beta, &[Dopamine, Norepinephrine]),
                Self::Joy => (Gamma, &[Endorphins, Dopamine]),
                Self::Love => (Alpha, &[Oxytocin, Dopamine]),
                Self::Friendliness => (Alpha, &[Oxytocin]),
                Self::Peace => (Theta, &[Gaba, Serotonin]),
                Self::Hope => (Alpha, &[Dopamine]),
                Self::Gratitude => (Alpha, &[Serotonin, Oxytocin]),
                Self::Curiosity => (Beta, &[Dopamine, Acetylcholine]),
                Self::Creativity => (Theta, &[Dopamine]),
                Self::Awe => (Gamma, &[Norepinephrine, Dopamine]),
                Self::Surprise => (Beta, &[Norepinephrine]),
                Self::DeepMeditation => (Delta, &[Serotonin, Gaba]),
                Self::Sad => (Alpha, &[Cortisol]),
                Self::Angry => (Beta, &[Norepinephrine, Adrenaline]),
                Self::Fear => (Beta, &[Adrenaline, Cortisol]),
                Self::Anxiety => (Beta, &[Cortisol, Norepinephrine]),
                Self::Disgust => (Beta, &[Serotonin]),
                Self::Shame => (Alpha, &[Cortisol]),
                Self::Guilt => (Alpha, &[Cortisol]),
                Self::Envy => (Beta, &[Cortisol, Dopamine]),
            };

        Correlates {
            brainwave,
            neurotransmitters: neurotransmitters.to_vec(),
        }
    }
}

impl std::fmt::Display for Emotion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Emotion {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|e| e.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownEmotion(s.to_string()))
    }
}

/// How strongly an emotion was expressed. Totally ordered: `Low < Medium < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Intensity {
    Low,
    Medium,
    High,
}

impl Intensity {
    pub const ALL: [Intensity; 3] = [Self::Low, Self::Medium, Self::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl std::fmt::Display for Intensity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Intensity {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Low" => Ok(Self::Low),
            "Medium" => Ok(Self::Medium),
            "High" => Ok(Self::High),
            _ => Err(ValidationError::UnknownIntensity(s.to_string())),
        }
    }
}

/// An `(Emotion, Intensity)` pair.
///
/// The wire token is `Emotion:Intensity`, e.g. `Happy:Medium`. Parsing is
/// case-sensitive, untrimmed, and requires exactly one `:`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EmotionalState {
    pub emotion: Emotion,
    pub intensity: Intensity,
}

impl EmotionalState {
    pub fn new(emotion: Emotion, intensity: Intensity) -> Self {
        Self { emotion, intensity }
    }
}

impl std::fmt::Display for EmotionalState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.emotion, self.intensity)
    }
}

impl std::str::FromStr for EmotionalState {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(':');
        let (Some(emotion), Some(intensity), None) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(ValidationError::MalformedEmotionalState(s.to_string()));
        };
        Ok(Self {
            emotion: emotion.parse()?,
            intensity: intensity.parse()?,
        })
    }
}

/// Coarse affective direction of an emotion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Valence {
    Negative,
    Neutral,
    Positive,
}

impl Valence {
    /// Numeric score used for trend averages.
    pub fn score(&self) -> f64 {
        match self {
            Self::Negative => -1.0,
            Self::Neutral => 0.0,
            Self::Positive => 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BrainwaveBand {
    Delta,
    Theta,
    Alpha,
    Beta,
    Gamma,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Neurotransmitter {
    Dopamine,
    Serotonin,
    Oxytocin,
    Endorphins,
    Norepinephrine,
    #[serde(rename = "GABA")]
    Gaba,
    Cortisol,
    Acetylcholine,
    Adrenaline,
}

/// Brainwave band and neurotransmitters associated with an emotion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Correlates {
    pub brainwave: BrainwaveBand,
    pub neurotransmitters: Vec<Neurotransmitter>,
}

/// What aspect of reasoning a turn engaged: the seven ASEKE components plus
/// general learning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CognitiveFocus {
    /// Knowledge Substrate
    #[serde(rename = "KS")]
    KnowledgeSubstrate,
    /// Cognitive Energy
    #[serde(rename = "CE")]
    CognitiveEnergy,
    /// Information Structures
    #[serde(rename = "IS")]
    InformationStructures,
    /// Knowledge Integration
    #[serde(rename = "KI")]
    KnowledgeIntegration,
    /// Knowledge Propagation
    #[serde(rename = "KP")]
    KnowledgePropagation,
    /// Emotional State Algorithms
    #[serde(rename = "ESA")]
    EmotionalStateAlgorithms,
    /// Sociobiological Drives
    #[serde(rename = "SDA")]
    SociobiologicalDrives,
    Learning,
}

impl CognitiveFocus {
    pub const ALL: [CognitiveFocus; 8] = [
        Self::KnowledgeSubstrate,
        Self::CognitiveEnergy,
        Self::InformationStructures,
        Self::KnowledgeIntegration,
        Self::KnowledgePropagation,
        Self::EmotionalStateAlgorithms,
        Self::SociobiologicalDrives,
        Self::Learning,
    ];

    /// Canonical code (`KS`, `CE`, ..., `Learning`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::KnowledgeSubstrate => "KS",
            Self::CognitiveEnergy => "CE",
            Self::InformationStructures => "IS",
            Self::KnowledgeIntegration => "KI",
            Self::KnowledgePropagation => "KP",
            Self::EmotionalStateAlgorithms => "ESA",
            Self::SociobiologicalDrives => "SDA",
            Self::Learning => "Learning",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::KnowledgeSubstrate => "Knowledge Substrate",
            Self::CognitiveEnergy => "Cognitive Energy",
            Self::InformationStructures => "Information Structures",
            Self::KnowledgeIntegration => "Knowledge Integration",
            Self::KnowledgePropagation => "Knowledge Propagation",
            Self::EmotionalStateAlgorithms => "Emotional State Algorithms",
            Self::SociobiologicalDrives => "Sociobiological Drives",
            Self::Learning => "Learning",
        }
    }
}

impl std::fmt::Display for CognitiveFocus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CognitiveFocus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownCognitiveFocus(s.to_string()))
    }
}
