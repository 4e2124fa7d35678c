use serde::{Deserialize, Serialize};

/// Emotion tag attached to every diary entry.
///
/// The wire value is the Korean word the server stores; `label` is the
/// English rendering shown in the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Emotion {
    #[serde(rename = "행복")]
    Happy,
    #[serde(rename = "슬픔")]
    Sad,
    #[serde(rename = "화남")]
    Angry,
    #[serde(rename = "불안")]
    Anxious,
    #[serde(rename = "평온")]
    Calm,
    #[serde(rename = "설렘")]
    Excited,
    #[serde(rename = "우울")]
    Gloomy,
    #[serde(rename = "감사")]
    Grateful,
}

impl Emotion {
    pub const ALL: [Emotion; 8] = [
        Emotion::Happy,
        Emotion::Sad,
        Emotion::Angry,
        Emotion::Anxious,
        Emotion::Calm,
        Emotion::Excited,
        Emotion::Gloomy,
        Emotion::Grateful,
    ];

    /// Value sent to and received from the server.
    pub fn value(&self) -> &'static str {
        match self {
            Emotion::Happy => "행복",
            Emotion::Sad => "슬픔",
            Emotion::Angry => "화남",
            Emotion::Anxious => "불안",
            Emotion::Calm => "평온",
            Emotion::Excited => "설렘",
            Emotion::Gloomy => "우울",
            Emotion::Grateful => "감사",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Emotion::Happy => "Happy",
            Emotion::Sad => "Sad",
            Emotion::Angry => "Angry",
            Emotion::Anxious => "Anxious",
            Emotion::Calm => "Calm",
            Emotion::Excited => "Excited",
            Emotion::Gloomy => "Gloomy",
            Emotion::Grateful => "Grateful",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Emotion::Happy => "😊",
            Emotion::Sad => "😢",
            Emotion::Angry => "😠",
            Emotion::Anxious => "😰",
            Emotion::Calm => "😌",
            Emotion::Excited => "🥰",
            Emotion::Gloomy => "😔",
            Emotion::Grateful => "🙏",
        }
    }

    /// Look up an emotion by its server value.
    pub fn from_value(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|e| e.value() == value)
    }

    /// Next emotion in catalog order (wrapping around)
    pub fn next(&self) -> Self {
        let idx = Self::ALL.iter().position(|e| e == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// Previous emotion in catalog order (wrapping around)
    pub fn prev(&self) -> Self {
        let idx = Self::ALL.iter().position(|e| e == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl std::fmt::Display for Emotion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.emoji(), self.label())
    }
}
