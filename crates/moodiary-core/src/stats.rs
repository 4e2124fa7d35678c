//! Emotion statistics for the stats screen.

use std::collections::BTreeMap;

use crate::models::{Diary, Emotion};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmotionStats {
    counts: BTreeMap<Emotion, usize>,
    /// Entries whose emotion tag is not in the catalog
    pub untagged: usize,
    pub total: usize,
}

impl EmotionStats {
    pub fn from_diaries(diaries: &[Diary]) -> Self {
        let mut stats = Self::default();
        for diary in diaries {
            stats.total += 1;
            match diary.emotion_kind() {
                Some(emotion) => *stats.counts.entry(emotion).or_insert(0) += 1,
                None => stats.untagged += 1,
            }
        }
        stats
    }

    pub fn count(&self, emotion: Emotion) -> usize {
        self.counts.get(&emotion).copied().unwrap_or(0)
    }

    /// Share of all entries tagged `emotion`, in percent
    pub fn percent(&self, emotion: Emotion) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.count(emotion) as f64 * 100.0 / self.total as f64
        }
    }

    /// Every catalog emotion with its count, most frequent first.
    /// Ties keep catalog order.
    pub fn ranked(&self) -> Vec<(Emotion, usize)> {
        let mut ranked: Vec<(Emotion, usize)> =
            Emotion::ALL.iter().map(|e| (*e, self.count(*e))).collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }

    pub fn dominant(&self) -> Option<Emotion> {
        self.ranked()
            .first()
            .filter(|(_, count)| *count > 0)
            .map(|(emotion, _)| *emotion)
    }
}
