use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::store::StoreError;

/// The four practice item namespaces. Each gets its own arm partition per
/// learner; mechanics are shared and parameterized by [`KindProfile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    #[serde(rename = "letter")]
    Letter,
    #[serde(rename = "twoLetterWord")]
    TwoLetterWord,
    #[serde(rename = "word")]
    Word,
    #[serde(rename = "sentence")]
    Sentence,
}

impl ItemKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Letter => "letter",
            Self::TwoLetterWord => "twoLetterWord",
            Self::Word => "word",
            Self::Sentence => "sentence",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "letter" => Some(Self::Letter),
            "twoLetterWord" => Some(Self::TwoLetterWord),
            "word" => Some(Self::Word),
            "sentence" => Some(Self::Sentence),
            _ => None,
        }
    }
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a scored attempt is turned into a reward for this item type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewardPolicy {
    /// Phonetic-variant match against the target letter.
    Letter,
    /// Exact / substring / positional scoring for two-letter words.
    TwoLetter,
    /// Normalized-equality correctness blended with a fluency term;
    /// used by words and sentences.
    Spoken,
}

/// Per-item-type behavior of the scheduler: one algorithm, four
/// instantiations.
#[derive(Debug, Clone, Copy)]
pub struct KindProfile {
    pub kind: ItemKind,
    pub epsilon: f64,
    /// Weak-letter candidate ranking before selection.
    pub uses_ranker: bool,
    /// Recently-shown filter; also controls whether `last_shown_at` is
    /// stamped on activation.
    pub cooldown: Option<Duration>,
    pub policy: RewardPolicy,
    /// Mismatched letters of a failed attempt penalize their letter arms.
    pub propagates: bool,
    /// Every expected letter is reinforced with the attempt reward.
    pub reinforces_letters: bool,
}

impl KindProfile {
    pub fn tracks_last_shown(&self) -> bool {
        self.cooldown.is_some()
    }
}

/// Per-learner, per-item bandit statistics. `avg_reward` is the exact mean
/// of every reward ever applied, propagated penalties included, and is not
/// clamped; repeated penalization can drive it negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Arm {
    pub learner_id: String,
    pub kind: ItemKind,
    pub item_id: String,
    pub pulls: i64,
    pub total_reward: f64,
    pub avg_reward: f64,
    pub is_active: bool,
    pub last_shown_at: Option<DateTime<Utc>>,
}

impl Arm {
    pub fn new(learner_id: impl Into<String>, kind: ItemKind, item_id: impl Into<String>) -> Self {
        Self {
            learner_id: learner_id.into(),
            kind,
            item_id: item_id.into(),
            pulls: 0,
            total_reward: 0.0,
            avg_reward: 0.0,
            is_active: false,
            last_shown_at: None,
        }
    }
}

/// Result of the selection path: the activated item, ready to present.
#[derive(Debug, Clone)]
pub struct Selection {
    pub item_id: String,
    pub display_text: String,
    /// Weak letters that drove candidate ranking, when the kind ranks.
    pub target_letters: Option<Vec<char>>,
}

/// A scored attempt against the currently active arm. Transcription has
/// already happened by the time this reaches the scheduler.
#[derive(Debug, Clone)]
pub struct AttemptInput {
    pub item_id: String,
    pub expected: String,
    pub transcript: String,
    pub response_time_ms: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct AttemptOutcome {
    pub correct: bool,
    pub score: i32,
    pub reward: f64,
    pub pulls: i64,
    pub avg_reward: f64,
    pub problem_letters: Vec<char>,
    pub transcript: String,
}

#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("{0}")]
    Conflict(String),
    #[error("no candidates available for {0}")]
    NoCandidates(ItemKind),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_kind_round_trips_through_strings() {
        for kind in [
            ItemKind::Letter,
            ItemKind::TwoLetterWord,
            ItemKind::Word,
            ItemKind::Sentence,
        ] {
            assert_eq!(ItemKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(ItemKind::parse("phoneme"), None);
    }

    #[test]
    fn fresh_arm_has_default_statistics() {
        let arm = Arm::new("learner-1", ItemKind::Letter, "a");
        assert_eq!(arm.pulls, 0);
        assert_eq!(arm.avg_reward, 0.0);
        assert!(!arm.is_active);
        assert!(arm.last_shown_at.is_none());
    }
}
