//! User-authored quests and their reward payloads.

use std::collections::BTreeMap;

use strum::{Display, EnumIter, EnumString};

use crate::TimestampMs;
use crate::stats::StatKey;

/// Cadence of a user-authored quest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumIter, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum QuestKind {
    Daily,
    Weekly,
    Achievement,
    Habit,
}

/// Difficulty tier, driving the default experience grant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumIter, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Epic,
}

impl Difficulty {
    /// Default experience for a freshly authored quest of this tier.
    pub const fn base_experience(self) -> u32 {
        match self {
            Self::Easy => 50,
            Self::Medium => 100,
            Self::Hard => 200,
            Self::Epic => 400,
        }
    }
}

/// Experience plus per-domain boosts granted on completion.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QuestRewards {
    pub experience: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub stats: BTreeMap<StatKey, u32>,
}

impl QuestRewards {
    pub fn new(experience: u32) -> Self {
        Self {
            experience,
            stats: BTreeMap::new(),
        }
    }

    pub fn with_stat(mut self, key: StatKey, boost: u32) -> Self {
        self.stats.insert(key, boost);
        self
    }
}

/// A completable task authored by (and owned by) a single user.
///
/// `completed` is a one-way transition: once flipped, the quest can never
/// grant again.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Quest {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub description: String,
    pub kind: QuestKind,
    pub difficulty: Difficulty,
    pub completed: bool,
    pub created_at: TimestampMs,
    pub completed_at: Option<TimestampMs>,
    pub rewards: QuestRewards,
    /// Substat boosts keyed by substat name. Names with no matching
    /// substat on the profile are skipped at completion time.
    #[cfg_attr(feature = "serde", serde(default))]
    pub substat_boosts: BTreeMap<String, u32>,
}

impl Quest {
    /// A fresh, uncompleted quest with the tier's default experience.
    pub fn new(
        id: impl Into<String>,
        user_id: impl Into<String>,
        title: impl Into<String>,
        kind: QuestKind,
        difficulty: Difficulty,
        created_at: TimestampMs,
    ) -> Self {
        Self {
            id: id.into(),
            user_id: user_id.into(),
            title: title.into(),
            description: String::new(),
            kind,
            difficulty,
            completed: false,
            created_at,
            completed_at: None,
            rewards: QuestRewards::new(difficulty.base_experience()),
            substat_boosts: BTreeMap::new(),
        }
    }
}
