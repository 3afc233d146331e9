//! The persisted user document.

use crate::TimestampMs;
use crate::progress::Progress;
use crate::quest::basic::ActiveBasicQuest;
use crate::stats::{BaseStats, Substat, TotalStats, Vitality};

/// Cosmetic customization, carried through storage untouched.
///
/// These are opaque pass-through strings; nothing in the core interprets
/// them.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Cosmetics {
    pub avatar_url: Option<String>,
    pub banner_url: Option<String>,
    pub top_image_url: Option<String>,
    pub side_image_url: Option<String>,
    pub quick_image_url: Option<String>,
    pub header_image_url: Option<String>,
    pub theme_color: Option<String>,
    pub border_color: Option<String>,
    pub show_borders: Option<bool>,
}

/// A user's whole persisted record.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UserProfile {
    pub id: String,
    pub display_name: String,
    pub email: String,
    pub stats: BaseStats,
    #[cfg_attr(feature = "serde", serde(default))]
    pub custom_stats: Vec<Substat>,
    pub level: u32,
    pub experience: u32,
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub vitality: Vitality,
    #[cfg_attr(feature = "serde", serde(default))]
    pub active_quests: Vec<ActiveBasicQuest>,
    pub created_at: TimestampMs,
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub cosmetics: Cosmetics,
}

impl UserProfile {
    /// The sign-up document: level 1, no experience, full vitality, every
    /// domain at 10.
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        email: impl Into<String>,
        created_at: TimestampMs,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            email: email.into(),
            stats: BaseStats::default(),
            custom_stats: Vec::new(),
            level: 1,
            experience: 0,
            vitality: Vitality::full(),
            active_quests: Vec::new(),
            created_at,
            cosmetics: Cosmetics::default(),
        }
    }

    pub fn progress(&self) -> Progress {
        Progress::new(self.level, self.experience)
    }

    /// Displayed totals: base values plus live substat contributions.
    pub fn total_stats(&self) -> TotalStats {
        TotalStats::compute(&self.stats, &self.custom_stats)
    }

    pub fn find_substat(&self, name: &str) -> Option<&Substat> {
        self.custom_stats.iter().find(|s| s.name == name)
    }
}
