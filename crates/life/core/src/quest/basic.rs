//! The randomly offered, time-boxed quest pool and its lifecycle.

use strum::{Display, EnumIter, EnumString};
use thiserror::Error;

use crate::TimestampMs;

use super::types::{Difficulty, QuestRewards};

/// Life-domain category a basic quest slots under (display grouping).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumIter, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum QuestCategory {
    Physical,
    Mental,
    Social,
    Creative,
    Knowledge,
    Spiritual,
}

/// A template from the fixed basic-quest pool.
///
/// Templates are not user-authored; the scheduler instantiates them into
/// a user's active list. `time_to_accept`/`time_to_complete` describe the
/// template's suggested pacing; the scheduler applies uniform windows.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BasicQuest {
    pub id: String,
    pub title: String,
    pub description: String,
    pub difficulty: Difficulty,
    pub category: QuestCategory,
    /// Suggested minutes the offer stays open.
    pub time_to_accept: u32,
    /// Suggested hours allowed for completion once accepted.
    pub time_to_complete: u32,
    pub rewards: QuestRewards,
}

/// Lifecycle state of an offered basic quest.
///
/// `Failed` exists in the stored schema but no transition currently
/// produces it; accepted quests keep their deadline informational.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumIter, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum QuestStatus {
    Available,
    Accepted,
    Completed,
    Failed,
    Expired,
}

/// Rejected basic-quest state transitions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum StatusError {
    #[error("quest can only be accepted while available (status: {0})")]
    NotAvailable(QuestStatus),

    #[error("quest can only be completed once accepted (status: {0})")]
    NotAccepted(QuestStatus),
}

/// A template instantiated into a user's active list.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActiveBasicQuest {
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub quest: BasicQuest,
    /// Acceptance deadline while `available`; reinterpreted as the
    /// completion deadline once accepted.
    pub available_until: TimestampMs,
    pub accepted_at: Option<TimestampMs>,
    pub completed_at: Option<TimestampMs>,
    pub status: QuestStatus,
}

impl ActiveBasicQuest {
    /// Offer a template with a fresh acceptance window.
    pub fn offer(template: &BasicQuest, now: TimestampMs, accept_window_ms: i64) -> Self {
        Self {
            quest: template.clone(),
            available_until: now + accept_window_ms,
            accepted_at: None,
            completed_at: None,
            status: QuestStatus::Available,
        }
    }

    /// Whether an unaccepted offer has outlived its window.
    pub fn is_lapsed(&self, now: TimestampMs) -> bool {
        self.status == QuestStatus::Available && now > self.available_until
    }

    /// `available → accepted`. The deadline moves to
    /// `now + completion_window_ms`.
    pub fn accept(
        &mut self,
        now: TimestampMs,
        completion_window_ms: i64,
    ) -> Result<(), StatusError> {
        if self.status != QuestStatus::Available {
            return Err(StatusError::NotAvailable(self.status));
        }
        self.status = QuestStatus::Accepted;
        self.accepted_at = Some(now);
        self.available_until = now + completion_window_ms;
        Ok(())
    }

    /// `accepted → completed`.
    pub fn complete(&mut self, now: TimestampMs) -> Result<(), StatusError> {
        if self.status != QuestStatus::Accepted {
            return Err(StatusError::NotAccepted(self.status));
        }
        self.status = QuestStatus::Completed;
        self.completed_at = Some(now);
        Ok(())
    }
}

/// Expire lapsed offers and drop them from the list.
///
/// Expired quests are not retained for history. Accepted and completed
/// entries are left alone regardless of their deadline. Returns how many
/// entries were removed.
pub fn sweep_expired(quests: &mut Vec<ActiveBasicQuest>, now: TimestampMs) -> usize {
    let before = quests.len();
    for quest in quests.iter_mut() {
        if quest.is_lapsed(now) {
            quest.status = QuestStatus::Expired;
        }
    }
    quests.retain(|quest| quest.status != QuestStatus::Expired);
    before - quests.len()
}

/// Offers currently in the `available` state.
pub fn available_count(quests: &[ActiveBasicQuest]) -> usize {
    quests
        .iter()
        .filter(|quest| quest.status == QuestStatus::Available)
        .count()
}

/// Templates whose title is not already instantiated in the active list.
///
/// The title guard keeps a template from being offered twice while an
/// instance (in any state) is still in the list.
pub fn uninstantiated<'a>(
    pool: &'a [BasicQuest],
    active: &[ActiveBasicQuest],
) -> Vec<&'a BasicQuest> {
    pool.iter()
        .filter(|template| !active.iter().any(|quest| quest.quest.title == template.title))
        .collect()
}
