//! Store contracts for profile and quest documents.
//!
//! Persistence is delegated to a hosted document database reached through
//! whole-document reads, partial-field writes, and push subscriptions.
//! These traits capture exactly that surface so the services stay
//! agnostic of the backing store.

mod error;
mod memory;

pub use error::{Result, StoreError};
pub use memory::InMemoryStore;

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::broadcast;

use life_core::{
    ActiveBasicQuest, Quest, QuestKind, StatKey, Substat, TimestampMs, UserProfile, Vitality,
};

/// A document together with the version counter the store keeps for it.
#[derive(Clone, Debug)]
pub struct Versioned<T> {
    pub version: u64,
    pub doc: T,
}

/// Partial-field write against a profile document.
///
/// Stat and experience increments apply atomically at the store: two
/// concurrent increment writes both land, no lost update. Everything else
/// is an absolute set. When `expected_version` is present the whole write
/// becomes a compare-and-swap, rejected with [`StoreError::Conflict`] if
/// the document has moved on since the snapshot was read.
#[derive(Clone, Debug, Default)]
pub struct ProfileUpdate {
    /// Additive deltas; the store clamps each result into `[0, 100]`.
    pub stat_increments: BTreeMap<StatKey, f64>,
    pub experience_increment: Option<u32>,
    pub experience: Option<u32>,
    pub level: Option<u32>,
    pub vitality: Option<Vitality>,
    pub custom_stats: Option<Vec<Substat>>,
    pub active_quests: Option<Vec<ActiveBasicQuest>>,
    pub expected_version: Option<u64>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.stat_increments.is_empty()
            && self.experience_increment.is_none()
            && self.experience.is_none()
            && self.level.is_none()
            && self.vitality.is_none()
            && self.custom_stats.is_none()
            && self.active_quests.is_none()
    }
}

/// Store for user profile documents.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Create the profile document; duplicates are rejected.
    async fn insert(&self, profile: UserProfile) -> Result<()>;

    /// Fetch the whole document with its current version.
    async fn get(&self, user_id: &str) -> Result<Versioned<UserProfile>>;

    /// Apply a partial-field write. See [`ProfileUpdate`] for atomicity
    /// semantics.
    async fn apply(&self, user_id: &str, update: ProfileUpdate) -> Result<()>;

    /// Push channel delivering the document after every committed write.
    fn subscribe(&self, user_id: &str) -> Result<broadcast::Receiver<UserProfile>>;
}

/// Filter for quest listings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct QuestFilter {
    pub kind: Option<QuestKind>,
    pub completed: Option<bool>,
}

impl QuestFilter {
    fn matches(&self, quest: &Quest) -> bool {
        self.kind.is_none_or(|kind| quest.kind == kind)
            && self.completed.is_none_or(|completed| quest.completed == completed)
    }
}

/// Store for user-authored quest documents.
#[async_trait]
pub trait QuestStore: Send + Sync {
    async fn insert(&self, quest: Quest) -> Result<()>;

    async fn get(&self, quest_id: &str) -> Result<Quest>;

    /// Quests owned by `user_id`, newest first.
    async fn list_for_user(&self, user_id: &str, filter: QuestFilter) -> Result<Vec<Quest>>;

    /// Flip `completed` and stamp the completion time. One-way: a
    /// completed quest never becomes incomplete again.
    async fn mark_completed(&self, quest_id: &str, at: TimestampMs) -> Result<()>;
}
