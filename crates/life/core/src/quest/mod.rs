//! Quests: user-authored tasks and the randomly offered basic pool.

pub mod basic;
pub mod reward;
pub mod templates;
pub mod types;

pub use basic::{
    ActiveBasicQuest, BasicQuest, QuestCategory, QuestStatus, StatusError, available_count,
    sweep_expired, uninstantiated,
};
pub use reward::{RewardOutcome, StatChange};
pub use templates::template_pool;
pub use types::{Difficulty, Quest, QuestKind, QuestRewards};
