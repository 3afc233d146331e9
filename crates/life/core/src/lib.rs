//! Deterministic domain logic shared across the tracker.
//!
//! `life-core` defines the canonical rules (stat aggregation, substat
//! contributions, quest rewards, leveling, basic-quest lifecycle) and
//! exposes pure APIs reused by the runtime and offline tools. Nothing here
//! performs I/O, reads clocks, or draws randomness; callers supply
//! timestamps and sampling.
pub mod profile;
pub mod progress;
pub mod quest;
pub mod stats;

/// Epoch-millisecond timestamp, the document-store wire format for times.
pub type TimestampMs = i64;

pub use profile::{Cosmetics, UserProfile};
pub use progress::{LevelOutcome, Progress, XP_PER_LEVEL};
pub use quest::{
    ActiveBasicQuest, BasicQuest, Difficulty, Quest, QuestCategory, QuestKind, QuestRewards,
    QuestStatus, RewardOutcome, StatChange, StatusError, available_count, sweep_expired,
    template_pool, uninstantiated,
};
pub use stats::{
    BaseStats, DEFAULT_BOOST_RATIO, STAT_CAP, StatKey, Substat, SubstatError, TotalStats,
    VITALITY_MAX, Vitality,
};
