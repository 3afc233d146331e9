//! Reward application math for completed quests.
//!
//! Pure computation: takes a quest's reward payload and a profile
//! snapshot, produces the resulting deltas without touching storage. The
//! runtime commits a [`RewardOutcome`] as one logical write.

use std::collections::BTreeMap;

use crate::profile::UserProfile;
use crate::progress::Progress;
use crate::stats::{BaseStats, STAT_CAP, StatKey, Substat};

use super::types::{Quest, QuestRewards};

/// Per-domain change produced by a completion, for UI feedback.
#[derive(Clone, Debug, PartialEq)]
pub struct StatChange {
    pub key: StatKey,
    pub boost: f64,
    pub new_value: f64,
}

/// Everything a quest completion changes on the profile.
#[derive(Clone, Debug, PartialEq)]
pub struct RewardOutcome {
    /// Additive increments to stored base stats: direct boosts plus
    /// substat contribution deltas, so entries may be fractional.
    pub stat_increments: BTreeMap<StatKey, f64>,
    /// Substat list after applying value boosts; `None` when no boost
    /// matched an existing substat.
    pub custom_stats: Option<Vec<Substat>>,
    pub experience_gained: u32,
    pub progress: Progress,
    pub leveled_up: bool,
}

impl RewardOutcome {
    /// Deltas for a bare reward payload (no substat boosts).
    pub fn from_rewards(rewards: &QuestRewards, profile: &UserProfile) -> Self {
        let mut stat_increments = BTreeMap::new();
        for (&key, &boost) in &rewards.stats {
            *stat_increments.entry(key).or_insert(0.0) += f64::from(boost);
        }

        let outcome = profile.progress().apply_experience(rewards.experience);
        Self {
            stat_increments,
            custom_stats: None,
            experience_gained: rewards.experience,
            progress: outcome.progress,
            leveled_up: outcome.leveled_up,
        }
    }

    /// Work out what completing `quest` does to `profile`.
    ///
    /// A substat boost raises the substat's own value (capped at 100) and
    /// feeds the change in parent contribution into the parent stat's
    /// increment, on top of any direct boost the quest grants; substats
    /// are secondary levers on primary stats.
    pub fn compute(quest: &Quest, profile: &UserProfile) -> Self {
        let mut outcome = Self::from_rewards(&quest.rewards, profile);
        if quest.substat_boosts.is_empty() || profile.custom_stats.is_empty() {
            return outcome;
        }

        let mut updated = profile.custom_stats.clone();
        let mut touched = false;
        for substat in &mut updated {
            let Some(&boost) = quest.substat_boosts.get(&substat.name) else {
                continue;
            };
            if boost == 0 {
                continue;
            }
            let delta = substat.raise_value(f64::from(boost));
            touched = true;
            if let Some(parent) = substat.parent_key() {
                *outcome.stat_increments.entry(parent).or_insert(0.0) += delta;
            }
        }

        if touched {
            outcome.custom_stats = Some(updated);
        }
        outcome
    }

    /// Stat values after committing against `base`, clamped the way the
    /// store clamps increments.
    pub fn stat_changes(&self, base: &BaseStats) -> Vec<StatChange> {
        self.stat_increments
            .iter()
            .map(|(&key, &boost)| StatChange {
                key,
                boost,
                new_value: (base.get(key) + boost).clamp(0.0, STAT_CAP),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quest::types::{Difficulty, QuestKind};

    fn profile_with_coding() -> UserProfile {
        let mut profile = UserProfile::new("u1", "Tester", "t@example.com", 0);
        profile.custom_stats.push(Substat {
            name: "Coding".into(),
            value: 10.0,
            parent: "physical".into(),
            icon: "💻".into(),
            boost_ratio: 0.2,
        });
        profile
    }

    fn quest(rewards: QuestRewards) -> Quest {
        let mut quest = Quest::new("q1", "u1", "Ship it", QuestKind::Daily, Difficulty::Easy, 0);
        quest.rewards = rewards;
        quest
    }

    #[test]
    fn substat_boost_compounds_into_the_parent_stat() {
        let profile = profile_with_coding();
        let mut quest = quest(QuestRewards::new(50).with_stat(StatKey::Physical, 5));
        quest.substat_boosts.insert("Coding".into(), 10);

        let outcome = RewardOutcome::compute(&quest, &profile);

        // Direct +5, plus contribution delta 20*0.2 - 10*0.2 = 2.
        assert_eq!(outcome.stat_increments[&StatKey::Physical], 7.0);
        let updated = outcome.custom_stats.as_deref().unwrap();
        assert_eq!(updated[0].value, 20.0);

        let changes = outcome.stat_changes(&profile.stats);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].new_value, 17.0);
    }

    #[test]
    fn unmatched_substat_boosts_are_skipped() {
        let profile = profile_with_coding();
        let mut quest = quest(QuestRewards::new(50));
        quest.substat_boosts.insert("Painting".into(), 10);

        let outcome = RewardOutcome::compute(&quest, &profile);
        assert!(outcome.custom_stats.is_none());
        assert!(outcome.stat_increments.is_empty());
    }

    #[test]
    fn experience_feeds_level_progression() {
        let mut profile = profile_with_coding();
        profile.level = 1;
        profile.experience = 900;
        let quest = quest(QuestRewards::new(150));

        let outcome = RewardOutcome::compute(&quest, &profile);
        assert!(outcome.leveled_up);
        assert_eq!(outcome.progress, Progress::new(2, 50));
    }

    #[test]
    fn zero_boosts_leave_substats_untouched() {
        let profile = profile_with_coding();
        let mut quest = quest(QuestRewards::new(10));
        quest.substat_boosts.insert("Coding".into(), 0);

        let outcome = RewardOutcome::compute(&quest, &profile);
        assert!(outcome.custom_stats.is_none());
    }
}
