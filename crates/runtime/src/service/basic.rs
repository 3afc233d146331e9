//! Accept and complete operations for offered basic quests.

use std::sync::Arc;

use life_core::{ActiveBasicQuest, RewardOutcome, Vitality};

use crate::clock::Clock;
use crate::scheduler::SchedulerConfig;
use crate::store::{ProfileStore, ProfileUpdate, StoreError};

use super::quests::QuestCompletion;
use super::{Result, ServiceError, retry_on_conflict};

/// Drives the lifecycle of quests offered by the scheduler.
#[derive(Clone)]
pub struct BasicQuestService {
    profiles: Arc<dyn ProfileStore>,
    clock: Arc<dyn Clock>,
    config: SchedulerConfig,
}

impl BasicQuestService {
    pub fn new(
        profiles: Arc<dyn ProfileStore>,
        clock: Arc<dyn Clock>,
        config: SchedulerConfig,
    ) -> Self {
        Self {
            profiles,
            clock,
            config,
        }
    }

    /// Accept an offer: `available → accepted`, deadline moved to
    /// `now + completion window`.
    pub async fn accept(&self, user_id: &str, quest_id: &str) -> Result<ActiveBasicQuest> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            let snapshot = self.profiles.get(user_id).await?;
            let mut active_quests = snapshot.doc.active_quests.clone();
            let quest = find_active(&mut active_quests, quest_id)?;
            quest.accept(self.clock.now(), self.config.completion_window_ms)?;
            let accepted = quest.clone();

            let update = ProfileUpdate {
                active_quests: Some(active_quests),
                expected_version: Some(snapshot.version),
                ..Default::default()
            };
            match self.profiles.apply(user_id, update).await {
                Ok(()) => return Ok(accepted),
                Err(err) => retry_on_conflict(err, attempt, "basic quest accept")?,
            }
        }
    }

    /// Complete an accepted quest: `accepted → completed`, granting
    /// experience and clamped stat boosts.
    ///
    /// Basic quests carry no substat boosts, so the grant plus the list
    /// update commit as one compare-and-swap write.
    pub async fn complete(&self, user_id: &str, quest_id: &str) -> Result<QuestCompletion> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            let snapshot = self.profiles.get(user_id).await?;
            let mut active_quests = snapshot.doc.active_quests.clone();
            let quest = find_active(&mut active_quests, quest_id)?;
            quest.complete(self.clock.now())?;
            let rewards = quest.quest.rewards.clone();

            let outcome = RewardOutcome::from_rewards(&rewards, &snapshot.doc);
            let mut update = ProfileUpdate {
                stat_increments: outcome.stat_increments.clone(),
                active_quests: Some(active_quests),
                expected_version: Some(snapshot.version),
                ..Default::default()
            };
            if outcome.leveled_up {
                update.experience = Some(outcome.progress.experience);
                update.level = Some(outcome.progress.level);
                update.vitality = Some(Vitality::full());
            } else {
                update.experience_increment = Some(outcome.experience_gained);
            }

            match self.profiles.apply(user_id, update).await {
                Ok(()) => {
                    return Ok(QuestCompletion {
                        quest_id: quest_id.to_owned(),
                        experience: outcome.progress.experience,
                        level: outcome.progress.level,
                        leveled_up: outcome.leveled_up,
                        stat_changes: outcome.stat_changes(&snapshot.doc.stats),
                    });
                }
                Err(err) => retry_on_conflict(err, attempt, "basic quest completion")?,
            }
        }
    }
}

fn find_active<'a>(
    active_quests: &'a mut [ActiveBasicQuest],
    quest_id: &str,
) -> Result<&'a mut ActiveBasicQuest> {
    active_quests
        .iter_mut()
        .find(|quest| quest.quest.id == quest_id)
        .ok_or_else(|| {
            ServiceError::Store(StoreError::NotFound {
                kind: "active quest",
                id: quest_id.to_owned(),
            })
        })
}
