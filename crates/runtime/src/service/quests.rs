//! Completion of user-authored quests.

use std::sync::Arc;

use life_core::{RewardOutcome, StatChange, Vitality};

use crate::clock::Clock;
use crate::store::{ProfileStore, ProfileUpdate, QuestStore};

use super::{Result, ServiceError, retry_on_conflict};

/// Summary returned to the caller for UI feedback.
#[derive(Clone, Debug)]
pub struct QuestCompletion {
    pub quest_id: String,
    /// Experience counter after the grant (post-rollover when leveling).
    pub experience: u32,
    pub level: u32,
    pub leveled_up: bool,
    pub stat_changes: Vec<StatChange>,
}

/// Applies a quest's reward payload exactly once.
#[derive(Clone)]
pub struct QuestService {
    profiles: Arc<dyn ProfileStore>,
    quests: Arc<dyn QuestStore>,
    clock: Arc<dyn Clock>,
}

impl QuestService {
    pub fn new(
        profiles: Arc<dyn ProfileStore>,
        quests: Arc<dyn QuestStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            profiles,
            quests,
            clock,
        }
    }

    /// Complete `quest_id` on behalf of `user_id`.
    ///
    /// Guards run before anything is written: the quest must belong to
    /// the acting user and must not already be completed. The completion
    /// flag flips before the reward lands, so a re-entrant call can never
    /// grant twice. Experience, stat boosts, and substat boosts then
    /// commit as one profile write: a plain increment write when nothing
    /// else changed, a compare-and-swap (with bounded retries) when
    /// substats or leveling force a read-modify-write.
    pub async fn complete(&self, user_id: &str, quest_id: &str) -> Result<QuestCompletion> {
        let quest = self.quests.get(quest_id).await?;
        if quest.user_id != user_id {
            return Err(ServiceError::Unauthorized {
                quest_id: quest_id.to_owned(),
                user_id: user_id.to_owned(),
            });
        }
        if quest.completed {
            return Err(ServiceError::AlreadyCompleted {
                quest_id: quest_id.to_owned(),
            });
        }

        self.quests
            .mark_completed(quest_id, self.clock.now())
            .await?;

        let mut attempt = 0;
        loop {
            attempt += 1;
            let snapshot = self.profiles.get(user_id).await?;
            let outcome = RewardOutcome::compute(&quest, &snapshot.doc);

            let mut update = ProfileUpdate {
                stat_increments: outcome.stat_increments.clone(),
                custom_stats: outcome.custom_stats.clone(),
                ..Default::default()
            };
            if outcome.leveled_up {
                update.experience = Some(outcome.progress.experience);
                update.level = Some(outcome.progress.level);
                update.vitality = Some(Vitality::full());
            } else {
                update.experience_increment = Some(outcome.experience_gained);
            }
            // Plain increments are race-safe on their own; anything that
            // was computed from the snapshot needs the version guard.
            if outcome.custom_stats.is_some() || outcome.leveled_up {
                update.expected_version = Some(snapshot.version);
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
                Err(err) => retry_on_conflict(err, attempt, "quest completion")?,
            }
        }
    }
}
