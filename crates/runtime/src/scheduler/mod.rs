//! Background worker that rotates random basic quests.
//!
//! Runs for the lifetime of an authenticated session: every tick it
//! expires lapsed offers, drops them from the active list, and, while
//! fewer than the target number of offers are available, occasionally
//! rolls a new template in.

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use rand::seq::SliceRandom;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use life_core::{
    ActiveBasicQuest, BasicQuest, TimestampMs, available_count, sweep_expired, uninstantiated,
};

use crate::clock::Clock;
use crate::store::{self, ProfileStore, ProfileUpdate, StoreError};

/// Tuning knobs for the random-quest scheduler.
#[derive(Clone, Debug)]
pub struct SchedulerConfig {
    /// How often the active list is swept and the spawn gate rolled.
    pub tick_interval: Duration,
    /// How long a fresh offer stays acceptable.
    pub accept_window_ms: i64,
    /// Deadline granted once an offer is accepted.
    pub completion_window_ms: i64,
    /// Probability of offering a new quest on a tick with room.
    pub spawn_chance: f64,
    /// New offers are only rolled while fewer than this many are
    /// available.
    pub availability_target: usize,
    /// Offers seeded for a profile with no active list yet.
    pub seed_count: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_secs(5 * 60),
            accept_window_ms: 2 * 60 * 60 * 1000,
            completion_window_ms: 24 * 60 * 60 * 1000,
            spawn_chance: 0.02,
            availability_target: 3,
            seed_count: 3,
        }
    }
}

/// Seed the initial offers for a profile with no active list yet.
///
/// Samples distinct templates without replacement; stops early if the
/// pool runs out.
pub fn seed_offers<R: Rng>(
    pool: &[BasicQuest],
    count: usize,
    now: TimestampMs,
    accept_window_ms: i64,
    rng: &mut R,
) -> Vec<ActiveBasicQuest> {
    let mut offers: Vec<ActiveBasicQuest> = Vec::with_capacity(count);
    for _ in 0..count {
        let candidates = uninstantiated(pool, &offers);
        let Some(template) = candidates.choose(rng) else {
            break;
        };
        offers.push(ActiveBasicQuest::offer(template, now, accept_window_ms));
    }
    offers
}

/// Background task owning the periodic offer/expiry cycle for one user.
pub struct QuestScheduler<R: Rng + Send> {
    profiles: Arc<dyn ProfileStore>,
    user_id: String,
    pool: Vec<BasicQuest>,
    config: SchedulerConfig,
    clock: Arc<dyn Clock>,
    rng: R,
    shutdown: watch::Receiver<bool>,
}

impl<R: Rng + Send> QuestScheduler<R> {
    pub fn new(
        profiles: Arc<dyn ProfileStore>,
        user_id: impl Into<String>,
        pool: Vec<BasicQuest>,
        config: SchedulerConfig,
        clock: Arc<dyn Clock>,
        rng: R,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            profiles,
            user_id: user_id.into(),
            pool,
            config,
            clock,
            rng,
            shutdown,
        }
    }

    /// Main worker loop. Exits on the shutdown signal (or its sender
    /// being dropped), or when the profile disappears.
    pub async fn run(mut self) {
        let mut ticker = tokio::time::interval(self.config.tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    match self.tick().await {
                        Ok(()) => {}
                        Err(StoreError::Conflict { .. }) => {
                            // Someone else already moved the list; the
                            // next tick re-reads.
                            debug!(user_id = %self.user_id, "scheduler tick conflicted, skipping");
                        }
                        Err(StoreError::NotFound { .. }) => {
                            warn!(user_id = %self.user_id, "profile gone, stopping scheduler");
                            break;
                        }
                        Err(err) => {
                            warn!(user_id = %self.user_id, error = %err, "scheduler tick failed");
                        }
                    }
                }
                _ = self.shutdown.changed() => {
                    debug!(user_id = %self.user_id, "scheduler shutting down");
                    break;
                }
            }
        }
    }

    /// One sweep-and-maybe-offer cycle.
    pub async fn tick(&mut self) -> store::Result<()> {
        let snapshot = self.profiles.get(&self.user_id).await?;
        let now = self.clock.now();
        let mut active_quests = snapshot.doc.active_quests.clone();

        let removed = sweep_expired(&mut active_quests, now);
        if removed > 0 {
            debug!(user_id = %self.user_id, removed, "expired basic quests swept");
        }
        let mut changed = removed > 0;

        if available_count(&active_quests) < self.config.availability_target
            && self.rng.gen_bool(self.config.spawn_chance)
        {
            let candidates = uninstantiated(&self.pool, &active_quests);
            if let Some(template) = candidates.choose(&mut self.rng) {
                info!(user_id = %self.user_id, title = %template.title, "offering basic quest");
                active_quests.push(ActiveBasicQuest::offer(
                    template,
                    now,
                    self.config.accept_window_ms,
                ));
                changed = true;
            }
        }

        if changed {
            let update = ProfileUpdate {
                active_quests: Some(active_quests),
                expected_version: Some(snapshot.version),
                ..Default::default()
            };
            self.profiles.apply(&self.user_id, update).await?;
        }
        Ok(())
    }
}
