//! Session lifecycle: wires the services, seeds the initial offers, and
//! owns the scheduler worker.

use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::info;

use life_core::{ActiveBasicQuest, Substat, TotalStats, UserProfile, template_pool};

use crate::clock::{Clock, SystemClock};
use crate::scheduler::{QuestScheduler, SchedulerConfig, seed_offers};
use crate::service::{
    BasicQuestService, QuestCompletion, QuestService, Result, ServiceError, SubstatService,
};
use crate::store::{ProfileStore, ProfileUpdate, QuestStore};

/// Session configuration.
#[derive(Clone, Debug, Default)]
pub struct SessionConfig {
    pub scheduler: SchedulerConfig,
}

/// An authenticated user's live session.
///
/// Owns the scheduler worker. [`Session::shutdown`] stops it gracefully;
/// dropping the session closes the shutdown channel, which stops the
/// worker too, so no orphaned timers outlive the session.
pub struct Session {
    handle: SessionHandle,
    shutdown_tx: watch::Sender<bool>,
    scheduler_handle: JoinHandle<()>,
}

impl Session {
    /// Start a session for `user_id`.
    ///
    /// Verifies the profile exists, seeds the initial basic-quest offers
    /// when the active list is empty, and spawns the scheduler worker.
    pub async fn start(
        profiles: Arc<dyn ProfileStore>,
        quests: Arc<dyn QuestStore>,
        user_id: impl Into<String>,
        config: SessionConfig,
    ) -> Result<Self> {
        let user_id = user_id.into();
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let snapshot = profiles.get(&user_id).await?;

        if snapshot.doc.active_quests.is_empty() {
            let mut rng = StdRng::from_entropy();
            let offers = seed_offers(
                &template_pool(),
                config.scheduler.seed_count,
                clock.now(),
                config.scheduler.accept_window_ms,
                &mut rng,
            );
            info!(user_id = %user_id, count = offers.len(), "seeding initial basic quests");
            let update = ProfileUpdate {
                active_quests: Some(offers),
                expected_version: Some(snapshot.version),
                ..Default::default()
            };
            profiles.apply(&user_id, update).await?;
        }

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let scheduler = QuestScheduler::new(
            Arc::clone(&profiles),
            user_id.clone(),
            template_pool(),
            config.scheduler.clone(),
            Arc::clone(&clock),
            StdRng::from_entropy(),
            shutdown_rx,
        );
        let scheduler_handle = tokio::spawn(scheduler.run());

        let handle = SessionHandle::new(profiles, quests, user_id, clock, config.scheduler);
        Ok(Self {
            handle,
            shutdown_tx,
            scheduler_handle,
        })
    }

    /// A cloneable handle for issuing operations.
    pub fn handle(&self) -> SessionHandle {
        self.handle.clone()
    }

    /// Signal the scheduler and wait for it to finish.
    pub async fn shutdown(self) -> Result<()> {
        let _ = self.shutdown_tx.send(true);
        self.scheduler_handle
            .await
            .map_err(ServiceError::WorkerJoin)?;
        Ok(())
    }
}

/// Cloneable façade over the per-user services.
#[derive(Clone)]
pub struct SessionHandle {
    user_id: String,
    profiles: Arc<dyn ProfileStore>,
    substats: SubstatService,
    quests: QuestService,
    basic: BasicQuestService,
}

impl SessionHandle {
    fn new(
        profiles: Arc<dyn ProfileStore>,
        quests: Arc<dyn QuestStore>,
        user_id: String,
        clock: Arc<dyn Clock>,
        scheduler_config: SchedulerConfig,
    ) -> Self {
        Self {
            substats: SubstatService::new(Arc::clone(&profiles)),
            quests: QuestService::new(Arc::clone(&profiles), quests, Arc::clone(&clock)),
            basic: BasicQuestService::new(Arc::clone(&profiles), clock, scheduler_config),
            profiles,
            user_id,
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// The current profile document.
    pub async fn profile(&self) -> Result<UserProfile> {
        Ok(self.profiles.get(&self.user_id).await?.doc)
    }

    /// Displayed totals: base values plus live substat contributions.
    pub async fn total_stats(&self) -> Result<TotalStats> {
        Ok(self.profile().await?.total_stats())
    }

    /// Push channel delivering the profile after every committed write.
    pub fn subscribe(&self) -> Result<broadcast::Receiver<UserProfile>> {
        Ok(self.profiles.subscribe(&self.user_id)?)
    }

    pub async fn add_substat(
        &self,
        name: &str,
        parent: &str,
        icon: &str,
        boost_ratio: f64,
    ) -> Result<Substat> {
        self.substats
            .add(&self.user_id, name, parent, icon, boost_ratio)
            .await
    }

    pub async fn remove_substat(&self, name: &str, parent: &str) -> Result<()> {
        self.substats.remove(&self.user_id, name, parent).await
    }

    pub async fn set_substat_value(&self, name: &str, value: f64) -> Result<f64> {
        self.substats.set_value(&self.user_id, name, value).await
    }

    pub async fn complete_quest(&self, quest_id: &str) -> Result<QuestCompletion> {
        self.quests.complete(&self.user_id, quest_id).await
    }

    pub async fn accept_basic_quest(&self, quest_id: &str) -> Result<ActiveBasicQuest> {
        self.basic.accept(&self.user_id, quest_id).await
    }

    pub async fn complete_basic_quest(&self, quest_id: &str) -> Result<QuestCompletion> {
        self.basic.complete(&self.user_id, quest_id).await
    }
}
