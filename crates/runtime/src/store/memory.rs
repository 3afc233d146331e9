//! In-memory document store for tests and local runs.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use tokio::sync::broadcast;

use life_core::{Quest, STAT_CAP, TimestampMs, UserProfile};

use super::{ProfileStore, ProfileUpdate, QuestFilter, QuestStore, Result, StoreError, Versioned};

const SUBSCRIPTION_BUFFER: usize = 64;

struct ProfileSlot {
    version: u64,
    doc: UserProfile,
    watchers: broadcast::Sender<UserProfile>,
}

/// In-memory implementation of both store traits.
///
/// Documents live behind `RwLock`ed maps with per-document version
/// counters; every committed profile write is pushed to subscribers.
pub struct InMemoryStore {
    profiles: RwLock<HashMap<String, ProfileSlot>>,
    quests: RwLock<HashMap<String, Quest>>,
}

impl InMemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            profiles: RwLock::new(HashMap::new()),
            quests: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProfileStore for InMemoryStore {
    async fn insert(&self, profile: UserProfile) -> Result<()> {
        let mut profiles = self.profiles.write().map_err(|_| StoreError::LockPoisoned)?;
        if profiles.contains_key(&profile.id) {
            return Err(StoreError::AlreadyExists {
                kind: "profile",
                id: profile.id,
            });
        }
        let (watchers, _) = broadcast::channel(SUBSCRIPTION_BUFFER);
        profiles.insert(
            profile.id.clone(),
            ProfileSlot {
                version: 0,
                doc: profile,
                watchers,
            },
        );
        Ok(())
    }

    async fn get(&self, user_id: &str) -> Result<Versioned<UserProfile>> {
        let profiles = self.profiles.read().map_err(|_| StoreError::LockPoisoned)?;
        let slot = profiles
            .get(user_id)
            .ok_or_else(|| StoreError::profile_not_found(user_id))?;
        Ok(Versioned {
            version: slot.version,
            doc: slot.doc.clone(),
        })
    }

    async fn apply(&self, user_id: &str, update: ProfileUpdate) -> Result<()> {
        let mut profiles = self.profiles.write().map_err(|_| StoreError::LockPoisoned)?;
        let slot = profiles
            .get_mut(user_id)
            .ok_or_else(|| StoreError::profile_not_found(user_id))?;

        if let Some(expected) = update.expected_version
            && expected != slot.version
        {
            return Err(StoreError::Conflict {
                id: user_id.to_owned(),
                expected,
                actual: slot.version,
            });
        }

        let doc = &mut slot.doc;
        for (&key, &delta) in &update.stat_increments {
            let value = (doc.stats.get(key) + delta).clamp(0.0, STAT_CAP);
            doc.stats.set(key, value);
        }
        if let Some(gained) = update.experience_increment {
            doc.experience = doc.experience.saturating_add(gained);
        }
        if let Some(experience) = update.experience {
            doc.experience = experience;
        }
        if let Some(level) = update.level {
            doc.level = level;
        }
        if let Some(vitality) = update.vitality {
            doc.vitality = vitality;
        }
        if let Some(custom_stats) = update.custom_stats {
            doc.custom_stats = custom_stats;
        }
        if let Some(active_quests) = update.active_quests {
            doc.active_quests = active_quests;
        }

        slot.version += 1;
        // Push is best-effort: nobody listening is normal.
        if slot.watchers.send(doc.clone()).is_err() {
            tracing::trace!(user_id, "no subscribers for profile update");
        }
        Ok(())
    }

    fn subscribe(&self, user_id: &str) -> Result<broadcast::Receiver<UserProfile>> {
        let profiles = self.profiles.read().map_err(|_| StoreError::LockPoisoned)?;
        let slot = profiles
            .get(user_id)
            .ok_or_else(|| StoreError::profile_not_found(user_id))?;
        Ok(slot.watchers.subscribe())
    }
}

#[async_trait]
impl QuestStore for InMemoryStore {
    async fn insert(&self, quest: Quest) -> Result<()> {
        let mut quests = self.quests.write().map_err(|_| StoreError::LockPoisoned)?;
        if quests.contains_key(&quest.id) {
            return Err(StoreError::AlreadyExists {
                kind: "quest",
                id: quest.id,
            });
        }
        quests.insert(quest.id.clone(), quest);
        Ok(())
    }

    async fn get(&self, quest_id: &str) -> Result<Quest> {
        let quests = self.quests.read().map_err(|_| StoreError::LockPoisoned)?;
        quests
            .get(quest_id)
            .cloned()
            .ok_or_else(|| StoreError::quest_not_found(quest_id))
    }

    async fn list_for_user(&self, user_id: &str, filter: QuestFilter) -> Result<Vec<Quest>> {
        let quests = self.quests.read().map_err(|_| StoreError::LockPoisoned)?;
        let mut listed: Vec<Quest> = quests
            .values()
            .filter(|quest| quest.user_id == user_id && filter.matches(quest))
            .cloned()
            .collect();
        listed.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(listed)
    }

    async fn mark_completed(&self, quest_id: &str, at: TimestampMs) -> Result<()> {
        let mut quests = self.quests.write().map_err(|_| StoreError::LockPoisoned)?;
        let quest = quests
            .get_mut(quest_id)
            .ok_or_else(|| StoreError::quest_not_found(quest_id))?;
        quest.completed = true;
        quest.completed_at = Some(at);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use life_core::StatKey;

    fn profile() -> UserProfile {
        UserProfile::new("u1", "Tester", "t@example.com", 0)
    }

    #[tokio::test]
    async fn increments_apply_atomically_and_clamp() {
        let store = InMemoryStore::new();
        ProfileStore::insert(&store, profile()).await.unwrap();

        let mut update = ProfileUpdate::default();
        update.stat_increments.insert(StatKey::Physical, 95.0);
        update.experience_increment = Some(40);
        store.apply("u1", update).await.unwrap();

        let stored = ProfileStore::get(&store, "u1").await.unwrap();
        assert_eq!(stored.doc.stats.physical, STAT_CAP);
        assert_eq!(stored.doc.experience, 40);
        assert_eq!(stored.version, 1);
    }

    #[tokio::test]
    async fn stale_version_is_rejected() {
        let store = InMemoryStore::new();
        ProfileStore::insert(&store, profile()).await.unwrap();
        store.apply("u1", ProfileUpdate::default()).await.unwrap();

        let stale = ProfileUpdate {
            expected_version: Some(0),
            ..Default::default()
        };
        let err = store.apply("u1", stale).await.unwrap_err();
        assert!(err.is_conflict());
    }

    #[tokio::test]
    async fn subscribers_see_committed_writes() {
        let store = InMemoryStore::new();
        ProfileStore::insert(&store, profile()).await.unwrap();
        let mut updates = store.subscribe("u1").unwrap();

        let update = ProfileUpdate {
            level: Some(3),
            ..Default::default()
        };
        store.apply("u1", update).await.unwrap();

        let pushed = updates.recv().await.unwrap();
        assert_eq!(pushed.level, 3);
    }

    #[tokio::test]
    async fn missing_documents_surface_not_found() {
        let store = InMemoryStore::new();
        assert!(matches!(
            ProfileStore::get(&store, "ghost").await,
            Err(StoreError::NotFound { kind: "profile", .. })
        ));
        assert!(matches!(
            QuestStore::get(&store, "ghost").await,
            Err(StoreError::NotFound { kind: "quest", .. })
        ));
    }
}
