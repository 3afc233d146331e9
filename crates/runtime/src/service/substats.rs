//! Substat lifecycle: creation, removal, direct value edits.

use std::sync::Arc;

use life_core::Substat;

use crate::store::{ProfileStore, ProfileUpdate, StoreError};

use super::{Result, ServiceError, retry_on_conflict};

/// Creates, removes, and adjusts user-defined substats.
#[derive(Clone)]
pub struct SubstatService {
    profiles: Arc<dyn ProfileStore>,
}

impl SubstatService {
    pub fn new(profiles: Arc<dyn ProfileStore>) -> Self {
        Self { profiles }
    }

    /// Create a substat and grant its parent the one-time starting
    /// contribution, committed as a single write.
    ///
    /// The grant raises the stored base value; the ongoing live
    /// contribution comes on top of it at display time. Validation runs
    /// before any store access.
    pub async fn add(
        &self,
        user_id: &str,
        name: &str,
        parent: &str,
        icon: &str,
        boost_ratio: f64,
    ) -> Result<Substat> {
        let substat = Substat::create(name, parent, icon, boost_ratio)?;

        let mut attempt = 0;
        loop {
            attempt += 1;
            let snapshot = self.profiles.get(user_id).await?;
            if snapshot
                .doc
                .custom_stats
                .iter()
                .any(|existing| existing.name == substat.name && existing.parent == substat.parent)
            {
                return Err(ServiceError::DuplicateSubstat {
                    name: substat.name,
                    parent: substat.parent,
                });
            }

            let mut custom_stats = snapshot.doc.custom_stats.clone();
            custom_stats.push(substat.clone());

            let mut update = ProfileUpdate {
                custom_stats: Some(custom_stats),
                expected_version: Some(snapshot.version),
                ..Default::default()
            };
            if let Some(parent_key) = substat.parent_key() {
                update.stat_increments.insert(parent_key, substat.contribution());
            }

            match self.profiles.apply(user_id, update).await {
                Ok(()) => return Ok(substat),
                Err(err) => retry_on_conflict(err, attempt, "substat")?,
            }
        }
    }

    /// Remove a substat by composite identity (name + parent).
    ///
    /// The creation-time grant to the parent stays in place; only the
    /// live contribution disappears from displayed totals.
    pub async fn remove(&self, user_id: &str, name: &str, parent: &str) -> Result<()> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            let snapshot = self.profiles.get(user_id).await?;
            let mut custom_stats = snapshot.doc.custom_stats.clone();
            let before = custom_stats.len();
            custom_stats.retain(|substat| substat.name != name || substat.parent != parent);
            if custom_stats.len() == before {
                return Err(StoreError::NotFound {
                    kind: "substat",
                    id: name.to_owned(),
                }
                .into());
            }

            let update = ProfileUpdate {
                custom_stats: Some(custom_stats),
                expected_version: Some(snapshot.version),
                ..Default::default()
            };
            match self.profiles.apply(user_id, update).await {
                Ok(()) => return Ok(()),
                Err(err) => retry_on_conflict(err, attempt, "substat")?,
            }
        }
    }

    /// Store a directly edited value, clamped into `[0, 100]`.
    ///
    /// Returns the value as stored. The parent base stat is untouched;
    /// the displayed total follows on the next recompute.
    pub async fn set_value(&self, user_id: &str, name: &str, value: f64) -> Result<f64> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            let snapshot = self.profiles.get(user_id).await?;
            let mut custom_stats = snapshot.doc.custom_stats.clone();
            let substat = custom_stats
                .iter_mut()
                .find(|substat| substat.name == name)
                .ok_or(StoreError::NotFound {
                    kind: "substat",
                    id: name.to_owned(),
                })?;
            substat.set_value(value);
            let stored = substat.value;

            let update = ProfileUpdate {
                custom_stats: Some(custom_stats),
                expected_version: Some(snapshot.version),
                ..Default::default()
            };
            match self.profiles.apply(user_id, update).await {
                Ok(()) => return Ok(stored),
                Err(err) => retry_on_conflict(err, attempt, "substat")?,
            }
        }
    }
}
