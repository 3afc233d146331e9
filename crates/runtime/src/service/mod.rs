//! Application services over the store boundary.
//!
//! Every operation validates before touching the store and commits as one
//! logical write. Compound read-modify-write updates carry the snapshot
//! version and go through a bounded retry loop on conflicts; pure
//! increments need no guard.

mod basic;
mod quests;
mod substats;

pub use basic::BasicQuestService;
pub use quests::{QuestCompletion, QuestService};
pub use substats::SubstatService;

use thiserror::Error;

use life_core::{StatusError, SubstatError};

use crate::store::StoreError;

/// How many times a conflicted read-modify-write is attempted before the
/// failure surfaces to the caller.
pub(crate) const MAX_WRITE_ATTEMPTS: u32 = 3;

pub type Result<T> = std::result::Result<T, ServiceError>;

/// Errors surfaced by the application services.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] SubstatError),

    #[error(transparent)]
    QuestState(#[from] StatusError),

    #[error("quest {quest_id} is already completed")]
    AlreadyCompleted { quest_id: String },

    #[error("quest {quest_id} does not belong to user {user_id}")]
    Unauthorized { quest_id: String, user_id: String },

    #[error("substat {name} under {parent} already exists")]
    DuplicateSubstat { name: String, parent: String },

    #[error("write conflict persisted after {attempts} attempts")]
    ConflictExhausted { attempts: u32 },

    #[error("scheduler worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Swallow a write conflict while attempts remain; surface anything else.
///
/// Returning `Ok(())` means "re-read the snapshot and try again".
pub(crate) fn retry_on_conflict(err: StoreError, attempt: u32, op: &'static str) -> Result<()> {
    if err.is_conflict() {
        if attempt < MAX_WRITE_ATTEMPTS {
            tracing::debug!(attempt, op, "profile write conflicted, retrying");
            return Ok(());
        }
        return Err(ServiceError::ConflictExhausted {
            attempts: MAX_WRITE_ATTEMPTS,
        });
    }
    Err(err.into())
}
