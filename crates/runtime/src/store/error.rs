//! Error types raised by store implementations.

use thiserror::Error;

/// Errors surfaced by document-store implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("document store lock was poisoned")]
    LockPoisoned,

    #[error("no {kind} document for {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("{kind} document {id} already exists")]
    AlreadyExists { kind: &'static str, id: String },

    #[error("write conflict on {id}: expected version {expected}, found {actual}")]
    Conflict {
        id: String,
        expected: u64,
        actual: u64,
    },
}

impl StoreError {
    pub(crate) fn profile_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            kind: "profile",
            id: id.into(),
        }
    }

    pub(crate) fn quest_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            kind: "quest",
            id: id.into(),
        }
    }

    /// Whether a retry against a fresh snapshot may succeed.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
