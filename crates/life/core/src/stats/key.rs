//! The six fixed life domains a profile tracks.

use strum::{Display, EnumIter, EnumString};

/// One of the six bounded life-domain scores.
///
/// The key set is closed: substats reference a parent domain by name, and
/// anything outside these six resolves to nothing (its contribution is
/// dropped rather than displayed).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumIter, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum StatKey {
    Physical,
    Mental,
    Creativity,
    Spiritual,
    Social,
    Knowledge,
}

impl StatKey {
    /// Resolve a free-form domain reference against the fixed key set.
    ///
    /// Matching is case-insensitive. Returns `None` for anything outside
    /// the six keys.
    pub fn resolve(name: &str) -> Option<Self> {
        name.parse().ok()
    }
}
