//! User-defined secondary metrics that feed a parent domain.

use thiserror::Error;

use super::base::STAT_CAP;
use super::key::StatKey;

/// Default fraction of a substat's value counted toward its parent.
///
/// Canonical across creation, reward application, and display.
pub const DEFAULT_BOOST_RATIO: f64 = 0.1;

/// Value a freshly created substat starts at.
pub const SUBSTAT_STARTING_VALUE: f64 = 10.0;

/// Rejected substat creation input.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum SubstatError {
    #[error("substat name must not be blank")]
    BlankName,

    #[error("unknown parent stat: {0}")]
    UnknownParent(String),

    #[error("boost ratio {0} is outside (0, 1]")]
    BoostRatioOutOfRange(f64),
}

/// A user-defined secondary metric.
///
/// Tracks its own progress in `[0, STAT_CAP]` and contributes
/// `value * boost_ratio` to its parent's displayed total. The parent is a
/// free-form reference resolved case-insensitively at aggregation time;
/// an unresolvable parent simply contributes nothing.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Substat {
    pub name: String,
    pub value: f64,
    pub parent: String,
    pub icon: String,
    #[cfg_attr(feature = "serde", serde(default = "default_boost_ratio"))]
    pub boost_ratio: f64,
}

#[cfg(feature = "serde")]
fn default_boost_ratio() -> f64 {
    DEFAULT_BOOST_RATIO
}

impl Substat {
    /// Validate input and build a substat at the starting value.
    ///
    /// Fails fast on a blank name, a parent outside the six fixed keys,
    /// or a boost ratio outside `(0, 1]`; nothing is persisted on error.
    pub fn create(
        name: &str,
        parent: &str,
        icon: &str,
        boost_ratio: f64,
    ) -> Result<Self, SubstatError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SubstatError::BlankName);
        }
        if StatKey::resolve(parent).is_none() {
            return Err(SubstatError::UnknownParent(parent.to_owned()));
        }
        if !(boost_ratio > 0.0 && boost_ratio <= 1.0) {
            return Err(SubstatError::BoostRatioOutOfRange(boost_ratio));
        }
        Ok(Self {
            name: name.to_owned(),
            value: SUBSTAT_STARTING_VALUE,
            parent: parent.to_owned(),
            icon: icon.to_owned(),
            boost_ratio,
        })
    }

    /// The parent domain, if the reference resolves.
    pub fn parent_key(&self) -> Option<StatKey> {
        StatKey::resolve(&self.parent)
    }

    /// Share of this substat's value counted toward the parent total.
    pub fn contribution(&self) -> f64 {
        self.value * self.boost_ratio
    }

    /// Store a directly edited value, clamped into `[0, STAT_CAP]`.
    pub fn set_value(&mut self, value: f64) {
        self.value = value.clamp(0.0, STAT_CAP);
    }

    /// Raise the value by a quest boost, capped at [`STAT_CAP`].
    ///
    /// Returns the change in parent contribution, which the caller feeds
    /// into the parent stat's increment on top of any direct boost.
    pub fn raise_value(&mut self, boost: f64) -> f64 {
        let before = self.contribution();
        self.value = (self.value + boost).min(STAT_CAP);
        self.contribution() - before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_validates_input() {
        assert_eq!(
            Substat::create("  ", "knowledge", "💻", 0.2),
            Err(SubstatError::BlankName)
        );
        assert_eq!(
            Substat::create("Coding", "strength", "💻", 0.2),
            Err(SubstatError::UnknownParent("strength".into()))
        );
        assert_eq!(
            Substat::create("Coding", "knowledge", "💻", 0.0),
            Err(SubstatError::BoostRatioOutOfRange(0.0))
        );
        assert_eq!(
            Substat::create("Coding", "knowledge", "💻", 1.5),
            Err(SubstatError::BoostRatioOutOfRange(1.5))
        );

        let substat = Substat::create("Coding", "Knowledge", "💻", 0.2).unwrap();
        assert_eq!(substat.value, SUBSTAT_STARTING_VALUE);
        assert_eq!(substat.parent_key(), Some(StatKey::Knowledge));
        assert_eq!(substat.contribution(), 2.0);
    }

    #[test]
    fn raise_value_caps_and_reports_contribution_delta() {
        let mut substat = Substat::create("Coding", "knowledge", "💻", 0.2).unwrap();
        assert_eq!(substat.raise_value(10.0), 2.0);
        assert_eq!(substat.value, 20.0);

        // Boost past the cap only counts the capped portion.
        substat.set_value(95.0);
        let delta = substat.raise_value(10.0);
        assert_eq!(substat.value, STAT_CAP);
        assert!((delta - 1.0).abs() < 1e-9);
    }

    #[test]
    fn set_value_clamps() {
        let mut substat = Substat::create("Coding", "knowledge", "💻", 0.2).unwrap();
        substat.set_value(150.0);
        assert_eq!(substat.value, STAT_CAP);
        substat.set_value(-5.0);
        assert_eq!(substat.value, 0.0);
    }
}
