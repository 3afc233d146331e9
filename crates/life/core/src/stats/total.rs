//! Displayed stat totals, computed and never stored.

use strum::IntoEnumIterator;

use super::base::{BaseStats, STAT_CAP};
use super::key::StatKey;
use super::substat::Substat;

/// Displayed totals for the six domains.
///
/// This is derived output and is NEVER stored - always recomputed from the
/// persisted base values and substat list when needed. Every display and
/// reward path derives totals through [`TotalStats::compute`]; there is no
/// second aggregation implementation to drift from.
#[derive(Clone, Debug, PartialEq)]
pub struct TotalStats {
    pub physical: f64,
    pub mental: f64,
    pub creativity: f64,
    pub spiritual: f64,
    pub social: f64,
    pub knowledge: f64,
}

impl TotalStats {
    /// Fold substat contributions into the base values and cap at
    /// [`STAT_CAP`].
    ///
    /// Each substat adds `value * boost_ratio` to its resolved parent;
    /// substats whose parent is not one of the six keys are skipped.
    /// Pure and idempotent, and the substat ordering does not affect the
    /// result.
    pub fn compute(base: &BaseStats, substats: &[Substat]) -> Self {
        let mut totals = Self {
            physical: base.physical,
            mental: base.mental,
            creativity: base.creativity,
            spiritual: base.spiritual,
            social: base.social,
            knowledge: base.knowledge,
        };

        for substat in substats {
            let Some(parent) = substat.parent_key() else {
                continue;
            };
            *totals.get_mut(parent) += substat.contribution();
        }

        for key in StatKey::iter() {
            let slot = totals.get_mut(key);
            *slot = slot.min(STAT_CAP);
        }

        totals
    }

    pub fn get(&self, key: StatKey) -> f64 {
        match key {
            StatKey::Physical => self.physical,
            StatKey::Mental => self.mental,
            StatKey::Creativity => self.creativity,
            StatKey::Spiritual => self.spiritual,
            StatKey::Social => self.social,
            StatKey::Knowledge => self.knowledge,
        }
    }

    fn get_mut(&mut self, key: StatKey) -> &mut f64 {
        match key {
            StatKey::Physical => &mut self.physical,
            StatKey::Mental => &mut self.mental,
            StatKey::Creativity => &mut self.creativity,
            StatKey::Spiritual => &mut self.spiritual,
            StatKey::Social => &mut self.social,
            StatKey::Knowledge => &mut self.knowledge,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn substat(name: &str, parent: &str, value: f64, ratio: f64) -> Substat {
        Substat {
            name: name.into(),
            value,
            parent: parent.into(),
            icon: "📈".into(),
            boost_ratio: ratio,
        }
    }

    #[test]
    fn adds_contributions_to_resolved_parents() {
        let base = BaseStats::default();
        let substats = vec![
            substat("Coding", "knowledge", 10.0, 0.2),
            substat("Journaling", "Mental", 50.0, 0.1),
        ];

        let totals = TotalStats::compute(&base, &substats);
        assert_eq!(totals.knowledge, 12.0);
        assert_eq!(totals.mental, 15.0);
        assert_eq!(totals.physical, 10.0);
    }

    #[test]
    fn skips_unresolvable_parents() {
        let base = BaseStats::default();
        let substats = vec![substat("Lifting", "strength", 80.0, 1.0)];

        let totals = TotalStats::compute(&base, &substats);
        assert_eq!(totals, TotalStats::compute(&base, &[]));
    }

    #[test]
    fn caps_every_total_at_one_hundred() {
        let mut base = BaseStats::default();
        base.set(StatKey::Physical, 95.0);
        let substats = vec![substat("Running", "physical", 100.0, 1.0)];

        let totals = TotalStats::compute(&base, &substats);
        assert_eq!(totals.physical, STAT_CAP);
    }

    #[test]
    fn idempotent_and_order_independent() {
        let base = BaseStats::new(5.0, 10.0, 15.0, 20.0, 25.0, 30.0);
        let forward = vec![
            substat("A", "social", 10.0, 0.25),
            substat("B", "social", 30.0, 0.5),
            substat("C", "creativity", 40.0, 0.1),
        ];
        let mut reversed = forward.clone();
        reversed.reverse();

        let first = TotalStats::compute(&base, &forward);
        let second = TotalStats::compute(&base, &forward);
        let swapped = TotalStats::compute(&base, &reversed);
        assert_eq!(first, second);
        assert_eq!(first, swapped);
        assert_eq!(first.social, 25.0 + 2.5 + 15.0);
    }

    #[test]
    fn results_stay_in_bounds() {
        let base = BaseStats::new(0.0, 0.0, 0.0, 0.0, 0.0, 0.0);
        let substats: Vec<Substat> = (0..20)
            .map(|i| substat(&format!("s{i}"), "spiritual", 100.0, 1.0))
            .collect();

        let totals = TotalStats::compute(&base, &substats);
        for key in StatKey::iter() {
            let value = totals.get(key);
            assert!((0.0..=STAT_CAP).contains(&value));
        }
    }
}
