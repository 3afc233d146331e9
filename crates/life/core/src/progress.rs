//! Experience accumulation and level thresholds.

/// Experience required per level: level N needs `N * XP_PER_LEVEL` to
/// advance.
pub const XP_PER_LEVEL: u32 = 1000;

/// Level and experience-since-last-level pair.
///
/// Invariant: `experience < level * XP_PER_LEVEL` after every successful
/// reward application (leveling rolls the remainder over).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Progress {
    pub level: u32,
    pub experience: u32,
}

impl Progress {
    pub const fn new(level: u32, experience: u32) -> Self {
        Self { level, experience }
    }

    /// Experience needed to advance from the current level.
    pub const fn experience_needed(&self) -> u32 {
        self.level * XP_PER_LEVEL
    }

    /// Fold gained experience in, advancing at most one level.
    ///
    /// On crossing the threshold the remainder carries over. A single
    /// application never advances more than one level, so a grant spanning
    /// two thresholds leaves the overflow parked until the next grant.
    #[must_use]
    pub fn apply_experience(self, gained: u32) -> LevelOutcome {
        let total = self.experience.saturating_add(gained);
        let needed = self.experience_needed();
        if total >= needed {
            LevelOutcome {
                progress: Self::new(self.level + 1, total - needed),
                leveled_up: true,
            }
        } else {
            LevelOutcome {
                progress: Self::new(self.level, total),
                leveled_up: false,
            }
        }
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::new(1, 0)
    }
}

/// Result of applying an experience grant.
///
/// When `leveled_up` is set the caller also restores vitality to full;
/// the level-up reward lives outside this pure computation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LevelOutcome {
    pub progress: Progress,
    pub leveled_up: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crossing_the_threshold_levels_up_with_remainder() {
        let outcome = Progress::new(1, 900).apply_experience(150);
        assert!(outcome.leveled_up);
        assert_eq!(outcome.progress, Progress::new(2, 50));
    }

    #[test]
    fn below_the_threshold_just_accumulates() {
        let outcome = Progress::new(2, 500).apply_experience(100);
        assert!(!outcome.leveled_up);
        assert_eq!(outcome.progress, Progress::new(2, 600));
    }

    #[test]
    fn exact_threshold_counts_as_level_up() {
        let outcome = Progress::new(1, 0).apply_experience(1000);
        assert!(outcome.leveled_up);
        assert_eq!(outcome.progress, Progress::new(2, 0));
    }

    #[test]
    fn a_huge_grant_advances_a_single_level() {
        // Single-step policy: the overflow stays parked on the counter
        // until the next grant crosses the new threshold.
        let outcome = Progress::new(1, 0).apply_experience(3500);
        assert!(outcome.leveled_up);
        assert_eq!(outcome.progress, Progress::new(2, 2500));

        let next = outcome.progress.apply_experience(0);
        assert!(next.leveled_up);
        assert_eq!(next.progress, Progress::new(3, 500));
    }
}
