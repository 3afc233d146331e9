//! The compiled-in basic-quest catalog.
//!
//! A fixed pool spanning all six categories. The scheduler samples from
//! here; nothing in the pool is user-editable.

use crate::stats::StatKey;

use super::basic::{BasicQuest, QuestCategory};
use super::types::{Difficulty, QuestRewards};

#[allow(clippy::too_many_arguments)]
fn template(
    id: &str,
    title: &str,
    description: &str,
    difficulty: Difficulty,
    category: QuestCategory,
    time_to_accept: u32,
    experience: u32,
    stats: &[(StatKey, u32)],
) -> BasicQuest {
    let mut rewards = QuestRewards::new(experience);
    for &(key, boost) in stats {
        rewards.stats.insert(key, boost);
    }
    BasicQuest {
        id: id.into(),
        title: title.into(),
        description: description.into(),
        difficulty,
        category,
        time_to_accept,
        time_to_complete: 24,
        rewards,
    }
}

/// The full template pool, in catalog order.
pub fn template_pool() -> Vec<BasicQuest> {
    use Difficulty::{Easy, Hard, Medium};
    use QuestCategory as Cat;
    use StatKey::{Creativity, Knowledge, Mental, Physical, Social, Spiritual};

    vec![
        template(
            "bq-walk",
            "Take a 30-minute walk",
            "Go for a refreshing 30-minute walk outside.",
            Easy,
            Cat::Physical,
            60,
            50,
            &[(Physical, 2), (Mental, 1)],
        ),
        template(
            "bq-pushups",
            "Do 20 Push-ups",
            "Complete 20 push-ups (can be done in sets).",
            Medium,
            Cat::Physical,
            30,
            75,
            &[(Physical, 3)],
        ),
        template(
            "bq-run",
            "Run 2km",
            "Go for a 2km run at your own pace.",
            Medium,
            Cat::Physical,
            90,
            85,
            &[(Physical, 4), (Mental, 2)],
        ),
        template(
            "bq-meditate",
            "Meditation Session",
            "Complete a 10-minute meditation session.",
            Easy,
            Cat::Mental,
            60,
            45,
            &[(Mental, 2), (Spiritual, 2)],
        ),
        template(
            "bq-puzzle",
            "Solve a Puzzle",
            "Complete a crossword, sudoku, or similar puzzle.",
            Medium,
            Cat::Mental,
            45,
            60,
            &[(Mental, 3), (Knowledge, 1)],
        ),
        template(
            "bq-focus",
            "Focus Time",
            "Spend 25 minutes in focused work without distractions.",
            Hard,
            Cat::Mental,
            30,
            80,
            &[(Mental, 4), (Knowledge, 2)],
        ),
        template(
            "bq-call",
            "Call a Friend",
            "Call a friend or family member you haven't spoken to in a while.",
            Easy,
            Cat::Social,
            180,
            55,
            &[(Social, 3), (Mental, 1)],
        ),
        template(
            "bq-help",
            "Help Someone",
            "Offer help to someone in need.",
            Medium,
            Cat::Social,
            180,
            70,
            &[(Social, 3), (Spiritual, 2)],
        ),
        template(
            "bq-draw",
            "Draw Something",
            "Spend 20 minutes drawing or sketching anything.",
            Easy,
            Cat::Creative,
            90,
            45,
            &[(Creativity, 3)],
        ),
        template(
            "bq-story",
            "Write a Short Story",
            "Write a short story or creative piece (minimum 500 words).",
            Hard,
            Cat::Creative,
            120,
            100,
            &[(Creativity, 4), (Knowledge, 2)],
        ),
        template(
            "bq-article",
            "Read an Article",
            "Read an educational article about a topic you're interested in.",
            Easy,
            Cat::Knowledge,
            60,
            40,
            &[(Knowledge, 2), (Mental, 1)],
        ),
        template(
            "bq-research",
            "Research Project",
            "Research a topic you're curious about for 30 minutes.",
            Hard,
            Cat::Knowledge,
            120,
            90,
            &[(Knowledge, 4), (Mental, 2)],
        ),
        template(
            "bq-gratitude",
            "Gratitude Journal",
            "Write down 3 things you're grateful for today.",
            Easy,
            Cat::Spiritual,
            60,
            45,
            &[(Spiritual, 2), (Mental, 1)],
        ),
        template(
            "bq-nature",
            "Nature Walk",
            "Take a mindful walk in nature for 20 minutes.",
            Easy,
            Cat::Spiritual,
            120,
            50,
            &[(Spiritual, 2), (Physical, 1)],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use strum::IntoEnumIterator;

    #[test]
    fn pool_titles_and_ids_are_unique() {
        let pool = template_pool();
        let titles: HashSet<_> = pool.iter().map(|t| t.title.as_str()).collect();
        let ids: HashSet<_> = pool.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(titles.len(), pool.len());
        assert_eq!(ids.len(), pool.len());
    }

    #[test]
    fn pool_covers_every_category() {
        let pool = template_pool();
        for category in QuestCategory::iter() {
            assert!(
                pool.iter().any(|t| t.category == category),
                "no template for {category}"
            );
        }
    }
}
