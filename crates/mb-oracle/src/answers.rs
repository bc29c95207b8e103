//! Answer pools and sampling.
//!
//! Each category has a fixed pool of canned answers. The built-in pools hold
//! ten answers each; a custom [`AnswerBook`] can be loaded from JSON:
//!
//! ```text
//! {
//!     "motivational": ["Keep going"],
//!     "wordOfTheDay": ["Serendipity: Happy accidents await"],
//!     "poetic": ["Rivers flow, so shall you grow"]
//! }
//! ```

use std::path::Path;

use rand::Rng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::category::{Category, CategorySelection};
use crate::error::{OracleError, OracleResult};

/// Built-in motivational answers.
pub const MOTIVATIONAL: &[&str] = &[
    "You are capable of amazing things!",
    "Today is your day to shine!",
    "Believe in yourself and magic happens",
    "Your potential is limitless",
    "Keep pushing, you're almost there!",
    "Success starts with self-belief",
    "You've got the power within you",
    "Make today count!",
    "Dream big, achieve bigger",
    "Your best days are ahead",
];

/// Built-in word-of-the-day answers.
pub const WORD_OF_THE_DAY: &[&str] = &[
    "Serendipity: Happy accidents await",
    "Resilience: Bounce back stronger",
    "Luminous: Let your light shine",
    "Ephemeral: Cherish this moment",
    "Wanderlust: Adventure calls you",
    "Effervescent: Bubble with joy",
    "Quintessential: Be authentically you",
    "Euphoria: Happiness is coming",
    "Mellifluous: Speak sweetly today",
    "Incandescent: Radiate brilliance",
];

/// Built-in poetic answers.
pub const POETIC: &[&str] = &[
    "Like stars, you illuminate darkness",
    "Rivers flow, so shall you grow",
    "In every ending, seeds of beginning",
    "Dance with the wind of change",
    "Your heart knows the way forward",
    "Bloom where you are planted",
    "Mountains bow to persistent streams",
    "The universe conspires for you",
    "In stillness, find your thunder",
    "Paint your sky with bold dreams",
];

/// Answer pools for every category.
///
/// Constructed pools are never empty, so sampling always yields an answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerBook {
    motivational: Vec<String>,
    word_of_the_day: Vec<String>,
    poetic: Vec<String>,
}

impl Default for AnswerBook {
    fn default() -> Self {
        let owned = |pool: &[&str]| pool.iter().map(|s| (*s).to_string()).collect();
        Self {
            motivational: owned(MOTIVATIONAL),
            word_of_the_day: owned(WORD_OF_THE_DAY),
            poetic: owned(POETIC),
        }
    }
}

impl AnswerBook {
    /// Build an answer book from explicit pools.
    ///
    /// Fails with [`OracleError::EmptyPool`] if any pool is empty.
    pub fn new(
        motivational: Vec<String>,
        word_of_the_day: Vec<String>,
        poetic: Vec<String>,
    ) -> OracleResult<Self> {
        let book = Self {
            motivational,
            word_of_the_day,
            poetic,
        };
        book.validate()?;
        Ok(book)
    }

    /// Parse an answer book from JSON text.
    pub fn from_json(json: &str) -> OracleResult<Self> {
        let book: Self = serde_json::from_str(json)?;
        book.validate()?;
        Ok(book)
    }

    /// Load an answer book from a JSON file.
    pub fn from_path(path: &Path) -> OracleResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub(crate) fn validate(&self) -> OracleResult<()> {
        for category in Category::ALL {
            if self.pool(category).is_empty() {
                return Err(OracleError::EmptyPool(category));
            }
        }
        Ok(())
    }

    /// The answers for a category.
    pub fn pool(&self, category: Category) -> &[String] {
        match category {
            Category::Motivational => &self.motivational,
            Category::WordOfTheDay => &self.word_of_the_day,
            Category::Poetic => &self.poetic,
        }
    }

    /// Pick one answer uniformly from a category's pool.
    pub fn sample<'a>(&'a self, category: Category, rng: &mut StdRng) -> &'a str {
        let pool = self.pool(category);
        &pool[rng.random_range(0..pool.len())]
    }
}

/// Resolve a selection to a concrete category.
///
/// `Random` chooses each category with equal probability.
pub fn pick_category(selection: CategorySelection, rng: &mut StdRng) -> Category {
    match selection {
        CategorySelection::Random => Category::ALL[rng.random_range(0..Category::ALL.len())],
        CategorySelection::Fixed(category) => category,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn default_pools_have_10_entries() {
        let book = AnswerBook::default();
        for category in Category::ALL {
            assert_eq!(book.pool(category).len(), 10);
        }
    }

    #[test]
    fn sample_stays_in_pool() {
        let book = AnswerBook::default();
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..50 {
            let answer = book.sample(Category::Poetic, &mut rng);
            assert!(POETIC.contains(&answer));
        }
    }

    #[test]
    fn fixed_selection_is_used_directly() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            assert_eq!(
                pick_category(CategorySelection::Fixed(Category::WordOfTheDay), &mut rng),
                Category::WordOfTheDay
            );
        }
    }

    #[test]
    fn random_selection_reaches_all_categories() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut counts = std::collections::HashMap::new();
        for _ in 0..3000 {
            *counts
                .entry(pick_category(CategorySelection::Random, &mut rng))
                .or_insert(0u32) += 1;
        }
        assert_eq!(counts.len(), 3);
        for (category, n) in counts {
            assert!((800..1200).contains(&n), "{category}: {n}");
        }
    }

    #[test]
    fn custom_pool_from_json() {
        let book = AnswerBook::from_json(
            r#"{"motivational": ["Go"], "wordOfTheDay": ["Zest: Enjoy"], "poetic": ["Moon", "Tide"]}"#,
        )
        .unwrap();
        assert_eq!(book.pool(Category::Motivational), ["Go".to_string()]);
        assert_eq!(book.pool(Category::Poetic).len(), 2);

        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(book.sample(Category::Motivational, &mut rng), "Go");
    }

    #[test]
    fn empty_pool_rejected() {
        let err = AnswerBook::from_json(
            r#"{"motivational": ["Go"], "wordOfTheDay": [], "poetic": ["Moon"]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, OracleError::EmptyPool(Category::WordOfTheDay)));

        let err = AnswerBook::new(vec![], vec!["a".into()], vec!["b".into()]).unwrap_err();
        assert!(matches!(err, OracleError::EmptyPool(Category::Motivational)));
    }

    #[test]
    fn malformed_json_rejected() {
        assert!(matches!(
            AnswerBook::from_json("not json"),
            Err(OracleError::Json(_))
        ));
    }

    #[test]
    fn from_path_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("answers.json");
        std::fs::write(
            &path,
            r#"{"motivational": ["A"], "wordOfTheDay": ["B"], "poetic": ["C"]}"#,
        )
        .unwrap();
        let book = AnswerBook::from_path(&path).unwrap();
        assert_eq!(book.pool(Category::WordOfTheDay), ["B".to_string()]);
    }
}
