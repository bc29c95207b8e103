//! Answer categories and the user's category selection.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::OracleError;

/// One of the fixed answer categories.
///
/// Serialized with the identifiers used in persisted history
/// (`motivational`, `wordOfTheDay`, `poetic`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    /// Short encouragements.
    Motivational,
    /// A word and its one-line lesson.
    WordOfTheDay,
    /// Small lyrical lines.
    Poetic,
}

impl Category {
    /// All categories, in selection order.
    pub const ALL: [Category; 3] = [Self::Motivational, Self::WordOfTheDay, Self::Poetic];

    /// Persisted identifier.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Motivational => "motivational",
            Self::WordOfTheDay => "wordOfTheDay",
            Self::Poetic => "poetic",
        }
    }

    /// Human-facing label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Motivational => "Motivational",
            Self::WordOfTheDay => "Word Wisdom",
            Self::Poetic => "Poetic",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Category {
    type Err = OracleError;

    /// Accepts the persisted identifier or the label, ignoring case,
    /// spaces, dashes and underscores.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .flat_map(char::to_lowercase)
            .collect();
        match normalized.as_str() {
            "motivational" => Ok(Self::Motivational),
            "wordoftheday" | "wordwisdom" | "word" => Ok(Self::WordOfTheDay),
            "poetic" => Ok(Self::Poetic),
            _ => Err(OracleError::UnknownCategory(s.to_string())),
        }
    }
}

/// The category a user asks to draw from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategorySelection {
    /// Pick one of the categories uniformly at draw time.
    #[default]
    Random,
    /// Always draw from this category.
    Fixed(Category),
}

impl std::fmt::Display for CategorySelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Random => write!(f, "Random"),
            Self::Fixed(category) => write!(f, "{category}"),
        }
    }
}

impl FromStr for CategorySelection {
    type Err = OracleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("random") {
            Ok(Self::Random)
        } else {
            s.trim().parse().map(Self::Fixed)
        }
    }
}

impl From<Category> for CategorySelection {
    fn from(category: Category) -> Self {
        Self::Fixed(category)
    }
}
