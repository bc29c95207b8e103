//! History entry types.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::error::OracleError;

/// One past draw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// The answer that was revealed.
    pub text: String,
    /// The category it was drawn from.
    pub category: Category,
    /// The question asked before the draw. Empty if none.
    #[serde(default)]
    pub question: String,
    /// When the answer was revealed.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
}

impl HistoryEntry {
    /// Create an entry.
    pub fn new(
        text: impl Into<String>,
        category: Category,
        question: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            text: text.into(),
            category,
            question: question.into(),
            timestamp,
        }
    }

    /// The question, if one was asked.
    pub fn question(&self) -> Option<&str> {
        if self.question.is_empty() {
            None
        } else {
            Some(&self.question)
        }
    }
}

/// Which history entries to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HistoryFilter {
    /// Every entry.
    #[default]
    All,
    /// Only entries from one category.
    Category(Category),
}

impl HistoryFilter {
    /// Whether `entry` passes the filter.
    pub fn matches(self, entry: &HistoryEntry) -> bool {
        match self {
            Self::All => true,
            Self::Category(category) => entry.category == category,
        }
    }
}

impl std::fmt::Display for HistoryFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => write!(f, "All"),
            Self::Category(category) => write!(f, "{category}"),
        }
    }
}

impl FromStr for HistoryFilter {
    type Err = OracleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(Self::All)
        } else {
            s.trim().parse().map(Self::Category)
        }
    }
}

impl From<Category> for HistoryFilter {
    fn from(category: Category) -> Self {
        Self::Category(category)
    }
}
