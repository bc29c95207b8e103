//! Persisted theme preference.
//!
//! The core only stores which theme is selected. What a theme looks like is
//! up to the presentation layer.

use std::str::FromStr;

use tracing::warn;

use crate::config::OracleConfig;
use crate::error::OracleError;
use crate::storage::Storage;

/// Base name of the theme key.
pub const THEME_KEY: &str = "theme";

/// Built-in visual themes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    /// Purple night sky.
    #[default]
    Cosmic,
    /// Black and red.
    DarkOracle,
    /// Light greys.
    MinimalZen,
}

impl Theme {
    /// All themes, in display order.
    pub const ALL: [Theme; 3] = [Self::Cosmic, Self::DarkOracle, Self::MinimalZen];

    /// Persisted identifier.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cosmic => "cosmic",
            Self::DarkOracle => "darkOracle",
            Self::MinimalZen => "minimalZen",
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Theme {
    type Err = OracleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .flat_map(char::to_lowercase)
            .collect();
        match normalized.as_str() {
            "cosmic" => Ok(Self::Cosmic),
            "darkoracle" => Ok(Self::DarkOracle),
            "minimalzen" | "zen" => Ok(Self::MinimalZen),
            _ => Err(OracleError::UnknownTheme(s.to_string())),
        }
    }
}

/// Reads and writes the selected theme.
#[derive(Debug, Clone)]
pub struct ThemeStore {
    key: String,
}

impl ThemeStore {
    /// Create a store over `key`.
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    /// Create a store with the config's key.
    pub fn from_config(config: &OracleConfig) -> Self {
        Self::new(config.key(THEME_KEY))
    }

    /// The persisted theme, or the default if none or unrecognized.
    pub fn load(&self, storage: &impl Storage) -> Theme {
        match storage.get(&self.key) {
            Ok(Some(raw)) => raw.parse().unwrap_or_else(|e| {
                warn!(key = %self.key, error = %e, "ignoring unknown theme");
                Theme::default()
            }),
            Ok(None) => Theme::default(),
            Err(e) => {
                warn!(key = %self.key, error = %e, "failed to read theme");
                Theme::default()
            }
        }
    }

    /// Persist `theme`.
    pub fn save(&self, storage: &mut impl Storage, theme: Theme) {
        if let Err(e) = storage.set(&self.key, theme.as_str()) {
            warn!(key = %self.key, error = %e, "failed to persist theme");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FailingStorage, MemoryStorage};

    #[test]
    fn defaults_to_cosmic() {
        let storage = MemoryStorage::new();
        assert_eq!(ThemeStore::new(THEME_KEY).load(&storage), Theme::Cosmic);
    }

    #[test]
    fn save_and_load() {
        let mut storage = MemoryStorage::new();
        let store = ThemeStore::new(THEME_KEY);
        store.save(&mut storage, Theme::DarkOracle);
        assert_eq!(storage.get(THEME_KEY).unwrap().as_deref(), Some("darkOracle"));
        assert_eq!(store.load(&storage), Theme::DarkOracle);
    }

    #[test]
    fn storage_failures_fall_back() {
        let mut storage = FailingStorage;
        let store = ThemeStore::new(THEME_KEY);
        store.save(&mut storage, Theme::DarkOracle);
        assert_eq!(store.load(&storage), Theme::Cosmic);
    }

    #[test]
    fn unknown_theme_falls_back() {
        let mut storage = MemoryStorage::new();
        storage.set(THEME_KEY, "neon").unwrap();
        assert_eq!(ThemeStore::new(THEME_KEY).load(&storage), Theme::Cosmic);
    }

    #[test]
    fn parse_names() {
        for theme in Theme::ALL {
            assert_eq!(theme.as_str().parse::<Theme>().unwrap(), theme);
        }
        assert_eq!("minimal-zen".parse::<Theme>().unwrap(), Theme::MinimalZen);
        assert!(matches!(
            "neon".parse::<Theme>(),
            Err(OracleError::UnknownTheme(_))
        ));
    }
}
