//! Persisted, capped history log.

use tracing::{debug, warn};

use super::entry::{HistoryEntry, HistoryFilter};
use crate::config::OracleConfig;
use crate::storage::Storage;

/// Base name of the history key.
pub const HISTORY_KEY: &str = "history";

/// Newest-first log of past draws, capped at a fixed length.
///
/// Entries are never edited. The store only prepends, truncates to the cap,
/// or clears everything.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    key: String,
    cap: usize,
}

impl HistoryStore {
    /// Create a store over `key` holding at most `cap` entries.
    pub fn new(key: impl Into<String>, cap: usize) -> Self {
        Self {
            key: key.into(),
            cap: cap.max(1),
        }
    }

    /// Create a store with the config's key and cap.
    pub fn from_config(config: &OracleConfig) -> Self {
        Self::new(config.key(HISTORY_KEY), config.history_cap)
    }

    /// Maximum number of entries kept.
    pub fn cap(&self) -> usize {
        self.cap
    }

    /// Load the persisted log. Missing or corrupt data yields an empty log.
    pub fn load(&self, storage: &impl Storage) -> Vec<HistoryEntry> {
        let raw = match storage.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!(key = %self.key, error = %e, "failed to read history");
                return Vec::new();
            }
        };
        match serde_json::from_str::<Vec<HistoryEntry>>(&raw) {
            Ok(mut entries) => {
                entries.truncate(self.cap);
                entries
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "discarding corrupt history");
                Vec::new()
            }
        }
    }

    /// Prepend `entry`, drop anything past the cap, persist, and return the
    /// resulting log.
    pub fn append(&self, storage: &mut impl Storage, entry: HistoryEntry) -> Vec<HistoryEntry> {
        let mut entries = self.load(storage);
        entries.insert(0, entry);
        entries.truncate(self.cap);
        self.save(storage, &entries);
        debug!(len = entries.len(), "history appended");
        entries
    }

    /// Remove every entry.
    pub fn clear(&self, storage: &mut impl Storage) {
        if let Err(e) = storage.remove(&self.key) {
            warn!(key = %self.key, error = %e, "failed to clear history");
        }
    }

    /// Entries passing `filter`, in their original order. Does not touch
    /// storage.
    pub fn filter(entries: &[HistoryEntry], filter: HistoryFilter) -> Vec<HistoryEntry> {
        entries
            .iter()
            .filter(|e| filter.matches(e))
            .cloned()
            .collect()
    }

    fn save(&self, storage: &mut impl Storage, entries: &[HistoryEntry]) {
        let result = serde_json::to_string(entries)
            .map_err(Into::into)
            .and_then(|json| storage.set(&self.key, &json));
        if let Err(e) = result {
            warn!(key = %self.key, error = %e, "failed to persist history");
        }
    }
}
