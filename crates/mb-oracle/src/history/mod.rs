//! Answer history: entries, the capped store, and export.

pub mod entry;
pub mod export;
pub mod store;

pub use entry::{HistoryEntry, HistoryFilter};
pub use export::{export_markdown, export_text};
pub use store::HistoryStore;
