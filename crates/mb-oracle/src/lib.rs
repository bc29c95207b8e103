//! Fortune ball oracle core.
//!
//! Provides the usage quota (a rolling window of draws), the timed reveal
//! state machine that turns a draw request into an answer, the capped answer
//! history, and the theme preference. All state goes through an injected
//! [`Storage`] port so the core runs the same against memory or disk.

pub mod answers;
pub mod category;
pub mod clock;
pub mod config;
pub mod error;
pub mod history;
pub mod session;
pub mod storage;
pub mod theme;
pub mod timer;
pub mod usage;

pub use answers::AnswerBook;
pub use category::{Category, CategorySelection};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::OracleConfig;
pub use error::{OracleError, OracleResult};
pub use history::{HistoryEntry, HistoryFilter, HistoryStore};
pub use session::{DrawAck, DrawResult, OracleSession, Phase, SessionEvent};
pub use storage::{FileStorage, MemoryStorage, Storage};
pub use theme::{Theme, ThemeStore};
pub use usage::{UsageLimiter, UsageStatus};
