//! Configuration for an oracle session.

use chrono::TimeDelta;

use crate::answers::AnswerBook;

/// Draws allowed per usage window.
pub const DEFAULT_QUOTA: u32 = 3;
/// Length of the rolling usage window, in hours.
pub const DEFAULT_WINDOW_HOURS: i64 = 2;
/// Shaking time under normal motion, in milliseconds.
pub const DEFAULT_SHAKE_MS: i64 = 1200;
/// Shaking time under reduced motion, in milliseconds.
pub const DEFAULT_REDUCED_SHAKE_MS: i64 = 300;
/// Length of the cosmetic flourish, in milliseconds.
pub const DEFAULT_FLOURISH_MS: i64 = 800;
/// Maximum number of persisted history entries.
pub const DEFAULT_HISTORY_CAP: usize = 20;

/// Configuration for an oracle session.
#[derive(Debug, Clone)]
pub struct OracleConfig {
    /// RNG seed for reproducible draws. `None` seeds from OS entropy.
    pub seed: Option<u64>,
    /// Draws allowed per window.
    pub quota: u32,
    /// Length of the rolling usage window.
    pub window: TimeDelta,
    /// Shaking time under normal motion.
    pub shake_delay: TimeDelta,
    /// Shaking time under reduced motion.
    pub reduced_shake_delay: TimeDelta,
    /// Length of the cosmetic flourish (normal motion only).
    pub flourish_delay: TimeDelta,
    /// Maximum number of persisted history entries.
    pub history_cap: usize,
    /// Initial reduced-motion preference.
    pub reduced_motion: bool,
    /// Prefix prepended to every storage key.
    pub namespace: String,
    /// Answer pools to draw from.
    pub answers: AnswerBook,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            seed: None,
            quota: DEFAULT_QUOTA,
            window: TimeDelta::hours(DEFAULT_WINDOW_HOURS),
            shake_delay: TimeDelta::milliseconds(DEFAULT_SHAKE_MS),
            reduced_shake_delay: TimeDelta::milliseconds(DEFAULT_REDUCED_SHAKE_MS),
            flourish_delay: TimeDelta::milliseconds(DEFAULT_FLOURISH_MS),
            history_cap: DEFAULT_HISTORY_CAP,
            reduced_motion: false,
            namespace: String::new(),
            answers: AnswerBook::default(),
        }
    }
}

impl OracleConfig {
    /// Set the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the number of draws per window.
    pub fn with_quota(mut self, quota: u32) -> Self {
        self.quota = quota;
        self
    }

    /// Set the usage window length.
    pub fn with_window(mut self, window: TimeDelta) -> Self {
        self.window = window;
        self
    }

    /// Set the shaking times for normal and reduced motion.
    pub fn with_shake_delays(mut self, normal: TimeDelta, reduced: TimeDelta) -> Self {
        self.shake_delay = normal;
        self.reduced_shake_delay = reduced;
        self
    }

    /// Set the flourish length.
    pub fn with_flourish_delay(mut self, delay: TimeDelta) -> Self {
        self.flourish_delay = delay;
        self
    }

    /// Set the history cap (at least 1).
    pub fn with_history_cap(mut self, cap: usize) -> Self {
        self.history_cap = cap.max(1);
        self
    }

    /// Set the initial reduced-motion preference.
    pub fn with_reduced_motion(mut self, reduced: bool) -> Self {
        self.reduced_motion = reduced;
        self
    }

    /// Set the storage key prefix, e.g. `"8ball_"`.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Set the answer pools.
    pub fn with_answers(mut self, answers: AnswerBook) -> Self {
        self.answers = answers;
        self
    }

    /// Storage key for `name` under this config's namespace.
    pub fn key(&self, name: &str) -> String {
        format!("{}{name}", self.namespace)
    }

    /// Shaking time for the given motion preference.
    pub fn shake_delay_for(&self, reduced_motion: bool) -> TimeDelta {
        if reduced_motion {
            self.reduced_shake_delay
        } else {
            self.shake_delay
        }
    }
}
