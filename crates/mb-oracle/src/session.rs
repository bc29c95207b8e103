//! Oracle session: the draw and reveal state machine.
//!
//! `OracleSession` owns the storage backend and mediates every read and
//! write of history, usage and theme. A draw request moves the session from
//! `Idle`/`Revealed` to `Shaking` and schedules the reveal. The driver calls
//! [`OracleSession::poll`] once the deadline passes; the answer is sampled,
//! recorded and debited at that point.

use chrono::{DateTime, Utc};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::debug;

use crate::answers::pick_category;
use crate::category::{Category, CategorySelection};
use crate::clock::{Clock, SystemClock};
use crate::config::OracleConfig;
use crate::error::OracleResult;
use crate::history::{HistoryEntry, HistoryFilter, HistoryStore};
use crate::storage::Storage;
use crate::theme::{Theme, ThemeStore};
use crate::timer::{TimerId, TimerQueue};
use crate::usage::{UsageLimiter, UsageStatus};

/// Where the session is in the reveal sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Waiting for the first draw.
    #[default]
    Idle,
    /// A draw is in progress; further requests are ignored.
    Shaking,
    /// An answer is showing. A new draw may start.
    Revealed,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Shaking => write!(f, "Shaking"),
            Self::Revealed => write!(f, "Revealed"),
        }
    }
}

/// The outcome of one completed draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawResult {
    /// The revealed answer.
    pub answer: String,
    /// The category it came from.
    pub category: Category,
    /// The question asked for this draw. Empty if none.
    pub question: String,
}

/// How a draw request was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawAck {
    /// The session started shaking.
    Accepted,
    /// Ignored: a draw is already in progress.
    AlreadyShaking,
    /// Ignored: no draws left in the current window.
    Limited,
}

impl DrawAck {
    /// Whether the request started a draw.
    pub fn is_accepted(self) -> bool {
        self == Self::Accepted
    }
}

/// Something that happened while polling timers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The cosmetic flourish finished.
    FlourishEnded,
    /// A draw completed.
    Revealed {
        /// The revealed draw.
        result: DrawResult,
        /// Draws left after debiting this one.
        remaining: u32,
    },
}

#[derive(Debug, Clone, Copy)]
enum SessionTimer {
    Flourish,
    Reveal,
}

#[derive(Debug, Clone)]
struct PendingDraw {
    question: String,
    selection: CategorySelection,
}

/// A single user's oracle session.
pub struct OracleSession<S: Storage, C: Clock = SystemClock> {
    storage: S,
    clock: C,
    config: OracleConfig,
    history: HistoryStore,
    limiter: UsageLimiter,
    themes: ThemeStore,
    rng: StdRng,
    timers: TimerQueue<SessionTimer>,
    phase: Phase,
    current: Option<DrawResult>,
    current_question: String,
    pending: Option<PendingDraw>,
    flourish: Option<TimerId>,
    reduced_motion: bool,
}

impl<S: Storage> OracleSession<S, SystemClock> {
    /// Create a session on the system clock.
    pub fn new(storage: S, config: OracleConfig) -> OracleResult<Self> {
        Self::with_clock(storage, config, SystemClock)
    }
}

impl<S: Storage, C: Clock> OracleSession<S, C> {
    /// Create a session on an explicit clock.
    ///
    /// Fails if the configured answer book has an empty pool. Starts a fresh
    /// usage window if the stored one is missing or expired.
    pub fn with_clock(mut storage: S, config: OracleConfig, clock: C) -> OracleResult<Self> {
        config.answers.validate()?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let history = HistoryStore::from_config(&config);
        let limiter = UsageLimiter::from_config(&config);
        let themes = ThemeStore::from_config(&config);

        let status = limiter.check_and_maybe_reset(&mut storage, clock.now());
        debug!(remaining = status.remaining, limited = status.limited, "session opened");

        Ok(Self {
            storage,
            clock,
            reduced_motion: config.reduced_motion,
            config,
            history,
            limiter,
            themes,
            rng,
            timers: TimerQueue::new(),
            phase: Phase::Idle,
            current: None,
            current_question: String::new(),
            pending: None,
            flourish: None,
        })
    }

    /// Ask the oracle. Returns immediately; the answer arrives through
    /// [`poll`](Self::poll) once the shaking delay has passed.
    ///
    /// Ignored while shaking or when the quota is used up.
    pub fn request_draw(&mut self, question: &str, selection: CategorySelection) -> DrawAck {
        if self.phase == Phase::Shaking {
            debug!("draw ignored: already shaking");
            return DrawAck::AlreadyShaking;
        }

        let now = self.clock.now();
        let status = self.limiter.check_and_maybe_reset(&mut self.storage, now);
        if status.limited {
            debug!(resets_at = %status.resets_at, "draw ignored: limited");
            return DrawAck::Limited;
        }

        self.current = None;
        self.current_question = question.to_string();
        self.pending = Some(PendingDraw {
            question: question.to_string(),
            selection,
        });
        self.phase = Phase::Shaking;

        let delay = self.config.shake_delay_for(self.reduced_motion);
        self.timers.schedule(now + delay, SessionTimer::Reveal);
        if !self.reduced_motion {
            let id = self
                .timers
                .schedule(now + self.config.flourish_delay, SessionTimer::Flourish);
            self.flourish = Some(id);
        }

        debug!(%selection, delay_ms = delay.num_milliseconds(), "shaking");
        DrawAck::Accepted
    }

    /// Fire every timer due at the clock's current instant.
    pub fn poll(&mut self) -> Vec<SessionEvent> {
        let now = self.clock.now();
        let mut events = Vec::new();
        while let Some((id, timer)) = self.timers.pop_due(now) {
            match timer {
                SessionTimer::Flourish => {
                    if self.flourish == Some(id) {
                        self.flourish = None;
                    }
                    events.push(SessionEvent::FlourishEnded);
                }
                SessionTimer::Reveal => {
                    if let Some(event) = self.reveal(now) {
                        events.push(event);
                    }
                }
            }
        }
        events
    }

    fn reveal(&mut self, now: DateTime<Utc>) -> Option<SessionEvent> {
        let pending = self.pending.take()?;
        if let Some(id) = self.flourish.take() {
            self.timers.cancel(id);
        }

        let category = pick_category(pending.selection, &mut self.rng);
        let answer = self
            .config
            .answers
            .sample(category, &mut self.rng)
            .to_string();

        self.history.append(
            &mut self.storage,
            HistoryEntry::new(answer.clone(), category, pending.question.clone(), now),
        );
        let remaining = self.limiter.debit(&mut self.storage, now);

        let result = DrawResult {
            answer,
            category,
            question: pending.question,
        };
        self.current = Some(result.clone());
        self.phase = Phase::Revealed;
        debug!(%category, remaining, "revealed");

        Some(SessionEvent::Revealed { result, remaining })
    }

    /// When the next timer is due, if any.
    pub fn next_deadline(&self) -> Option<DateTime<Utc>> {
        self.timers.next_due()
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The draw currently showing.
    pub fn current_draw(&self) -> Option<&DrawResult> {
        self.current.as_ref()
    }

    /// The answer currently showing.
    pub fn current_answer(&self) -> Option<&str> {
        self.current.as_ref().map(|d| d.answer.as_str())
    }

    /// The category of the answer currently showing.
    pub fn current_category(&self) -> Option<Category> {
        self.current.as_ref().map(|d| d.category)
    }

    /// The question captured for the latest accepted draw.
    pub fn current_question(&self) -> &str {
        &self.current_question
    }

    /// Whether the cosmetic flourish is running.
    pub fn flourish_active(&self) -> bool {
        self.flourish.is_some()
    }

    /// Quota readout at the current instant. Never writes.
    pub fn usage(&self) -> UsageStatus {
        self.limiter.peek(&self.storage, self.clock.now())
    }

    /// Draws left in the current window.
    pub fn remaining_draws(&self) -> u32 {
        self.usage().remaining
    }

    /// Whether the quota is used up for the current window.
    pub fn is_limited(&self) -> bool {
        self.usage().limited
    }

    /// Persisted history, newest first.
    pub fn history(&self) -> Vec<HistoryEntry> {
        self.history.load(&self.storage)
    }

    /// Persisted history passing `filter`, newest first.
    pub fn history_entries(&self, filter: HistoryFilter) -> Vec<HistoryEntry> {
        HistoryStore::filter(&self.history(), filter)
    }

    /// Delete all history.
    pub fn clear_history(&mut self) {
        self.history.clear(&mut self.storage);
    }

    /// The persisted theme.
    pub fn theme(&self) -> Theme {
        self.themes.load(&self.storage)
    }

    /// Persist a theme choice.
    pub fn set_theme(&mut self, theme: Theme) {
        self.themes.save(&mut self.storage, theme);
    }

    /// Whether reduced motion is preferred.
    pub fn reduced_motion(&self) -> bool {
        self.reduced_motion
    }

    /// Update the reduced-motion preference. Applies from the next draw.
    pub fn set_reduced_motion(&mut self, reduced: bool) {
        self.reduced_motion = reduced;
    }

    /// The session configuration.
    pub fn config(&self) -> &OracleConfig {
        &self.config
    }

    /// The session clock.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// The storage backend.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Consume the session and return its storage.
    pub fn into_storage(self) -> S {
        self.storage
    }
}
