//! Deterministic timer queue.
//!
//! Timers are plain data: a due instant and a payload. Nothing fires on its
//! own. The owner asks for due timers at an instant it chooses, which keeps
//! the reveal sequence testable with a manual clock.

use chrono::{DateTime, Utc};

/// Handle to a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

#[derive(Debug, Clone)]
struct Scheduled<T> {
    id: TimerId,
    due: DateTime<Utc>,
    payload: T,
}

/// Pending timers ordered by due instant, then by scheduling order.
#[derive(Debug, Clone)]
pub struct TimerQueue<T> {
    pending: Vec<Scheduled<T>>,
    next_id: u64,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self {
            pending: Vec::new(),
            next_id: 0,
        }
    }
}

impl<T> TimerQueue<T> {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `payload` to fire at `due`.
    pub fn schedule(&mut self, due: DateTime<Utc>, payload: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        // Insert after every timer due at or before `due` so ties keep
        // scheduling order.
        let at = self.pending.partition_point(|s| s.due <= due);
        self.pending.insert(at, Scheduled { id, due, payload });
        id
    }

    /// Cancel a timer. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|s| s.id != id);
        self.pending.len() < before
    }

    /// Whether `id` is still pending.
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.pending.iter().any(|s| s.id == id)
    }

    /// When the earliest pending timer is due.
    pub fn next_due(&self) -> Option<DateTime<Utc>> {
        self.pending.first().map(|s| s.due)
    }

    /// Remove and return the earliest timer due at or before `now`.
    pub fn pop_due(&mut self, now: DateTime<Utc>) -> Option<(TimerId, T)> {
        if self.pending.first().is_some_and(|s| s.due <= now) {
            let s = self.pending.remove(0);
            Some((s.id, s.payload))
        } else {
            None
        }
    }

    /// Number of pending timers.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether no timers are pending.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    fn at(ms: i64) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(ms).unwrap()
    }

    #[test]
    fn fires_in_due_order() {
        let mut q = TimerQueue::new();
        q.schedule(at(1200), "reveal");
        q.schedule(at(800), "flourish");
        assert_eq!(q.next_due(), Some(at(800)));

        assert!(q.pop_due(at(799)).is_none());
        assert_eq!(q.pop_due(at(1300)).map(|(_, p)| p), Some("flourish"));
        assert_eq!(q.pop_due(at(1300)).map(|(_, p)| p), Some("reveal"));
        assert!(q.is_empty());
    }

    #[test]
    fn ties_keep_scheduling_order() {
        let mut q = TimerQueue::new();
        q.schedule(at(10), 1);
        q.schedule(at(10), 2);
        q.schedule(at(5) + TimeDelta::milliseconds(5), 3);
        let fired: Vec<_> = std::iter::from_fn(|| q.pop_due(at(10)).map(|(_, p)| p)).collect();
        assert_eq!(fired, [1, 2, 3]);
    }

    #[test]
    fn cancel_removes_timer() {
        let mut q = TimerQueue::new();
        let a = q.schedule(at(10), 'a');
        let b = q.schedule(at(20), 'b');
        assert!(q.cancel(a));
        assert!(!q.cancel(a));
        assert!(!q.is_pending(a));
        assert!(q.is_pending(b));
        assert_eq!(q.len(), 1);
        assert_eq!(q.next_due(), Some(at(20)));
    }
}
