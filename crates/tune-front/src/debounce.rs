//! Query debouncer — turns keystrokes into rate-limited query commits.
//!
//! The debouncer is a plain state machine driven by explicit timestamps; the
//! owning event loop sleeps until [`Debouncer::deadline`] and then calls
//! [`Debouncer::poll`].  Only the latest text is ever held.

use std::time::Duration;

use tokio::time::Instant;

/// What the debouncer hands to the search coordinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Commit {
    /// The query became empty: clear results, fetch nothing.
    Clear,
    /// A trimmed, non-empty query that survived the quiet interval.
    Query(String),
}

#[derive(Debug)]
struct Pending {
    text: String,
    deadline: Instant,
}

#[derive(Debug)]
pub struct Debouncer {
    interval: Duration,
    pending: Option<Pending>,
}

impl Debouncer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            pending: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Feed the current input text.
    ///
    /// Empty (or whitespace-only) text commits `Clear` right away and drops
    /// whatever was pending.  Anything else restarts the quiet interval.
    pub fn input(&mut self, raw: &str, now: Instant) -> Option<Commit> {
        let text = raw.trim();
        if text.is_empty() {
            self.pending = None;
            return Some(Commit::Clear);
        }
        self.pending = Some(Pending {
            text: text.to_string(),
            deadline: now + self.interval,
        });
        None
    }

    /// When the pending text is due, if there is one.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.deadline)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Release the pending text once its quiet interval has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<Commit> {
        match &self.pending {
            Some(p) if p.deadline <= now => self.pending.take().map(|p| Commit::Query(p.text)),
            _ => None,
        }
    }

    /// Drop the pending text without committing it.
    pub fn cancel(&mut self) {
        self.pending = None;
    }
}
