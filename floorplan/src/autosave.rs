//! Draft autosave scheduling.
//!
//! DESIGN
//! ======
//! Two clocks decide when the editor writes its draft to local storage:
//! - Debounce: every edit calls `touch`, restarting a 1 s quiescence timer.
//!   When it elapses without another edit, the draft is flushed.
//! - Periodic: regardless of edits, a flush happens 10 s after the last one.
//!
//! Any flush resets both clocks. The scheduler does no I/O itself; the session
//! polls it and performs the write. Every entry point has an `_at(now)` variant
//! so tests drive time explicitly.

#[cfg(test)]
#[path = "autosave_test.rs"]
mod autosave_test;

use std::time::{Duration, Instant};

use crate::consts::{AUTOSAVE_DEBOUNCE_MS, AUTOSAVE_FLUSH_MS};

/// Why a flush is due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushReason {
    /// Edits stopped for the debounce interval.
    Debounced,
    /// The periodic interval elapsed.
    Periodic,
}

#[derive(Debug, Clone)]
pub struct AutoSave {
    debounce: Duration,
    period: Duration,
    dirty_since: Option<Instant>,
    last_flush: Instant,
}

impl Default for AutoSave {
    fn default() -> Self {
        Self::new()
    }
}

impl AutoSave {
    #[must_use]
    pub fn new() -> Self {
        Self::new_at(Instant::now())
    }

    #[must_use]
    pub fn new_at(now: Instant) -> Self {
        Self::with_intervals_at(
            Duration::from_millis(AUTOSAVE_DEBOUNCE_MS),
            Duration::from_millis(AUTOSAVE_FLUSH_MS),
            now,
        )
    }

    #[must_use]
    pub fn with_intervals_at(debounce: Duration, period: Duration, now: Instant) -> Self {
        Self { debounce, period, dirty_since: None, last_flush: now }
    }

    /// Record an edit, restarting the debounce timer.
    pub fn touch(&mut self) {
        self.touch_at(Instant::now());
    }

    pub fn touch_at(&mut self, now: Instant) {
        self.dirty_since = Some(now);
    }

    /// Whether an edit is waiting for its debounced write.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.dirty_since.is_some()
    }

    /// Check whether a flush is due; if so, mark it done and say why.
    pub fn poll(&mut self) -> Option<FlushReason> {
        self.poll_at(Instant::now())
    }

    pub fn poll_at(&mut self, now: Instant) -> Option<FlushReason> {
        let reason = match self.dirty_since {
            Some(since) if now.saturating_duration_since(since) >= self.debounce => FlushReason::Debounced,
            _ if now.saturating_duration_since(self.last_flush) >= self.period => FlushReason::Periodic,
            _ => return None,
        };
        self.flushed_at(now);
        Some(reason)
    }

    /// Record a flush that happened outside the scheduler (e.g. a manual save).
    pub fn flushed_at(&mut self, now: Instant) {
        self.dirty_since = None;
        self.last_flush = now;
    }
}
