//! Elapsed-time game timer
//!
//! Runs on the session clock (milliseconds). The display refreshes once per
//! interval, but reported elapsed time always comes from the start timestamp.

use serde::{Deserialize, Serialize};

use crate::consts::TIMER_INTERVAL_MS;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameTimer {
    started_at: Option<u64>,
    stopped_at: Option<u64>,
    next_tick_at: u64,
    /// Whole seconds currently shown in the HUD
    pub displayed_secs: u64,
}

impl GameTimer {
    /// Start the timer (no-op if it has already been started this game)
    pub fn start(&mut self, now: u64) {
        if self.started_at.is_some() {
            return;
        }
        self.started_at = Some(now);
        self.stopped_at = None;
        self.next_tick_at = now + TIMER_INTERVAL_MS;
        self.displayed_secs = 0;
    }

    /// Freeze the timer and snap the display to the exact elapsed time
    pub fn stop(&mut self, now: u64) {
        if self.is_running() {
            self.stopped_at = Some(now);
            self.displayed_secs = self.elapsed_ms(now) / 1000;
        }
    }

    /// Back to the never-started state
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn has_started(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn is_running(&self) -> bool {
        self.started_at.is_some() && self.stopped_at.is_none()
    }

    /// Milliseconds between start and `now` (or the stop time)
    pub fn elapsed_ms(&self, now: u64) -> u64 {
        match self.started_at {
            Some(start) => self.stopped_at.unwrap_or(now).saturating_sub(start),
            None => 0,
        }
    }

    /// Fire any due display ticks. Returns true if the display changed.
    pub fn advance(&mut self, now: u64) -> bool {
        let Some(start) = self.started_at else {
            return false;
        };
        if self.stopped_at.is_some() || now < self.next_tick_at {
            return false;
        }

        let secs = (now - start) / 1000;
        // Skip straight past any intervals missed during a long frame
        self.next_tick_at = start + (now - start) / TIMER_INTERVAL_MS * TIMER_INTERVAL_MS + TIMER_INTERVAL_MS;
        let changed = secs != self.displayed_secs;
        self.displayed_secs = secs;
        changed
    }
}
