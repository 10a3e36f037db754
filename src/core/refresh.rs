// LogPanel - core/refresh.rs
//
// Auto-refresh state machine: mode, interval backoff, rate limiting, and the
// single repeating timer.
//
// States:
//   Off        -- no timer armed.
//   Active     -- timer armed; fires every `interval_ms`.
//   Suspended  -- auto-refresh is on but the window is hidden and
//                 `only_when_visible` is set; no timer armed.
//
// The timer is one optional deadline. Arming always overwrites the previous
// deadline, so two intervals can never run at once. Time is passed in by the
// caller (`now: Instant`) to keep this module deterministic under test.

use crate::util::constants::{
    BACKOFF_DENOMINATOR, BACKOFF_NUMERATOR, MAX_REFRESH_INTERVAL_MS, MIN_AUTO_REFRESH_SPACING_MS,
    MIN_REFRESH_INTERVAL_MS,
};
use std::time::{Duration, Instant};

/// Auto-refresh mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoRefresh {
    Off,
    Active,
    Suspended,
}

impl AutoRefresh {
    /// Whether the user has auto-refresh switched on (active or suspended).
    pub fn is_on(&self) -> bool {
        !matches!(self, AutoRefresh::Off)
    }
}

/// Refresh timing state owned by the panel controller.
#[derive(Debug, Clone)]
pub struct RefreshState {
    mode: AutoRefresh,
    interval_ms: u64,
    only_when_visible: bool,
    page_visible: bool,
    last_refresh_at: Option<Instant>,
    next_tick: Option<Instant>,
}

/// Clamp a configured interval into the allowed range.
pub fn clamp_interval(interval_ms: u64) -> u64 {
    interval_ms.clamp(MIN_REFRESH_INTERVAL_MS, MAX_REFRESH_INTERVAL_MS)
}

impl RefreshState {
    /// Create the refresh state at controller start-up.
    ///
    /// The window is assumed visible at start, so `enabled` always starts in
    /// `Active` with the timer armed.
    pub fn new(interval_ms: u64, only_when_visible: bool, enabled: bool, now: Instant) -> Self {
        let mut state = Self {
            mode: AutoRefresh::Off,
            interval_ms: clamp_interval(interval_ms),
            only_when_visible,
            page_visible: true,
            last_refresh_at: None,
            next_tick: None,
        };
        if enabled {
            state.mode = AutoRefresh::Active;
            state.arm(now);
        }
        state
    }

    pub fn mode(&self) -> AutoRefresh {
        self.mode
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    /// Deadline of the armed timer, if any.
    pub fn next_tick(&self) -> Option<Instant> {
        self.next_tick
    }

    /// Flip auto-refresh between Off and Active.
    ///
    /// Turning it on does not consult visibility: the timer is armed
    /// immediately and a later hide event suspends it as usual.
    pub fn toggle(&mut self, now: Instant) -> AutoRefresh {
        if self.mode.is_on() {
            self.mode = AutoRefresh::Off;
            self.disarm();
        } else {
            self.mode = AutoRefresh::Active;
            self.arm(now);
        }
        tracing::info!(mode = ?self.mode, interval_ms = self.interval_ms, "Auto-refresh toggled");
        self.mode
    }

    /// Record a window visibility change.
    ///
    /// Only transitions matter; repeated reports of the same visibility are
    /// ignored so that per-frame polling does not keep re-arming the timer.
    pub fn set_page_visible(&mut self, visible: bool, now: Instant) {
        if visible == self.page_visible {
            return;
        }
        self.page_visible = visible;
        if !self.only_when_visible || !self.mode.is_on() {
            return;
        }
        if visible {
            self.mode = AutoRefresh::Active;
            self.arm(now);
            tracing::debug!("Window visible; auto-refresh resumed");
        } else {
            self.mode = AutoRefresh::Suspended;
            self.disarm();
            tracing::debug!("Window hidden; auto-refresh suspended");
        }
    }

    /// Check the timer. Returns true when it fired; the next deadline is then
    /// armed one (current) interval from `now`.
    pub fn poll_timer(&mut self, now: Instant) -> bool {
        match self.next_tick {
            Some(due) if now >= due => {
                self.arm(now);
                true
            }
            _ => false,
        }
    }

    /// Gate a refresh through the rate limit and record it.
    ///
    /// Manual refreshes always pass. Automatic ones are dropped when the
    /// previous refresh (of either kind) was less than
    /// `MIN_AUTO_REFRESH_SPACING_MS` ago.
    pub fn try_begin(&mut self, manual: bool, now: Instant) -> bool {
        if !manual {
            if let Some(last) = self.last_refresh_at {
                let since = now.saturating_duration_since(last);
                if since < Duration::from_millis(MIN_AUTO_REFRESH_SPACING_MS) {
                    tracing::debug!(
                        since_ms = since.as_millis() as u64,
                        "Automatic refresh rate-limited"
                    );
                    return false;
                }
            }
        }
        self.last_refresh_at = Some(now);
        true
    }

    /// Slow the timer down after a failed fetch.
    ///
    /// Only automatic refreshes back off, and only while auto-refresh is on.
    /// The interval grows by 1.5x up to `MAX_REFRESH_INTERVAL_MS` and takes
    /// effect from the next armed deadline.
    pub fn record_failure(&mut self, manual: bool) {
        if manual || !self.mode.is_on() {
            return;
        }
        let grown = self.interval_ms * BACKOFF_NUMERATOR / BACKOFF_DENOMINATOR;
        self.interval_ms = grown.min(MAX_REFRESH_INTERVAL_MS);
        tracing::info!(interval_ms = self.interval_ms, "Refresh failed; backing off");
    }

    /// Stop the loop for good: disarm the timer and switch auto-refresh off.
    pub fn shutdown(&mut self) {
        self.mode = AutoRefresh::Off;
        self.disarm();
    }

    fn arm(&mut self, now: Instant) {
        self.next_tick = Some(now + self.interval());
    }

    fn disarm(&mut self) {
        self.next_tick = None;
    }
}
