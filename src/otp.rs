//! Detection of security keys typing a one-time password.
//!
//! Many hardware keys also act as a USB keyboard and emit a long OTP string
//! when touched. Users who touch the key before the browser prompt is open
//! end up "typing" into the page. A burst of keystrokes far faster than a
//! human can type is the tell.

use std::collections::VecDeque;

/// Maximum number of timestamps kept.
pub const WINDOW_CAPACITY: usize = 50;
/// Number of keystrokes that make up a burst.
pub const BURST_LENGTH: usize = 10;
/// A burst spans strictly less than this many milliseconds.
pub const BURST_SPAN_MS: f64 = 200.0;

#[derive(Debug)]
pub struct KeystrokeMonitor {
    timestamps: VecDeque<f64>,
    active: bool,
}

impl Default for KeystrokeMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl KeystrokeMonitor {
    #[must_use]
    pub fn new() -> Self {
        Self {
            timestamps: VecDeque::with_capacity(WINDOW_CAPACITY),
            active: true,
        }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Stops detection for the rest of the page lifetime.
    pub fn disable(&mut self) {
        self.active = false;
        self.timestamps.clear();
    }

    /// Records a keydown and reports whether it completes a burst.
    ///
    /// Returns `true` at most once; detection is disabled afterwards.
    pub fn record(&mut self, key: &str, now_ms: f64) -> bool {
        if !self.active || !counts(key) {
            return false;
        }

        self.timestamps.push_back(now_ms);
        if self.timestamps.len() > WINDOW_CAPACITY {
            self.timestamps.pop_front();
        }

        let len = self.timestamps.len();
        if len < BURST_LENGTH {
            return false;
        }

        let oldest = self.timestamps[len - BURST_LENGTH];
        if now_ms - oldest < BURST_SPAN_MS {
            self.disable();
            return true;
        }

        false
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.timestamps.len()
    }
}

// Named keys (Shift, ArrowLeft, ...) are not characters; Enter ends an OTP.
fn counts(key: &str) -> bool {
    key.chars().count() <= 1 || key == "Enter"
}
