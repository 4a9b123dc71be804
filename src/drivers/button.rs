//! Polled push-button debouncer.
//!
//! ## Hardware
//!
//! Illuminated momentary switch to GND with internal pull-up.  The line
//! reads HIGH when released and LOW while held.  The scheduler samples it
//! every `BUTTON_POLL_MS`.
//!
//! ## Filter
//!
//! A minimum-time-between-accepted-changes filter: the first read that
//! differs from the last *confirmed* level is accepted immediately, and for
//! the next `debounce_window_ms` every read is ignored.  Contact bounce
//! inside the window never reaches the state machine, and a single stable
//! read past the window is enough to confirm the next change.

use crate::scheduler::reached;

/// Confirmed level change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonEdge {
    /// HIGH → LOW.
    Pressed,
    /// LOW → HIGH.  This is the edge that starts a purchase.
    Released,
}

impl ButtonEdge {
    fn from_level(high: bool) -> Self {
        if high { Self::Released } else { Self::Pressed }
    }
}

pub struct ButtonDebouncer {
    window_ms: u32,
    /// Last accepted raw level (`true` = HIGH = released).
    confirmed_high: bool,
    /// Reads are ignored until this deadline.
    lockout_until: Option<u32>,
}

impl ButtonDebouncer {
    /// The pull-up holds the line HIGH at power-on, so the button starts
    /// out released.
    pub fn new(window_ms: u32) -> Self {
        Self {
            window_ms,
            confirmed_high: true,
            lockout_until: None,
        }
    }

    /// Feed one raw read.  Returns the edge if it confirms a level change.
    pub fn poll(&mut self, raw_high: bool, now_ms: u32) -> Option<ButtonEdge> {
        if let Some(until) = self.lockout_until {
            if !reached(now_ms, until) {
                return None;
            }
            self.lockout_until = None;
        }

        if raw_high == self.confirmed_high {
            return None;
        }

        self.confirmed_high = raw_high;
        self.lockout_until = Some(now_ms.wrapping_add(self.window_ms));
        Some(ButtonEdge::from_level(raw_high))
    }

    /// Whether the confirmed level is "held".
    pub fn is_pressed(&self) -> bool {
        !self.confirmed_high
    }
}
