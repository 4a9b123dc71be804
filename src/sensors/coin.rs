//! Coin acceptor pulse detector.
//!
//! The acceptor pulls its open-collector output LOW for a fixed time
//! (~30–50 ms, set by DIP switches) once per credited increment.  A coin
//! worth several increments produces a burst of such pulses.
//!
//! The line is polled with two speeds:
//!
//! ```text
//!   Expecting ──[line LOW]──▶ pulse! ──▶ Cooldown (wait COOLDOWN)
//!       ▲                                   │
//!       │                         [line HIGH]   [line still LOW]
//!       │                                   │          │
//!       └────────── FAST_POLL ◀─────────────┘    timing violation
//!                                                (warn, then FAST_POLL)
//! ```
//!
//! Fast polling in `Expecting` catches the start of short pulses; the
//! cooldown skips over the low-hold so one pulse is counted once.  If the
//! line is still LOW when the cooldown ends, the acceptor's pulse width is
//! longer than the cooldown and pulses may be double counted or merged.
//! That is reported, never acted upon.

use log::{debug, warn};

use crate::scheduler::reached;

/// Which of the two polling speeds the detector is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoinPhase {
    /// Waiting for a pulse, sampling every fast-poll period.
    Expecting,
    /// A pulse was just counted, sampling again after the cooldown.
    Cooldown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoinEvent {
    /// One acceptor increment.
    Pulse,
    /// Line still asserted after a full cooldown.
    TimingViolation { held_ms: u32 },
}

/// Outcome of one poll: what happened and when to look again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoinPoll {
    pub event: Option<CoinEvent>,
    pub next: CoinPhase,
    pub delay_ms: u32,
}

pub struct CoinPulseDetector {
    fast_poll_ms: u32,
    cooldown_ms: u32,
    settle_ms: u32,
    last_pulse_ms: Option<u32>,
    pulses: u32,
    violations: u32,
}

impl CoinPulseDetector {
    pub fn new(fast_poll_ms: u32, cooldown_ms: u32, settle_ms: u32) -> Self {
        Self {
            fast_poll_ms,
            cooldown_ms,
            settle_ms,
            last_pulse_ms: None,
            pulses: 0,
            violations: 0,
        }
    }

    /// Evaluate one sample of the coin line taken in `phase`.
    pub fn poll(&mut self, phase: CoinPhase, asserted: bool, now_ms: u32) -> CoinPoll {
        match (asserted, phase) {
            (true, CoinPhase::Expecting) => {
                self.last_pulse_ms = Some(now_ms);
                self.pulses = self.pulses.wrapping_add(1);
                debug!("Coin: pulse #{} at {}ms", self.pulses, now_ms);
                CoinPoll {
                    event: Some(CoinEvent::Pulse),
                    next: CoinPhase::Cooldown,
                    delay_ms: self.cooldown_ms,
                }
            }
            (true, CoinPhase::Cooldown) => {
                let held_ms = self
                    .last_pulse_ms
                    .map_or(self.cooldown_ms, |t| now_ms.wrapping_sub(t));
                self.violations = self.violations.wrapping_add(1);
                warn!(
                    "Coin: line still LOW {}ms after pulse (cooldown {}ms too short for acceptor)",
                    held_ms, self.cooldown_ms
                );
                CoinPoll {
                    event: Some(CoinEvent::TimingViolation { held_ms }),
                    next: CoinPhase::Expecting,
                    delay_ms: self.fast_poll_ms,
                }
            }
            (false, _) => CoinPoll {
                event: None,
                next: CoinPhase::Expecting,
                delay_ms: self.fast_poll_ms,
            },
        }
    }

    /// `true` while a burst of pulses may still be arriving.
    pub fn is_counting(&self, now_ms: u32) -> bool {
        self.last_pulse_ms
            .is_some_and(|t| !reached(now_ms, t.wrapping_add(self.settle_ms)))
    }

    pub fn last_pulse_ms(&self) -> Option<u32> {
        self.last_pulse_ms
    }

    /// Pulses detected since boot.
    pub fn pulse_count(&self) -> u32 {
        self.pulses
    }

    /// Timing violations reported since boot.
    pub fn violation_count(&self) -> u32 {
        self.violations
    }
}
