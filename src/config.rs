//! System configuration parameters
//!
//! Every tunable of the cocktail frame is a compile-time constant.  The
//! [`FrameConfig`] value gathers them so the service and its tests can be
//! built against a specific set; it is handed over by value at construction
//! and never changes afterwards.

use serde::{Deserialize, Serialize};

use crate::error::Error;

// --- Timing ---

/// Delay between two host-loop iterations (each one calls `tick`).
pub const LOOP_INTERVAL_MS: u32 = 1;
/// Button sampling period.
pub const BUTTON_POLL_MS: u32 = 10;
/// Minimum time between two accepted button level changes.
pub const DEBOUNCE_WINDOW_MS: u32 = 100;
/// Coin line sampling period while waiting for a pulse.
pub const COIN_FAST_POLL_MS: u32 = 5;
/// Pause after a detected pulse; must outlast the acceptor's low-hold.
pub const COIN_COOLDOWN_MS: u32 = 60;
/// After the last pulse, how long the display shows "counting".
pub const COIN_SETTLE_MS: u32 = 500;
/// Pump relay on-time per session.
pub const PUMP_DURATION_MS: u32 = 1_000;
/// Valve open-time per session (session length).
pub const SESSION_DURATION_MS: u32 = 2_000;
/// Status indicator half-period while idle.
pub const BLINK_IDLE_MS: u32 = 500;
/// Status indicator half-period while dispensing.
pub const BLINK_DISPENSING_MS: u32 = 100;
/// Step period of the rotating EL choreography.
pub const CHOREOGRAPHY_INTERVAL_MS: u32 = 100;
/// Display push period.
pub const DISPLAY_REFRESH_MS: u32 = 250;

// --- Outputs ---

/// EL sequencer channels A..H.
pub const EL_CHANNEL_COUNT: u8 = 8;
/// Upper bound accepted by [`FrameConfig::validate`].
pub const MAX_EL_CHANNELS: u8 = 8;

// --- Money ---

/// Value credited per acceptor pulse.
pub const COIN_PULSE_VALUE_CENTS: u32 = 10;
/// Price of one cocktail.  `None` turns the frame into a free dispenser.
pub const COCKTAIL_PRICE_CENTS: Option<u32> = Some(100);

/// Core system configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameConfig {
    // --- Input sampling ---
    pub button_poll_ms: u32,
    pub debounce_window_ms: u32,
    pub coin_fast_poll_ms: u32,
    pub coin_cooldown_ms: u32,
    pub coin_settle_ms: u32,

    // --- Dispensing ---
    pub pump_duration_ms: u32,
    pub session_duration_ms: u32,

    // --- Effects ---
    pub blink_idle_ms: u32,
    pub blink_dispensing_ms: u32,
    pub choreography_interval_ms: u32,
    pub el_channel_count: u8,

    // --- Display ---
    pub display_refresh_ms: u32,

    // --- Money ---
    pub coin_pulse_value_cents: u32,
    /// `None` disables monetization entirely.
    pub price_cents: Option<u32>,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            button_poll_ms: BUTTON_POLL_MS,
            debounce_window_ms: DEBOUNCE_WINDOW_MS,
            coin_fast_poll_ms: COIN_FAST_POLL_MS,
            coin_cooldown_ms: COIN_COOLDOWN_MS,
            coin_settle_ms: COIN_SETTLE_MS,

            pump_duration_ms: PUMP_DURATION_MS,
            session_duration_ms: SESSION_DURATION_MS,

            blink_idle_ms: BLINK_IDLE_MS,
            blink_dispensing_ms: BLINK_DISPENSING_MS,
            choreography_interval_ms: CHOREOGRAPHY_INTERVAL_MS,
            el_channel_count: EL_CHANNEL_COUNT,

            display_refresh_ms: DISPLAY_REFRESH_MS,

            coin_pulse_value_cents: COIN_PULSE_VALUE_CENTS,
            price_cents: COCKTAIL_PRICE_CENTS,
        }
    }
}

impl FrameConfig {
    /// Whether dispensing has to be paid for.
    pub fn is_monetized(&self) -> bool {
        self.price_cents.is_some()
    }

    /// Reject combinations the control loop cannot honour.
    pub fn validate(&self) -> Result<(), Error> {
        let periods = [
            self.button_poll_ms,
            self.coin_fast_poll_ms,
            self.coin_cooldown_ms,
            self.pump_duration_ms,
            self.session_duration_ms,
            self.blink_idle_ms,
            self.blink_dispensing_ms,
            self.choreography_interval_ms,
            self.display_refresh_ms,
        ];
        if periods.contains(&0) {
            return Err(Error::Config("timer periods must be non-zero"));
        }
        if self.pump_duration_ms > self.session_duration_ms {
            return Err(Error::Config("pump window exceeds session window"));
        }
        if self.coin_cooldown_ms <= self.coin_fast_poll_ms {
            return Err(Error::Config("coin cooldown must outlast the fast poll"));
        }
        if self.el_channel_count == 0 || self.el_channel_count > MAX_EL_CHANNELS {
            return Err(Error::Config("EL channel count out of range"));
        }
        if self.price_cents == Some(0) {
            return Err(Error::Config("a configured price must be non-zero"));
        }
        Ok(())
    }
}
