//! Outbound application events and the display frame.
//!
//! The [`FrameService`](super::service::FrameService) emits events through
//! the [`EventSink`](super::ports::EventSink) port and pushes
//! [`DisplayFrame`]s through the [`DisplayPort`](super::ports::DisplayPort).

use serde::{Deserialize, Serialize};

use crate::fsm::StateId;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    /// The service has started (carries initial state).
    Started(StateId),

    /// A coin pulse was credited.
    CoinAccepted { balance_cents: u32 },

    /// Coin line still asserted after the cooldown.  Diagnostic only.
    CoinTimingViolation { held_ms: u32 },

    /// The FSM transitioned between states.
    StateChanged { from: StateId, to: StateId },

    /// The pump window of the running session closed.
    PumpStopped,
}

/// What the display collaborator gets on every refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DisplayFrame {
    pub balance_cents: u32,
    /// `true` while coin pulses may still be arriving.
    pub counting: bool,
    /// Increments on every refresh; wraps.
    pub animation_frame: u32,
}
