//! Port traits: the hexagonal boundary between the frame logic and the
//! outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ FrameService (domain)
//! ```
//!
//! Driven adapters (GPIO, UART display, log sink) implement these traits.
//! The [`FrameService`](super::service::FrameService) consumes them via
//! generics, so the domain core never touches hardware directly and runs
//! unchanged against mocks on the host.

use super::events::{AppEvent, DisplayFrame};

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Raw, synchronous, non-blocking digital reads.
pub trait SensorPort {
    /// Raw button level: `true` = HIGH = released (pull-up).
    fn read_button(&mut self) -> bool;

    /// `true` while the coin acceptor asserts its pulse line.
    fn read_coin_pulse(&mut self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Level-setting, idempotent output commands.  Relay polarity is the
/// adapter's concern: `true` always means "energised".
pub trait ActuatorPort {
    /// Valve relay.
    fn set_dispensing(&mut self, active: bool);

    /// Pump relay.
    fn set_pumping(&mut self, active: bool);

    /// Every EL channel at once.
    fn set_all_channels(&mut self, active: bool);

    /// One EL channel.
    fn set_channel(&mut self, index: u8, active: bool);

    /// Status LEDs.
    fn set_status(&mut self, on: bool);

    /// Every output off: safe baseline.
    fn all_off(&mut self) {
        self.set_pumping(false);
        self.set_dispensing(false);
        self.set_all_channels(false);
        self.set_status(false);
    }
}

// ───────────────────────────────────────────────────────────────
// Display port (driven adapter: domain → display collaborator)
// ───────────────────────────────────────────────────────────────

/// Receives a frame on every display refresh.  Rendering is entirely the
/// implementor's business.
pub trait DisplayPort {
    fn present(&mut self, frame: &DisplayFrame);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`]s through this port.
pub trait EventSink {
    fn emit(&mut self, event: &AppEvent);
}
