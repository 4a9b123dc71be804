//! Hardware adapter: bridges GPIO pins to the domain port traits.
//!
//! Generic over `embedded-hal` 1.0 digital pins, so the same adapter runs
//! on ESP-IDF `PinDriver`s and on host mocks.  This is the only module
//! that knows about electrical polarity:
//!
//! | Signal        | Wiring                    | Port meaning          |
//! |---------------|---------------------------|-----------------------|
//! | Button        | to GND, pull-up           | HIGH = released       |
//! | Coin pulse    | open collector, pull-up   | LOW = asserted        |
//! | Pump / valve  | active-low relay board    | LOW = energised       |
//! | EL channels   | EL sequencer triac inputs | HIGH = lit            |
//! | Status LEDs   | board LED + EL board LED  | HIGH = on             |
//!
//! Pin errors are logged and swallowed.  A failed read falls back to the
//! idle level (button released, no coin) so a flaky line can never start a
//! session or credit money.

use embedded_hal::digital::{InputPin, OutputPin, PinState};
use log::warn;

use crate::app::ports::{ActuatorPort, SensorPort};

/// Concrete adapter that owns every pin of the frame.
pub struct HardwareAdapter<I, O, const N: usize> {
    button: I,
    coin: I,
    pump_relay: O,
    valve_relay: O,
    channels: [O; N],
    /// Board LED and EL-sequencer LED, blinked together.
    status_leds: [O; 2],
}

impl<I, O, const N: usize> HardwareAdapter<I, O, N>
where
    I: InputPin,
    O: OutputPin,
{
    pub fn new(
        button: I,
        coin: I,
        pump_relay: O,
        valve_relay: O,
        channels: [O; N],
        status_leds: [O; 2],
    ) -> Self {
        Self {
            button,
            coin,
            pump_relay,
            valve_relay,
            channels,
            status_leds,
        }
    }
}

fn drive<O: OutputPin>(pin: &mut O, state: PinState, what: &str) {
    if let Err(e) = pin.set_state(state) {
        warn!("GPIO: failed to drive {} {:?}: {:?}", what, state, e);
    }
}

/// Relays are active-low.
fn relay_level(energised: bool) -> PinState {
    PinState::from(!energised)
}

// ── SensorPort implementation ─────────────────────────────────

impl<I, O, const N: usize> SensorPort for HardwareAdapter<I, O, N>
where
    I: InputPin,
    O: OutputPin,
{
    fn read_button(&mut self) -> bool {
        self.button.is_high().unwrap_or_else(|e| {
            warn!("GPIO: button read failed: {:?}", e);
            true
        })
    }

    fn read_coin_pulse(&mut self) -> bool {
        self.coin.is_low().unwrap_or_else(|e| {
            warn!("GPIO: coin line read failed: {:?}", e);
            false
        })
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl<I, O, const N: usize> ActuatorPort for HardwareAdapter<I, O, N>
where
    I: InputPin,
    O: OutputPin,
{
    fn set_dispensing(&mut self, active: bool) {
        drive(&mut self.valve_relay, relay_level(active), "valve relay");
    }

    fn set_pumping(&mut self, active: bool) {
        drive(&mut self.pump_relay, relay_level(active), "pump relay");
    }

    fn set_all_channels(&mut self, active: bool) {
        for ch in &mut self.channels {
            drive(ch, PinState::from(active), "EL channel");
        }
    }

    fn set_channel(&mut self, index: u8, active: bool) {
        match self.channels.get_mut(usize::from(index)) {
            Some(ch) => drive(ch, PinState::from(active), "EL channel"),
            None => warn!("GPIO: EL channel {} out of range (have {})", index, N),
        }
    }

    fn set_status(&mut self, on: bool) {
        for led in &mut self.status_leds {
            drive(led, PinState::from(on), "status LED");
        }
    }
}
