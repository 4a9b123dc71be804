//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the logger (UART / USB-CDC on the device, stderr on the host).

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started(state) => {
                info!("START | initial_state={:?}", state);
            }
            AppEvent::CoinAccepted { balance_cents } => {
                info!("COIN  | balance={}c", balance_cents);
            }
            AppEvent::CoinTimingViolation { held_ms } => {
                warn!(
                    "COIN  | pulse held {}ms past cooldown, check acceptor pulse width",
                    held_ms
                );
            }
            AppEvent::StateChanged { from, to } => {
                info!("STATE | {:?} -> {:?}", from, to);
            }
            AppEvent::PumpStopped => {
                info!("PUMP  | stopped, valve still open");
            }
        }
    }
}
