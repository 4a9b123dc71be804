//! Shared control state threaded through every state-machine handler.
//!
//! `ControlState` is the blackboard the dispensing handlers read from and
//! write to: the configuration, the balance ledger, the current session,
//! the actuator commands the service applies after each task, and an
//! outbox of timers the handlers want scheduled.  Handlers never touch the
//! scheduler or the hardware directly.

use heapless::Vec;
use log::error;

use crate::app::tasks::TaskKind;
use crate::config::FrameConfig;
use crate::ledger::BalanceLedger;

/// Outbox capacity.  One dispensing entry needs two slots.
pub const MAX_TIMER_REQUESTS: usize = 4;

// ---------------------------------------------------------------------------
// Dispensing session
// ---------------------------------------------------------------------------

/// The bounded pour window.  `pumping` implies `active`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispensingSession {
    /// Valve open, state machine in `Dispensing`.
    pub active: bool,
    /// Pump relay on (first part of the session only).
    pub pumping: bool,
    /// Time the session was started, `None` before the first one.
    pub started_at_ms: Option<u32>,
    /// Status-indicator half-period; shortened while a session is active.
    pub blink_period_ms: u32,
}

impl DispensingSession {
    pub fn idle(config: &FrameConfig) -> Self {
        Self {
            active: false,
            pumping: false,
            started_at_ms: None,
            blink_period_ms: config.blink_idle_ms,
        }
    }
}

// ---------------------------------------------------------------------------
// Actuator commands (written by handlers; applied by the service)
// ---------------------------------------------------------------------------

/// Desired level of every output.  The service diffs this against what it
/// last applied and only issues the changed writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ActuatorCommands {
    /// Valve relay.
    pub dispensing: bool,
    /// Pump relay.
    pub pumping: bool,
    /// Status LEDs.
    pub status_on: bool,
    /// The single lit EL channel, if the choreography has started.
    pub lit_channel: Option<u8>,
}

impl ActuatorCommands {
    /// Every output off.
    pub fn all_off() -> Self {
        Self::default()
    }
}

// ---------------------------------------------------------------------------
// Timer outbox
// ---------------------------------------------------------------------------

/// A one-shot timer a handler wants registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerRequest {
    pub kind: TaskKind,
    pub delay_ms: u32,
}

// ---------------------------------------------------------------------------
// ControlState
// ---------------------------------------------------------------------------

pub struct ControlState {
    /// Fixed at construction.
    pub config: FrameConfig,
    /// Time of the task currently being handled.
    pub now_ms: u32,
    pub ledger: BalanceLedger,
    pub session: DispensingSession,
    pub commands: ActuatorCommands,
    /// Drained by the service right after each handler returns.
    pub timer_requests: Vec<TimerRequest, MAX_TIMER_REQUESTS>,
}

impl ControlState {
    pub fn new(config: FrameConfig) -> Self {
        Self {
            config,
            now_ms: 0,
            ledger: BalanceLedger::new(),
            session: DispensingSession::idle(&config),
            commands: ActuatorCommands::all_off(),
            timer_requests: Vec::new(),
        }
    }

    /// Ask for a one-shot `kind` task `delay_ms` from now.
    pub fn schedule(&mut self, kind: TaskKind, delay_ms: u32) {
        if self
            .timer_requests
            .push(TimerRequest { kind, delay_ms })
            .is_err()
        {
            error!("ControlState: timer outbox full, dropped {:?}", kind);
        }
    }

    /// Take every pending timer request.
    pub fn drain_timer_requests(&mut self) -> Vec<TimerRequest, MAX_TIMER_REQUESTS> {
        core::mem::take(&mut self.timer_requests)
    }
}
