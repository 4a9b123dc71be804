//! Typed scheduler payloads.
//!
//! Every job on the frame is one of these.  The payload tells the service
//! what to do when the task fires; data that changes between firings
//! (like the coin detector's phase) travels inside the variant.

use crate::scheduler::Timers;
use crate::sensors::coin::CoinPhase;

/// Task table capacity for the frame.  Five permanent tasks, one coin
/// link, two session windows, plus headroom.
pub const FRAME_TASKS: usize = 12;

/// Scheduler instance used by the frame service.
pub type FrameTimers = Timers<TaskKind, FRAME_TASKS>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    /// Sample and debounce the button.
    ButtonPoll,
    /// Sample the coin line; one-shot chain that re-registers itself.
    CoinPoll(CoinPhase),
    /// Toggle the status LEDs; period follows the session.
    StatusBlink,
    /// Step the EL channel rotation.
    Choreography,
    /// End of the pump window of the running session.
    PumpWindow,
    /// End of the running session.
    SessionWindow,
    /// Push a frame to the display.
    DisplayRefresh,
}
