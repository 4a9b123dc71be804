//! Function-pointer finite state machine engine.
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │  StateTable                                                   │
//! │  ┌────────────┬──────────┬──────────┬────────────────────────┐│
//! │  │ StateId    │ on_enter │ on_exit  │ on_event               ││
//! │  ├────────────┼──────────┼──────────┼────────────────────────┤│
//! │  │ Idle       │ fn(ctx)  │ None     │ fn(ctx, ev)->Option<>  ││
//! │  │ Dispensing │ fn(ctx)  │ fn(ctx)  │ fn(ctx, ev)->Option<>  ││
//! │  └────────────┴──────────┴──────────┴────────────────────────┘│
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! The machine is purely event-driven: the service dispatches an
//! [`FsmEvent`] whenever a scheduler task produces one.  If the current
//! state's `on_event` returns `Some(next_id)`, the engine runs `on_exit`
//! for the current state, then `on_enter` for the next.  All handlers
//! receive `&mut ControlState`.

pub mod states;

use log::info;

use crate::state::ControlState;

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

/// Must stay in sync with the table built in [`states::build_state_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum StateId {
    Idle = 0,
    Dispensing = 1,
}

impl StateId {
    /// Total number of states, used to size the table array.
    pub const COUNT: usize = 2;

    /// Convert a table index back to `StateId`.  Out-of-range indices
    /// assert in debug builds and fall back to `Idle`, the safe state.
    pub fn from_index(idx: usize) -> Self {
        match idx {
            0 => Self::Idle,
            1 => Self::Dispensing,
            _ => {
                debug_assert!(false, "invalid state index: {idx}");
                Self::Idle
            }
        }
    }
}

/// Inputs the dispensing machine reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsmEvent {
    /// Debounced button edge to "released".
    ButtonReleased,
    /// The pump window of the current session ran out.
    PumpWindowElapsed,
    /// The session window ran out.
    SessionWindowElapsed,
}

// ---------------------------------------------------------------------------
// Function-pointer type aliases
// ---------------------------------------------------------------------------

/// `on_enter` / `on_exit`.  Run exactly once per transition.
pub type StateActionFn = fn(&mut ControlState);

/// Event handler.  Returns `Some(next)` to transition, `None` to stay.
pub type StateEventFn = fn(&mut ControlState, FsmEvent) -> Option<StateId>;

// ---------------------------------------------------------------------------
// State descriptor (one row in the table)
// ---------------------------------------------------------------------------

pub struct StateDescriptor {
    pub id: StateId,
    pub name: &'static str,
    pub on_enter: Option<StateActionFn>,
    pub on_exit: Option<StateActionFn>,
    pub on_event: StateEventFn,
}

// ---------------------------------------------------------------------------
// FSM engine
// ---------------------------------------------------------------------------

pub struct Fsm {
    /// Fixed-size table indexed by `StateId as usize`.
    table: [StateDescriptor; StateId::COUNT],
    current: usize,
    /// Time the current state was entered.
    entered_at_ms: u32,
    transitions: u32,
}

impl Fsm {
    pub fn new(table: [StateDescriptor; StateId::COUNT], initial: StateId) -> Self {
        Self {
            table,
            current: initial as usize,
            entered_at_ms: 0,
            transitions: 0,
        }
    }

    /// Run the initial `on_enter`.  Call once, before the first dispatch.
    pub fn start(&mut self, ctx: &mut ControlState) {
        info!("FSM starting in state: {}", self.table[self.current].name);
        self.entered_at_ms = ctx.now_ms;
        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }

    /// Feed one event.  Returns `(from, to)` if it caused a transition.
    pub fn dispatch(
        &mut self,
        event: FsmEvent,
        ctx: &mut ControlState,
    ) -> Option<(StateId, StateId)> {
        let from = self.current_state();
        let next = (self.table[self.current].on_event)(ctx, event)?;
        self.transition(next, ctx);
        Some((from, next))
    }

    pub fn current_state(&self) -> StateId {
        StateId::from_index(self.current)
    }

    /// Milliseconds spent in the current state as of `now_ms`.
    pub fn ms_in_current_state(&self, now_ms: u32) -> u32 {
        now_ms.wrapping_sub(self.entered_at_ms)
    }

    /// Transitions taken since start.
    pub fn transition_count(&self) -> u32 {
        self.transitions
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    fn transition(&mut self, next_id: StateId, ctx: &mut ControlState) {
        let next_idx = next_id as usize;

        info!(
            "FSM transition: {} -> {}",
            self.table[self.current].name, self.table[next_idx].name
        );

        if let Some(exit) = self.table[self.current].on_exit {
            exit(ctx);
        }

        self.current = next_idx;
        self.entered_at_ms = ctx.now_ms;
        self.transitions = self.transitions.wrapping_add(1);

        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }
}
