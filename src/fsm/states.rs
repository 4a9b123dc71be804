//! Concrete state handler functions and table builder.
//!
//! Each state is defined by plain `fn` pointers: no closures, no dynamic
//! dispatch, no heap.
//!
//! ```text
//!   IDLE ──[button released + credit]──▶ DISPENSING
//!    ▲                                    │   pump on, valve open
//!    │                                    │
//!    │                     [pump window]  │   pump off, valve open
//!    │                                    │
//!    └────────[session window]────────────┘   valve closed
//! ```
//!
//! Button edges while dispensing are swallowed; a session can only end
//! through its own timer.

use log::{debug, info};

use super::{FsmEvent, StateDescriptor, StateId};
use crate::app::tasks::TaskKind;
use crate::state::{ControlState, DispensingSession};

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the static state table.  Called once at startup.
pub fn build_state_table() -> [StateDescriptor; StateId::COUNT] {
    [
        // Index 0
        StateDescriptor {
            id: StateId::Idle,
            name: "Idle",
            on_enter: Some(idle_enter),
            on_exit: None,
            on_event: idle_event,
        },
        // Index 1
        StateDescriptor {
            id: StateId::Dispensing,
            name: "Dispensing",
            on_enter: Some(dispensing_enter),
            on_exit: Some(dispensing_exit),
            on_event: dispensing_event,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  IDLE state: waiting for a paid button release
// ═══════════════════════════════════════════════════════════════════════════

fn idle_enter(ctx: &mut ControlState) {
    let started_at_ms = ctx.session.started_at_ms;
    ctx.session = DispensingSession {
        started_at_ms,
        ..DispensingSession::idle(&ctx.config)
    };
    ctx.commands.dispensing = false;
    ctx.commands.pumping = false;
    info!("IDLE: valve closed, balance {}c", ctx.ledger.balance());
}

fn idle_event(ctx: &mut ControlState, event: FsmEvent) -> Option<StateId> {
    match event {
        FsmEvent::ButtonReleased => {
            if ctx.ledger.try_consume(ctx.config.price_cents) {
                Some(StateId::Dispensing)
            } else {
                // Not an error: the edge is simply absorbed.
                debug!(
                    "IDLE: {}c is not enough for {:?}c",
                    ctx.ledger.balance(),
                    ctx.config.price_cents
                );
                None
            }
        }
        FsmEvent::PumpWindowElapsed | FsmEvent::SessionWindowElapsed => None,
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  DISPENSING state: pump window inside session window
// ═══════════════════════════════════════════════════════════════════════════

fn dispensing_enter(ctx: &mut ControlState) {
    ctx.session = DispensingSession {
        active: true,
        pumping: true,
        started_at_ms: Some(ctx.now_ms),
        blink_period_ms: ctx.config.blink_dispensing_ms,
    };
    ctx.commands.dispensing = true;
    ctx.commands.pumping = true;

    ctx.schedule(TaskKind::PumpWindow, ctx.config.pump_duration_ms);
    ctx.schedule(TaskKind::SessionWindow, ctx.config.session_duration_ms);

    info!(
        "DISPENSING: pump {}ms, valve {}ms, balance left {}c",
        ctx.config.pump_duration_ms,
        ctx.config.session_duration_ms,
        ctx.ledger.balance()
    );
}

fn dispensing_exit(ctx: &mut ControlState) {
    ctx.session.pumping = false;
    ctx.session.active = false;
    ctx.commands.pumping = false;
    ctx.commands.dispensing = false;
    info!("DISPENSING: session complete");
}

fn dispensing_event(ctx: &mut ControlState, event: FsmEvent) -> Option<StateId> {
    match event {
        FsmEvent::ButtonReleased => {
            debug!("DISPENSING: button ignored, session in progress");
            None
        }
        FsmEvent::PumpWindowElapsed => {
            ctx.session.pumping = false;
            ctx.commands.pumping = false;
            info!("DISPENSING: pump stopped");
            None
        }
        FsmEvent::SessionWindowElapsed => Some(StateId::Idle),
    }
}
