//! Application service: the hexagonal core.
//!
//! [`FrameService`] owns the scheduler, the dispensing FSM, the input
//! filters, the effects engine and the shared [`ControlState`].  All I/O
//! flows through port traits injected at call sites, making the entire
//! service testable with mock adapters.
//!
//! ```text
//!  SensorPort ──▶ ┌──────────────────────────────┐ ──▶ EventSink
//!                 │         FrameService         │
//! ActuatorPort ◀──│ Timers · FSM · ControlState  │ ──▶ DisplayPort
//!                 └──────────────────────────────┘
//! ```
//!
//! Each call to [`FrameService::tick`] runs every due task to completion,
//! registers whatever timers the FSM asked for, and finally writes the
//! outputs that changed.

use log::{debug, error, info};

use crate::config::FrameConfig;
use crate::drivers::button::{ButtonDebouncer, ButtonEdge};
use crate::drivers::effects::EffectsEngine;
use crate::error::{Error, Result};
use crate::fsm::states::build_state_table;
use crate::fsm::{Fsm, FsmEvent, StateId};
use crate::ledger::BalanceLedger;
use crate::scheduler::{TaskHandler, TaskId};
use crate::sensors::coin::{CoinEvent, CoinPhase, CoinPulseDetector};
use crate::state::{ActuatorCommands, ControlState, DispensingSession};

use super::events::{AppEvent, DisplayFrame};
use super::ports::{ActuatorPort, DisplayPort, EventSink, SensorPort};
use super::tasks::{FRAME_TASKS, FrameTimers, TaskKind};

// ───────────────────────────────────────────────────────────────
// FrameService
// ───────────────────────────────────────────────────────────────

pub struct FrameService {
    timers: FrameTimers,
    fsm: Fsm,
    state: ControlState,
    button: ButtonDebouncer,
    coin: CoinPulseDetector,
    effects: EffectsEngine,
    animation_frame: u32,
    /// Outputs as last written to the actuator port.  `None` until start.
    applied: Option<ActuatorCommands>,
    tick_count: u32,
}

impl FrameService {
    /// Construct the service from configuration.
    ///
    /// Does **not** register any task. Call [`start`](Self::start) next.
    pub fn new(config: FrameConfig) -> Self {
        Self {
            timers: FrameTimers::new(0),
            fsm: Fsm::new(build_state_table(), StateId::Idle),
            state: ControlState::new(config),
            button: ButtonDebouncer::new(config.debounce_window_ms),
            coin: CoinPulseDetector::new(
                config.coin_fast_poll_ms,
                config.coin_cooldown_ms,
                config.coin_settle_ms,
            ),
            effects: EffectsEngine::new(config.el_channel_count),
            animation_frame: 0,
            applied: None,
            tick_count: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Drive every output to a known baseline, register the permanent
    /// tasks relative to `now_ms` and enter `Idle`.
    pub fn start(
        &mut self,
        now_ms: u32,
        hw: &mut impl ActuatorPort,
        sink: &mut impl EventSink,
    ) -> Result<()> {
        if self.applied.is_some() {
            return Err(Error::Init("frame service already started"));
        }

        hw.all_off();
        self.applied = Some(ActuatorCommands::all_off());

        let cfg = self.state.config;
        self.timers = FrameTimers::new(now_ms);
        self.timers.every(TaskKind::ButtonPoll, cfg.button_poll_ms)?;
        self.timers
            .after(TaskKind::CoinPoll(CoinPhase::Expecting), cfg.coin_fast_poll_ms)?;
        self.timers.every(TaskKind::StatusBlink, cfg.blink_idle_ms)?;
        self.timers
            .every(TaskKind::Choreography, cfg.choreography_interval_ms)?;
        self.timers
            .every(TaskKind::DisplayRefresh, cfg.display_refresh_ms)?;

        self.state.now_ms = now_ms;
        self.fsm.start(&mut self.state);

        sink.emit(&AppEvent::Started(self.fsm.current_state()));
        info!(
            "FrameService started in {:?} with {} tasks (price {:?}c)",
            self.fsm.current_state(),
            self.timers.len(),
            cfg.price_cents
        );
        Ok(())
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run every task due at `now_ms`, then apply changed outputs.
    ///
    /// The `hw` parameter satisfies **both** [`SensorPort`] and
    /// [`ActuatorPort`], which avoids a double mutable borrow while
    /// keeping the port boundary explicit.
    pub fn tick(
        &mut self,
        now_ms: u32,
        hw: &mut (impl SensorPort + ActuatorPort),
        display: &mut impl DisplayPort,
        sink: &mut impl EventSink,
    ) {
        self.tick_count = self.tick_count.wrapping_add(1);

        let mut dispatch = Dispatch {
            fsm: &mut self.fsm,
            state: &mut self.state,
            button: &mut self.button,
            coin: &mut self.coin,
            effects: &mut self.effects,
            animation_frame: &mut self.animation_frame,
            hw: &mut *hw,
            display,
            sink,
        };
        self.timers.tick(now_ms, &mut dispatch);

        self.apply_actuators(hw);
    }

    // ── Queries ───────────────────────────────────────────────

    /// Current FSM state.
    pub fn state(&self) -> StateId {
        self.fsm.current_state()
    }

    pub fn balance(&self) -> u32 {
        self.state.ledger.balance()
    }

    /// The ledger, for crediting from outside the scheduler (coin ISR).
    pub fn ledger(&self) -> &BalanceLedger {
        &self.state.ledger
    }

    pub fn is_dispensing(&self) -> bool {
        self.state.session.active
    }

    pub fn is_pumping(&self) -> bool {
        self.state.session.pumping
    }

    pub fn session(&self) -> DispensingSession {
        self.state.session
    }

    /// Outputs as last written to the actuator port.
    pub fn applied(&self) -> Option<ActuatorCommands> {
        self.applied
    }

    pub fn config(&self) -> &FrameConfig {
        &self.state.config
    }

    /// Frame the display would get if it refreshed at `now_ms`.
    pub fn display_frame(&self, now_ms: u32) -> DisplayFrame {
        DisplayFrame {
            balance_cents: self.state.ledger.balance(),
            counting: self.coin.is_counting(now_ms),
            animation_frame: self.animation_frame,
        }
    }

    /// Registered scheduler tasks.
    pub fn task_count(&self) -> usize {
        self.timers.len()
    }

    /// Earliest pending task deadline.
    pub fn next_due(&self) -> Option<u32> {
        self.timers.next_due()
    }

    pub fn coin_pulses(&self) -> u32 {
        self.coin.pulse_count()
    }

    pub fn coin_violations(&self) -> u32 {
        self.coin.violation_count()
    }

    /// Total `tick` calls since construction.
    pub fn tick_count(&self) -> u32 {
        self.tick_count
    }

    // ── Internal ──────────────────────────────────────────────

    /// Write every output whose commanded level differs from the last
    /// applied one.  The pump is switched off before the valve closes and
    /// switched on only after it opens.
    fn apply_actuators(&mut self, hw: &mut impl ActuatorPort) {
        let want = self.state.commands;
        let prev = self.applied;
        if prev == Some(want) {
            return;
        }
        let changed = |f: fn(&ActuatorCommands) -> bool| prev.is_none_or(|p| f(&p) != f(&want));

        let pump_changed = changed(|c| c.pumping);
        if pump_changed && !want.pumping {
            hw.set_pumping(false);
        }
        if changed(|c| c.dispensing) {
            hw.set_dispensing(want.dispensing);
        }
        if pump_changed && want.pumping {
            hw.set_pumping(true);
        }
        if changed(|c| c.status_on) {
            hw.set_status(want.status_on);
        }

        let was_lit = prev.and_then(|p| p.lit_channel);
        if prev.is_none() || was_lit != want.lit_channel {
            match (was_lit, want.lit_channel) {
                (Some(old), Some(new)) => {
                    hw.set_channel(old, false);
                    hw.set_channel(new, true);
                }
                (None, Some(new)) => {
                    hw.set_all_channels(false);
                    hw.set_channel(new, true);
                }
                (_, None) => hw.set_all_channels(false),
            }
        }

        self.applied = Some(want);
    }
}

// ───────────────────────────────────────────────────────────────
// Task dispatch
// ───────────────────────────────────────────────────────────────

/// Borrows the service's parts for the duration of one scheduler tick so
/// task handlers can reach the scheduler (passed in by `Timers::tick`) and
/// everything else at the same time.
struct Dispatch<'a, H, D, S> {
    fsm: &'a mut Fsm,
    state: &'a mut ControlState,
    button: &'a mut ButtonDebouncer,
    coin: &'a mut CoinPulseDetector,
    effects: &'a mut EffectsEngine,
    animation_frame: &'a mut u32,
    hw: &'a mut H,
    display: &'a mut D,
    sink: &'a mut S,
}

impl<H, D, S> TaskHandler<TaskKind, FRAME_TASKS> for Dispatch<'_, H, D, S>
where
    H: SensorPort + ActuatorPort,
    D: DisplayPort,
    S: EventSink,
{
    fn on_task(&mut self, id: TaskId, kind: TaskKind, timers: &mut FrameTimers) {
        let now = timers.now_ms();
        self.state.now_ms = now;

        match kind {
            TaskKind::ButtonPoll => {
                let level = self.hw.read_button();
                if let Some(edge) = self.button.poll(level, now) {
                    debug!("Button: {:?} at {}ms", edge, now);
                    if edge == ButtonEdge::Released {
                        self.dispatch(FsmEvent::ButtonReleased);
                    }
                }
            }

            TaskKind::CoinPoll(phase) => {
                let asserted = self.hw.read_coin_pulse();
                let poll = self.coin.poll(phase, asserted, now);
                match poll.event {
                    Some(CoinEvent::Pulse) => {
                        let balance_cents = self
                            .state
                            .ledger
                            .accumulate(self.state.config.coin_pulse_value_cents);
                        self.sink.emit(&AppEvent::CoinAccepted { balance_cents });
                    }
                    Some(CoinEvent::TimingViolation { held_ms }) => {
                        self.sink.emit(&AppEvent::CoinTimingViolation { held_ms });
                    }
                    None => {}
                }
                if let Err(e) = timers.after(TaskKind::CoinPoll(poll.next), poll.delay_ms) {
                    error!("Coin: polling chain broken: {}", e);
                }
            }

            TaskKind::StatusBlink => {
                self.state.commands.status_on = self.effects.toggle_status();
                timers.set_interval(id, self.state.session.blink_period_ms);
            }

            TaskKind::Choreography => {
                self.state.commands.lit_channel = Some(self.effects.advance());
            }

            TaskKind::PumpWindow => {
                let was_pumping = self.state.session.pumping;
                self.dispatch(FsmEvent::PumpWindowElapsed);
                if was_pumping && !self.state.session.pumping {
                    self.sink.emit(&AppEvent::PumpStopped);
                }
            }

            TaskKind::SessionWindow => {
                self.dispatch(FsmEvent::SessionWindowElapsed);
            }

            TaskKind::DisplayRefresh => {
                *self.animation_frame = self.animation_frame.wrapping_add(1);
                let frame = DisplayFrame {
                    balance_cents: self.state.ledger.balance(),
                    counting: self.coin.is_counting(now),
                    animation_frame: *self.animation_frame,
                };
                self.display.present(&frame);
            }
        }

        for req in self.state.drain_timer_requests() {
            if let Err(e) = timers.after(req.kind, req.delay_ms) {
                error!("Timers: cannot schedule {:?}: {}", req.kind, e);
            }
        }
    }
}

impl<H, D, S: EventSink> Dispatch<'_, H, D, S> {
    fn dispatch(&mut self, event: FsmEvent) {
        if let Some((from, to)) = self.fsm.dispatch(event, self.state) {
            self.sink.emit(&AppEvent::StateChanged { from, to });
        }
    }
}
