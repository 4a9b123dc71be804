//! Mock hardware adapter for integration tests.
//!
//! Records every actuator call (with the time it happened) so tests can
//! assert on the full command history without touching real GPIO, and
//! serves scripted input levels for the button and coin lines.

use cocktailframe::app::events::{AppEvent, DisplayFrame};
use cocktailframe::app::ports::{ActuatorPort, DisplayPort, EventSink, SensorPort};
use cocktailframe::app::service::FrameService;
use cocktailframe::config::FrameConfig;

pub const CHANNELS: usize = 8;

// ── Actuator call record ──────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorCall {
    Dispensing(bool),
    Pumping(bool),
    AllChannels(bool),
    Channel(u8, bool),
    Status(bool),
}

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    /// Raw button level served to the service (`true` = released).
    pub button_high: bool,
    /// Coin line asserted.
    pub coin_low: bool,
    /// Time stamped onto recorded calls.
    pub now: u32,
    pub calls: Vec<(u32, ActuatorCall)>,

    pub valve: bool,
    pub pump: bool,
    pub status: bool,
    pub channels: [bool; CHANNELS],
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self {
            button_high: true,
            coin_low: false,
            now: 0,
            calls: Vec::new(),
            valve: true,
            pump: true,
            status: true,
            channels: [true; CHANNELS],
        }
    }

    /// Times at which `call` was issued.
    pub fn times_of(&self, call: ActuatorCall) -> Vec<u32> {
        self.calls
            .iter()
            .filter(|(_, c)| *c == call)
            .map(|(t, _)| *t)
            .collect()
    }

    pub fn lit_channels(&self) -> usize {
        self.channels.iter().filter(|&&on| on).count()
    }

    fn record(&mut self, call: ActuatorCall) {
        self.calls.push((self.now, call));
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorPort for MockHardware {
    fn read_button(&mut self) -> bool {
        self.button_high
    }

    fn read_coin_pulse(&mut self) -> bool {
        self.coin_low
    }
}

impl ActuatorPort for MockHardware {
    fn set_dispensing(&mut self, active: bool) {
        self.valve = active;
        self.record(ActuatorCall::Dispensing(active));
    }

    fn set_pumping(&mut self, active: bool) {
        self.pump = active;
        self.record(ActuatorCall::Pumping(active));
    }

    fn set_all_channels(&mut self, active: bool) {
        self.channels = [active; CHANNELS];
        self.record(ActuatorCall::AllChannels(active));
    }

    fn set_channel(&mut self, index: u8, active: bool) {
        self.channels[usize::from(index)] = active;
        self.record(ActuatorCall::Channel(index, active));
    }

    fn set_status(&mut self, on: bool) {
        self.status = on;
        self.record(ActuatorCall::Status(on));
    }
}

// ── MockDisplay ───────────────────────────────────────────────

#[derive(Default)]
pub struct MockDisplay {
    pub frames: Vec<(u32, DisplayFrame)>,
    pub now: u32,
}

impl DisplayPort for MockDisplay {
    fn present(&mut self, frame: &DisplayFrame) {
        self.frames.push((self.now, *frame));
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(*event);
    }
}

// ── Bench: a started service plus its mocks ───────────────────

pub struct Bench {
    pub svc: FrameService,
    pub hw: MockHardware,
    pub display: MockDisplay,
    pub sink: RecordingSink,
    pub now: u32,
}

#[allow(dead_code)]
impl Bench {
    pub fn new(config: FrameConfig) -> Self {
        Self::starting_at(config, 0)
    }

    pub fn starting_at(config: FrameConfig, now: u32) -> Self {
        let mut bench = Self {
            svc: FrameService::new(config),
            hw: MockHardware::new(),
            display: MockDisplay::default(),
            sink: RecordingSink::default(),
            now,
        };
        bench.hw.now = now;
        bench
            .svc
            .start(now, &mut bench.hw, &mut bench.sink)
            .expect("start");
        bench
    }

    /// Tick once at `now + step`.
    pub fn step(&mut self, step_ms: u32) {
        self.now = self.now.wrapping_add(step_ms);
        self.hw.now = self.now;
        self.display.now = self.now;
        self.svc
            .tick(self.now, &mut self.hw, &mut self.display, &mut self.sink);
    }

    /// Advance `ms` with one tick per millisecond.
    pub fn advance(&mut self, ms: u32) {
        for _ in 0..ms {
            self.step(1);
        }
    }

    /// Advance `ms` with coarse ticks of `step_ms`.
    pub fn advance_coarse(&mut self, ms: u32, step_ms: u32) {
        let mut elapsed = 0;
        while elapsed < ms {
            self.step(step_ms);
            elapsed += step_ms;
        }
    }

    /// Hold the button for 150 ms, release it and wait until the release
    /// edge has been sampled.  Returns the time the line went HIGH.
    pub fn press_and_release(&mut self) -> u32 {
        self.hw.button_high = false;
        self.advance(150);
        self.hw.button_high = true;
        let released_at = self.now;
        self.advance(20);
        released_at
    }

    /// Feed `n` well-formed acceptor pulses (40 ms LOW, 60 ms HIGH).
    pub fn insert_pulses(&mut self, n: u32) {
        for _ in 0..n {
            self.hw.coin_low = true;
            self.advance(40);
            self.hw.coin_low = false;
            self.advance(60);
        }
    }
}
