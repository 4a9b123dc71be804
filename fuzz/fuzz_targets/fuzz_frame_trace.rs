//! Fuzz target: `FrameService::tick`
//!
//! Interprets the input as a trace of (button level, coin level, time step)
//! triples and drives the frame service through it, asserting that the
//! pump never runs with the valve closed and that at most one channel is
//! ever lit.
//!
//! cargo fuzz run fuzz_frame_trace

#![no_main]

use cocktailframe::app::events::{AppEvent, DisplayFrame};
use cocktailframe::app::ports::{ActuatorPort, DisplayPort, EventSink, SensorPort};
use cocktailframe::app::service::FrameService;
use cocktailframe::config::FrameConfig;
use libfuzzer_sys::fuzz_target;

#[derive(Default)]
struct Outputs {
    button_high: bool,
    coin_low: bool,
    valve: bool,
    pump: bool,
    channels: [bool; 8],
}

impl SensorPort for Outputs {
    fn read_button(&mut self) -> bool {
        self.button_high
    }
    fn read_coin_pulse(&mut self) -> bool {
        self.coin_low
    }
}

impl ActuatorPort for Outputs {
    fn set_dispensing(&mut self, active: bool) {
        self.valve = active;
        assert!(!(self.pump && !self.valve), "pump running with valve closed");
    }
    fn set_pumping(&mut self, active: bool) {
        self.pump = active;
        assert!(!(self.pump && !self.valve), "pump running with valve closed");
    }
    fn set_all_channels(&mut self, active: bool) {
        self.channels = [active; 8];
    }
    fn set_channel(&mut self, index: u8, active: bool) {
        self.channels[usize::from(index)] = active;
    }
    fn set_status(&mut self, _: bool) {}
}

struct Null;

impl DisplayPort for Null {
    fn present(&mut self, _: &DisplayFrame) {}
}

impl EventSink for Null {
    fn emit(&mut self, _: &AppEvent) {}
}

fuzz_target!(|data: &[u8]| {
    let Some((&seed, trace)) = data.split_first() else {
        return;
    };
    let cfg = FrameConfig {
        price_cents: if seed & 1 == 0 { None } else { Some(u32::from(seed >> 1).max(1) * 10) },
        ..Default::default()
    };

    // Start close to the wrap so long traces cross it.
    let mut now = u32::MAX - 10_000;
    let mut out = Outputs { button_high: true, ..Default::default() };
    let mut svc = FrameService::new(cfg);
    svc.start(now, &mut out, &mut Null).unwrap();

    for chunk in trace.chunks_exact(2) {
        out.button_high = chunk[0] & 1 != 0;
        out.coin_low = chunk[0] & 2 != 0;
        let step = u32::from(chunk[1]) + 1;
        now = now.wrapping_add(step);
        svc.tick(now, &mut out, &mut Null, &mut Null);

        assert!(!svc.is_pumping() || svc.is_dispensing());
        assert!(out.channels.iter().filter(|&&on| on).count() <= 1);
    }
});
