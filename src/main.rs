//! Cocktail frame firmware: main entry point.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter    DisplayLink     LogEventSink   Clock       │
//! │  (Sensor+Actuator)  (DisplayPort)   (EventSink)                │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              FrameService (pure logic)                 │    │
//! │  │  Timers · FSM · Debouncer · Coin detector · Effects    │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The loop below only feeds the clock into [`FrameService::tick`]; every
//! bit of timing lives in the service's scheduler.
#![deny(unused_must_use)]

use anyhow::{Result, anyhow};
use esp_idf_svc::hal::delay::FreeRtos;
use esp_idf_svc::hal::gpio::{AnyIOPin, AnyOutputPin, Input, Output, PinDriver, Pull};
use esp_idf_svc::hal::peripherals::Peripherals;
use esp_idf_svc::hal::uart::{UartDriver, config::Config as UartConfig};
use esp_idf_svc::hal::units::Hertz;
use log::info;

use cocktailframe::adapters::display_link::DisplayLink;
use cocktailframe::adapters::hardware::HardwareAdapter;
use cocktailframe::adapters::log_sink::LogEventSink;
use cocktailframe::adapters::time::MonotonicClock;
use cocktailframe::app::service::FrameService;
use cocktailframe::config::{FrameConfig, LOOP_INTERVAL_MS};
use cocktailframe::pins;

type OutPin = PinDriver<'static, AnyOutputPin, Output>;
type InPin = PinDriver<'static, AnyIOPin, Input>;

// ── Pin helpers ───────────────────────────────────────────────
//
// SAFETY (all three): `Peripherals::take()` has succeeded and its `pins`
// field is never used, so each GPIO number in `pins.rs` is claimed by
// exactly one driver created here.

fn output(gpio: i32) -> Result<OutPin> {
    let pin = unsafe { AnyOutputPin::new(gpio) };
    Ok(PinDriver::output(pin)?)
}

/// Active-low relay, driven HIGH (released) before anything else runs.
fn relay(gpio: i32) -> Result<OutPin> {
    let mut drv = output(gpio)?;
    drv.set_high()?;
    Ok(drv)
}

fn input_pullup(gpio: i32) -> Result<InPin> {
    let pin = unsafe { AnyIOPin::new(gpio) };
    let mut drv = PinDriver::input(pin)?;
    drv.set_pull(Pull::Up)?;
    Ok(drv)
}

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Cocktailframe v{}                ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration ──────────────────────────────────────
    let config = FrameConfig::default();
    config.validate()?;
    info!(
        "Config: price={:?}c pulse={}c pump={}ms session={}ms",
        config.price_cents,
        config.coin_pulse_value_cents,
        config.pump_duration_ms,
        config.session_duration_ms
    );

    // ── 3. Peripherals ────────────────────────────────────────
    let peripherals = Peripherals::take()?;

    let pump = relay(pins::PUMP_RELAY_GPIO)?;
    let valve = relay(pins::VALVE_RELAY_GPIO)?;

    let channels = pins::EL_CHANNEL_GPIOS
        .iter()
        .map(|&gpio| output(gpio))
        .collect::<Result<Vec<_>>>()?;
    let channels: [OutPin; pins::EL_CHANNEL_GPIOS.len()] = channels
        .try_into()
        .map_err(|_| anyhow!("EL channel pin count mismatch"))?;

    let status_leds = [
        output(pins::BOARD_LED_GPIO)?,
        output(pins::EL_STATUS_LED_GPIO)?,
    ];

    let button = input_pullup(pins::BUTTON_GPIO)?;
    let coin = input_pullup(pins::COIN_PULSE_GPIO)?;

    let uart = UartDriver::new(
        peripherals.uart1,
        unsafe { AnyIOPin::new(pins::DISPLAY_UART_TX_GPIO) },
        unsafe { AnyIOPin::new(pins::DISPLAY_UART_RX_GPIO) },
        Option::<AnyIOPin>::None,
        Option::<AnyIOPin>::None,
        &UartConfig::default().baudrate(Hertz(pins::DISPLAY_UART_BAUD)),
    )?;

    // ── 4. Adapters ───────────────────────────────────────────
    let mut hw = HardwareAdapter::new(button, coin, pump, valve, channels, status_leds);
    let mut display = DisplayLink::new(uart);
    let mut log_sink = LogEventSink::new();
    let clock = MonotonicClock::new();

    // ── 5. Frame service ──────────────────────────────────────
    let mut service = FrameService::new(config);
    service.start(clock.now_ms(), &mut hw, &mut log_sink)?;

    info!("System ready. Entering control loop.");

    // ── 6. Control loop ───────────────────────────────────────
    loop {
        service.tick(clock.now_ms(), &mut hw, &mut display, &mut log_sink);
        FreeRtos::delay_ms(LOOP_INTERVAL_MS);
    }
}
