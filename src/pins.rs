//! GPIO assignments for the cocktail frame controller board.
//!
//! Single source of truth: `main` takes these pins from the peripheral
//! set and hands them to the hardware adapter.  The EL sequencer hat sits on
//! eight consecutive outputs (channels A..H).

// ---------------------------------------------------------------------------
// EL sequencer
// ---------------------------------------------------------------------------

/// Channel A..H outputs, in choreography order.
pub const EL_CHANNEL_GPIOS: [i32; 8] = [2, 3, 4, 5, 6, 7, 8, 9];
/// Status LED on the EL sequencer board.
pub const EL_STATUS_LED_GPIO: i32 = 10;

// ---------------------------------------------------------------------------
// Dispensing relays (active-low relay board)
// ---------------------------------------------------------------------------

pub const PUMP_RELAY_GPIO: i32 = 11;
pub const VALVE_RELAY_GPIO: i32 = 14;

// ---------------------------------------------------------------------------
// Inputs (internal pull-ups)
// ---------------------------------------------------------------------------

/// Illuminated push-button to GND.  LOW = pressed.
pub const BUTTON_GPIO: i32 = 12;
/// Coin acceptor pulse output (open collector).  LOW = pulse.
pub const COIN_PULSE_GPIO: i32 = 15;

// ---------------------------------------------------------------------------
// Board status LED
// ---------------------------------------------------------------------------

pub const BOARD_LED_GPIO: i32 = 13;

// ---------------------------------------------------------------------------
// Display link (UART1)
// ---------------------------------------------------------------------------

pub const DISPLAY_UART_TX_GPIO: i32 = 17;
pub const DISPLAY_UART_RX_GPIO: i32 = 18;
pub const DISPLAY_UART_BAUD: u32 = 115_200;
