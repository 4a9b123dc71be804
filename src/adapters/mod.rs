//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter        | Implements         | Connects to                  |
//! |----------------|--------------------|------------------------------|
//! | `hardware`     | SensorPort         | button + coin GPIO inputs    |
//! |                | ActuatorPort       | relays, EL channels, LEDs    |
//! | `display_link` | DisplayPort        | UART to the display board    |
//! | `log_sink`     | EventSink          | Serial log output            |
//! | `time`         | (clock)            | ESP32 system timer           |

pub mod display_link;
pub mod hardware;
pub mod log_sink;
pub mod time;
