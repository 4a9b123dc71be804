//! Sensor subsystem.
//!
//! The frame has a single real sensor, the coin acceptor's pulse line.

pub mod coin;
