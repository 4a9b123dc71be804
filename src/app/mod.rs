//! Application core: pure domain logic, zero I/O.
//!
//! The [`FrameService`](service::FrameService) owns the scheduler, the
//! dispensing state machine and the shared control state.  All interaction
//! with hardware happens through the **port traits** in [`ports`], keeping
//! this layer fully testable without real peripherals.

pub mod events;
pub mod ports;
pub mod service;
pub mod tasks;
