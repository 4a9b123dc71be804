//! Unified error types for the cocktail frame firmware.
//!
//! Nothing in the control loop is expected to fail at runtime; these cover
//! setup (configuration, peripheral bring-up) and the scheduler's fixed
//! capacity.  All variants are `Copy`.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A timer task could not be registered.
    Scheduler(SchedulerError),
    /// Configuration is inconsistent.
    Config(&'static str),
    /// Peripheral initialisation failed.
    Init(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scheduler(e) => write!(f, "scheduler: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Scheduler errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerError {
    /// Every task slot is occupied.
    TableFull,
    /// A repeating task needs a non-zero interval.
    ZeroInterval,
    /// `Repeat::Times(0)` would never fire.
    ZeroRepeat,
}

impl fmt::Display for SchedulerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TableFull => write!(f, "task table full"),
            Self::ZeroInterval => write!(f, "repeating task with zero interval"),
            Self::ZeroRepeat => write!(f, "task with zero repeats"),
        }
    }
}

impl From<SchedulerError> for Error {
    fn from(e: SchedulerError) -> Self {
        Self::Scheduler(e)
    }
}

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
