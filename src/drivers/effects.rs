//! Light effects: status-indicator oscillator and EL channel choreography.
//!
//! Both effects are driven by scheduler tasks; this engine only holds the
//! phase and computes the next output.  It never touches hardware.
//!
//! | Effect       | Task          | Output                               |
//! |--------------|---------------|--------------------------------------|
//! | Status blink | `StatusBlink` | toggles polarity every blink period  |
//! | Choreography | `Choreography`| exactly one of N channels lit        |
//!
//! The blink period itself lives in the dispensing session (it shortens
//! while a drink is being poured); the status task re-reads it on every
//! firing.

pub struct EffectsEngine {
    channel_count: u8,
    /// Next channel to light, always `< channel_count`.
    step: u8,
    status_on: bool,
}

impl EffectsEngine {
    pub fn new(channel_count: u8) -> Self {
        Self {
            channel_count: channel_count.max(1),
            step: 0,
            status_on: false,
        }
    }

    /// Flip the status indicator and return its new level.
    pub fn toggle_status(&mut self) -> bool {
        self.status_on = !self.status_on;
        self.status_on
    }

    pub fn status_on(&self) -> bool {
        self.status_on
    }

    /// Advance the rotating pattern by one step and return the index of
    /// the single channel that should be lit.
    pub fn advance(&mut self) -> u8 {
        let lit = self.step;
        self.step = (self.step + 1) % self.channel_count;
        lit
    }

    /// Channel that the next [`advance`](Self::advance) will light.
    pub fn step(&self) -> u8 {
        self.step
    }

    pub fn channel_count(&self) -> u8 {
        self.channel_count
    }
}
