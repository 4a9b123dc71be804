//! Input filters and output effects.  Pure state, no pin access.

pub mod button;
pub mod effects;
