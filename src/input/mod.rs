//! Per-device press state.

pub mod joystick;
pub mod keyboard;
pub mod pointer;
