//! Input and state handling for joystick buttons, hats and axes.

mod event;
mod hat;
mod joystick;
mod layout;

pub use event::*;
pub use hat::*;
pub use joystick::*;
pub use layout::*;
