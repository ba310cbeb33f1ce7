//! Input and state handling for keyboard events.

mod event;
mod keyboard;

pub use event::*;
pub use keyboard::*;
