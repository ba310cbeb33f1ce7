//! Input and state handling for pointer, scroll and touch events.

mod event;
mod pointer;
mod touch;

pub use event::*;
pub use pointer::*;
pub use touch::*;
