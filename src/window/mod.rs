//! Input targets: host windows, the accessors naming them and the focus
//! bookkeeping which decides which one receives input.

mod accessor;
mod focus;
mod wnd;

pub use accessor::*;
pub use focus::*;
pub use wnd::*;
