//! Listener registration and event dispatch.

mod entry;
mod filter;
mod registry;

pub use filter::Filter;

pub(crate) use entry::{CancelKey, ListenerEntry};
pub(crate) use registry::{ListenerList, ListenerRegistry};

use ::std::fmt::{self, Display};
use ::std::rc::Rc;

use crate::event::Event;

/// A listener callback. Callbacks must not panic.
pub type Listener = Rc<dyn Fn(&Event)>;

/// Handle of a listener registration, used to remove it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ListenerToken(u64);

impl Display for ListenerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}", self.0)
    }
}
