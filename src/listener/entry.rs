use ::std::cell::{Cell, RefCell};
use ::std::collections::HashSet;
use ::std::rc::Rc;

use super::{Filter, Listener, ListenerToken};
use crate::{
    device::DeviceId,
    event::Event,
    input::keyboard::HardwareKey,
};

/// A held input primitive of one device, as tracked by cancel marks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum CancelKey {
    Key(DeviceId, HardwareKey),
    Button(DeviceId, i32),
    Touch(DeviceId, u64),
    JoystickButton(DeviceId, usize),
    Hat(DeviceId, usize),
}

/// A listener registration.
pub(crate) struct ListenerEntry {
    token: ListenerToken,
    callback: Listener,
    filter: Filter,
    /// Stamp taken when the listener was added. Presses stamped before it
    /// are never routed to the listener.
    added_at: u64,
    /// Set when the registration is removed. Removed entries stay in the
    /// list until no dispatch is in progress.
    was_removed: Cell<bool>,
    /// Set while the cancellations of a removed registration are delivered.
    removing: Cell<bool>,
    /// Primitives the listener has already been sent a cancellation for
    /// during the current outermost cancellation pass.
    marks: RefCell<HashSet<CancelKey>>,
}

impl ListenerEntry {
    pub(crate) fn new(token: ListenerToken, filter: Filter, callback: Listener, added_at: u64) -> Self {
        Self {
            token,
            callback,
            filter,
            added_at,
            was_removed: Cell::new(false),
            removing: Cell::new(false),
            marks: RefCell::new(HashSet::new()),
        }
    }

    pub(crate) fn token(&self) -> &ListenerToken {
        &self.token
    }

    pub(crate) fn added_at(&self) -> u64 {
        self.added_at
    }

    pub(crate) fn has_callback(&self, callback: &Listener) -> bool {
        ::std::ptr::eq(
            Rc::as_ptr(&self.callback) as *const (),
            Rc::as_ptr(callback) as *const (),
        )
    }

    pub(crate) fn is_removed(&self) -> bool {
        self.was_removed.get()
    }

    pub(crate) fn set_removed(&self) {
        self.was_removed.set(true);
    }

    pub(crate) fn set_removing(&self, removing: bool) {
        self.removing.set(removing);
    }

    /// Whether events with the given press stamp are routed to the listener.
    pub(crate) fn is_eligible(&self, pressed_at: u64) -> bool {
        pressed_at >= self.added_at
    }

    /// Whether the listener is still reachable by dispatch.
    pub(crate) fn is_live(&self) -> bool {
        !self.was_removed.get() || self.removing.get()
    }

    /// Calls the listener if the event is routed to it. Returns `true` if the
    /// callback ran.
    pub(crate) fn deliver(&self, event: &Event, pressed_at: u64) -> bool {
        if !self.is_live() || !self.is_eligible(pressed_at) || !self.filter.accepts(event) {
            return false;
        }
        (self.callback)(event);
        true
    }

    pub(crate) fn is_marked(&self, key: CancelKey) -> bool {
        self.marks.borrow().contains(&key)
    }

    /// Marks a primitive as cancelled for this listener. Returns `false` if
    /// it already was.
    pub(crate) fn mark(&self, key: CancelKey) -> bool {
        self.marks.borrow_mut().insert(key)
    }

    pub(crate) fn reset_marks(&self) {
        self.marks.borrow_mut().clear();
    }
}
