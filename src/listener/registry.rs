use ::std::cell::{Cell, RefCell};
use ::std::rc::Rc;
use ::tracing::debug;

use super::{Filter, Listener, ListenerEntry, ListenerToken};
use crate::{event::Event, stamp};

pub(crate) type ListenerList = Rc<Vec<Rc<ListenerEntry>>>;

/// The listeners of a device manager, in registration order.
///
/// Dispatch iterates a snapshot of the list, so listeners may add and remove
/// listeners from within their callbacks. Removed entries are only dropped
/// from the list once no dispatch is running.
#[derive(Default)]
pub(crate) struct ListenerRegistry {
    entries: RefCell<ListenerList>,
    /// Number of dispatch loops currently running.
    recursing: Cell<usize>,
    next_token: Cell<u64>,
}

/// Keeps the dispatch depth raised while alive.
pub(crate) struct DispatchGuard<'a> {
    registry: &'a ListenerRegistry,
}

impl Drop for DispatchGuard<'_> {
    fn drop(&mut self) {
        let depth = self.registry.recursing.get() - 1;
        self.registry.recursing.set(depth);
        if depth == 0 {
            self.registry.collect();
        }
    }
}

impl ListenerRegistry {
    /// Registers a listener. Returns `None` if the callback is registered
    /// already.
    pub(crate) fn add(&self, filter: Filter, callback: Listener) -> Option<Rc<ListenerEntry>> {
        let duplicate = self
            .entries
            .borrow()
            .iter()
            .any(|e| !e.is_removed() && e.has_callback(&callback));
        if duplicate {
            debug!("Listener already registered");
            return None;
        }

        let token = ListenerToken(self.next_token.get());
        self.next_token.set(token.0 + 1);
        let entry = Rc::new(ListenerEntry::new(token, filter, callback, stamp::unique()));
        debug!(token = %entry.token(), added_at = entry.added_at(), "Adding listener");
        Rc::make_mut(&mut self.entries.borrow_mut()).push(entry.clone());
        Some(entry)
    }

    /// Looks up a registration which has not been removed.
    pub(crate) fn find(&self, token: &ListenerToken) -> Option<Rc<ListenerEntry>> {
        self.entries
            .borrow()
            .iter()
            .find(|e| e.token() == token && !e.is_removed())
            .cloned()
    }

    pub(crate) fn snapshot(&self) -> ListenerList {
        self.entries.borrow().clone()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.borrow().iter().all(|e| e.is_removed())
    }

    /// Raises the dispatch depth until the guard is dropped.
    pub(crate) fn enter(&self) -> DispatchGuard<'_> {
        self.recursing.set(self.recursing.get() + 1);
        DispatchGuard { registry: self }
    }

    /// Delivers `event` to every listener it is routed to, in registration
    /// order. `keep_going` is checked before each listener, allowing the
    /// caller to stop when a callback invalidates the event.
    pub(crate) fn dispatch(&self, event: &Event, pressed_at: u64, keep_going: impl Fn() -> bool) {
        let _guard = self.enter();
        for entry in self.snapshot().iter() {
            if !keep_going() {
                break;
            }
            entry.deliver(event, pressed_at);
        }
    }

    /// Drops removed entries, unless a dispatch is running.
    pub(crate) fn collect(&self) {
        if self.recursing.get() > 0 {
            return;
        }
        let mut entries = self.entries.borrow_mut();
        if entries.iter().any(|e| e.is_removed()) {
            Rc::make_mut(&mut entries).retain(|e| !e.is_removed());
        }
    }
}
