//! Host windows which can receive routed input.

use ::std::cell::Cell;
use ::std::rc::Rc;
use ::tracing::debug;

/// A top-level window of the host toolkit, as seen by a device manager.
///
/// A window is selected as the input target while it is active. The host
/// reports focus changes to the manager explicitly; the two queries are only
/// used to validate a target when it is registered and to detect windows
/// which were destroyed without being unregistered.
pub trait TargetWindow {
    /// Whether the window currently has the keyboard focus.
    fn is_active(&self) -> bool;

    /// Whether the window has been destroyed. A deleted window is never
    /// selected.
    fn is_deleted(&self) -> bool;

    /// A human readable name, used in logs.
    fn name(&self) -> &str {
        ""
    }
}

/// A minimal [`TargetWindow`] whose state is driven by the host.
///
/// Useful for hosts which keep the focus state of their windows elsewhere, and
/// for tests.
///
/// ```
/// use ::inroute::window::{Accessor, HostWindow, TargetWindow};
///
/// let wnd = HostWindow::new("Main");
/// let accessor = Accessor::window(wnd.clone());
///
/// wnd.set_active(true);
/// assert!(wnd.is_active());
/// assert!(accessor.is_window());
/// ```
#[derive(Debug)]
pub struct HostWindow {
    name: String,
    active: Cell<bool>,
    deleted: Cell<bool>,
}

impl HostWindow {
    /// Creates an inactive window.
    pub fn new(name: impl AsRef<str>) -> Rc<Self> {
        debug!(wnd_name = %name.as_ref(), "Creating host window");
        Rc::new(Self {
            name: name.as_ref().to_owned(),
            active: Cell::new(false),
            deleted: Cell::new(false),
        })
    }

    pub fn set_active(&self, active: bool) {
        self.active.set(active);
    }

    /// Flags the window as destroyed. It is also no longer active.
    pub fn mark_deleted(&self) {
        debug!(wnd_name = %self.name, "Deleting host window");
        self.active.set(false);
        self.deleted.set(true);
    }
}

impl TargetWindow for HostWindow {
    fn is_active(&self) -> bool {
        self.active.get() && !self.deleted.get()
    }

    fn is_deleted(&self) -> bool {
        self.deleted.get()
    }

    fn name(&self) -> &str {
        &self.name
    }
}
