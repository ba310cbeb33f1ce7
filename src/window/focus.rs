//! Bookkeeping of registered input targets and the selected one.

use ::tracing::debug;

use super::WindowAccessor;

/// Registered targets and the currently selected one.
///
/// The tracker only stores state. The transitions between selections, which
/// have to cancel the presses routed to the old selection, are driven by the
/// device manager.
#[derive(Default)]
pub struct FocusTracker {
    targets: Vec<WindowAccessor>,
    selected: Option<WindowAccessor>,
}

impl FocusTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, target: &WindowAccessor) -> bool {
        self.targets.contains(target)
    }

    /// Registers a target. Returns `false` if it is already registered.
    pub fn insert(&mut self, target: WindowAccessor) -> bool {
        if self.contains(&target) {
            return false;
        }
        debug!(wnd_name = %target.name(), "Registering target");
        self.targets.push(target);
        true
    }

    /// Unregisters a target. The selection is left alone.
    pub fn remove(&mut self, target: &WindowAccessor) -> bool {
        let Some(idx) = self.targets.iter().position(|t| t == target) else {
            return false;
        };
        debug!(wnd_name = %target.name(), "Unregistering target");
        self.targets.remove(idx);
        true
    }

    pub fn selected(&self) -> Option<&WindowAccessor> {
        self.selected.as_ref()
    }

    pub fn is_selected(&self, target: &WindowAccessor) -> bool {
        self.selected.as_ref() == Some(target)
    }

    /// Selects a registered target. Any previous selection must have been
    /// taken first.
    pub fn select(&mut self, target: WindowAccessor) {
        debug_assert!(self.selected.is_none());
        debug_assert!(self.contains(&target));
        debug!(wnd_name = %target.name(), "Selecting target");
        self.selected = Some(target);
    }

    /// Clears the selection, returning it.
    pub fn take_selected(&mut self) -> Option<WindowAccessor> {
        self.selected.take()
    }

    pub fn targets(&self) -> &[WindowAccessor] {
        &self.targets
    }
}
