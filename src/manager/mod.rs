//! The device manager: routes raw input of its devices to the selected
//! target's listeners.

mod builder;
mod cancel;
mod input;
#[cfg(test)]
mod tests;

pub use builder::Builder;

use ::std::{
    cell::{Cell, RefCell, UnsafeCell},
    marker::PhantomData,
    rc::{Rc, Weak},
};
use ::strum::EnumCount;
use ::tracing::{debug, trace, warn};

use crate::{
    config::RepeatPolicy,
    device::{Device, DeviceDescriptor, DeviceId, DeviceInfo, Registry},
    event::{CapabilityClass, DeviceMgmtType, Event, EventClass, EventKind},
    input::{
        joystick::{HatValue, JoystickAxis, JoystickButton},
        keyboard::HardwareKey,
    },
    listener::{Filter, Listener, ListenerRegistry, ListenerToken},
    stamp,
    window::{Accessor, FocusTracker, WindowAccessor},
};

/// Shared state of a device manager.
pub(crate) struct ManagerInner {
    /// Force !Send & !Sync: listeners are called on the thread which feeds
    /// the manager its input.
    phantom: PhantomData<UnsafeCell<()>>,
    repeat_policy: RepeatPolicy,
    enabled: Cell<[bool; EventClass::COUNT]>,
    /// Stamp taken when hat events were enabled: `0` if enabled from the
    /// start, [`stamp::UNSET`] while disabled.
    hat_enabled_at: Cell<u64>,
    devices: RefCell<Registry>,
    focus: RefCell<FocusTracker>,
    listeners: ListenerRegistry,
    /// Nesting depth of cancellation passes.
    cancel_depth: Cell<usize>,
}

/// Routes the input of a set of devices to the listeners of the currently
/// selected target window.
///
/// At most one registered target is selected at a time: the active one.
/// Every press, touch sequence and off-center hat routed to a target is
/// matched by a release (real or synthesized) before the selection changes,
/// and a listener only ever sees the releases of presses it has seen.
///
/// A manager is `!Send + !Sync`. Cloning yields another handle to the same
/// manager; listeners which need to call back into the manager should
/// capture a [`WeakDeviceManager`] to avoid reference cycles.
///
/// # Example
///
/// ```
/// use ::inroute::{
///     device::DeviceDescriptor,
///     event::Event,
///     input::keyboard::KeySample,
///     listener::Filter,
///     manager::Builder,
///     window::{Accessor, HostWindow},
/// };
/// use ::std::rc::Rc;
///
/// let manager = Builder::new().build().expect("Invalid configuration");
/// let keyboard = manager.add_device(DeviceDescriptor::new("Keyboard").with_keys());
///
/// let wnd = HostWindow::new("Main");
/// wnd.set_active(true);
/// let target = Accessor::window(wnd.clone());
/// assert!(manager.add_target(&target));
///
/// let token = manager
///     .add_listener(Filter::All, Rc::new(|ev: &Event| println!("{:?}", ev.kind)))
///     .expect("Listener registered twice");
///
/// manager.key_input(&target, keyboard, 28, KeySample::Press);
/// assert!(manager.remove_listener(&token, true));
/// ```
#[derive(Clone)]
pub struct DeviceManager {
    inner: Rc<ManagerInner>,
}

/// A non-owning handle to a [`DeviceManager`].
#[derive(Clone)]
pub struct WeakDeviceManager {
    inner: Weak<ManagerInner>,
}

impl WeakDeviceManager {
    pub fn upgrade(&self) -> Option<DeviceManager> {
        self.inner.upgrade().map(|inner| DeviceManager { inner })
    }
}

impl DeviceManager {
    pub(crate) fn new(
        repeat_policy: RepeatPolicy,
        enabled: [bool; EventClass::COUNT],
    ) -> Self {
        let hat_enabled_at = if enabled[EventClass::JoystickHat.index()] {
            0
        } else {
            stamp::UNSET
        };
        debug!(?repeat_policy, ?enabled, "Creating device manager");

        Self {
            inner: Rc::new(ManagerInner {
                phantom: Default::default(),
                repeat_policy,
                enabled: Cell::new(enabled),
                hat_enabled_at: Cell::new(hat_enabled_at),
                devices: Default::default(),
                focus: Default::default(),
                listeners: Default::default(),
                cancel_depth: Cell::new(0),
            }),
        }
    }

    pub fn downgrade(&self) -> WeakDeviceManager {
        WeakDeviceManager {
            inner: Rc::downgrade(&self.inner),
        }
    }

    pub fn repeat_policy(&self) -> RepeatPolicy {
        self.inner.repeat_policy
    }

    pub fn is_event_class_enabled(&self, class: EventClass) -> bool {
        self.inner.is_enabled(class)
    }

    /// Enables an event class. Classes can't be disabled again.
    ///
    /// Hats keep being tracked while hat events are disabled; a hat which is
    /// off center when hat events get enabled produces no events until it
    /// returns to center.
    pub fn enable_event_class(&self, class: EventClass) {
        if self.inner.is_enabled(class) {
            return;
        }
        debug!(%class, "Enabling event class");
        let mut enabled = self.inner.enabled.get();
        enabled[class.index()] = true;
        self.inner.enabled.set(enabled);
        if class == EventClass::JoystickHat {
            self.inner.hat_enabled_at.set(stamp::unique());
        }
    }

    // Targets

    /// Registers a target. An active target is selected right away,
    /// deselecting the previous selection.
    ///
    /// Returns `false` for foreign accessors, deleted windows and targets
    /// which are already registered.
    pub fn add_target(&self, accessor: &Accessor) -> bool {
        let Some(wnd) = accessor.as_window() else {
            debug!(?accessor, "Rejecting foreign target");
            return false;
        };
        let inner = &self.inner;
        inner.reap_deleted_selection();

        if wnd.is_deleted() {
            debug!(wnd_name = %wnd.name(), "Rejecting deleted target");
            if inner.focus.borrow().contains(wnd) {
                inner.remove_window(wnd);
            }
            return false;
        }
        if !inner.focus.borrow_mut().insert(wnd.clone()) {
            return false;
        }

        if wnd.is_active() {
            inner.activate(wnd);
        }
        true
    }

    /// Unregisters a target, deselecting it if selected. Returns `false` if
    /// it was not registered.
    pub fn remove_target(&self, accessor: &Accessor) -> bool {
        match accessor.as_window() {
            Some(wnd) => self.inner.remove_window(wnd),
            None => false,
        }
    }

    pub fn has_target(&self, accessor: &Accessor) -> bool {
        accessor
            .as_window()
            .map_or(false, |wnd| self.inner.focus.borrow().contains(wnd))
    }

    pub fn selected_target(&self) -> Option<Accessor> {
        self.inner.selected().map(Accessor::Window)
    }

    /// Reports a focus change of a registered target.
    pub fn focus_changed(&self, accessor: &Accessor, active: bool) {
        let Some(wnd) = accessor.as_window() else {
            return;
        };
        let inner = &self.inner;
        inner.reap_deleted_selection();
        if !inner.focus.borrow().contains(wnd) {
            trace!(wnd_name = %wnd.name(), "Focus change of unknown target");
            return;
        }

        if wnd.is_deleted() {
            inner.remove_window(wnd);
        } else if active {
            inner.activate(wnd);
        } else if inner.focus.borrow().is_selected(wnd) {
            inner.deselect();
        }
    }

    // Listeners

    /// Registers a listener. Returns `None` if the same callback is already
    /// registered.
    ///
    /// The listener receives no events belonging to presses which started
    /// before it was added.
    pub fn add_listener(&self, filter: Filter, callback: Listener) -> Option<ListenerToken> {
        let inner = &self.inner;
        let entry = inner.listeners.add(filter, callback)?;
        if inner.selected().is_some() {
            inner.cancel_for_listener_join(&entry);
        }
        Some(entry.token().clone())
    }

    /// Removes a listener. If `notify_pending` is set, the listener first
    /// receives the cancellations of everything it has seen pressed.
    ///
    /// Returns `false` if the token does not name a registered listener.
    pub fn remove_listener(&self, token: &ListenerToken, notify_pending: bool) -> bool {
        let inner = &self.inner;
        let Some(entry) = inner.listeners.find(token) else {
            return false;
        };
        debug!(%token, notify_pending, "Removing listener");
        entry.set_removed();
        if notify_pending {
            entry.set_removing(true);
            inner.finalize_listener(&entry);
            entry.set_removing(false);
        }
        inner.listeners.collect();
        true
    }

    // Devices

    /// Adds a device, announcing it to the listeners.
    pub fn add_device(&self, descriptor: DeviceDescriptor) -> DeviceId {
        let id = DeviceId::next();
        let device = Device::new(id, descriptor);
        let info = device.info().clone();
        debug!(device = %id, name = %info.name(), "Adding device");
        self.inner.devices.borrow_mut().insert(device);

        self.inner.notify_device(id, DeviceMgmtType::Added, info);
        id
    }

    /// Removes a device. Whatever is held on the device is cancelled first.
    pub fn remove_device(&self, id: DeviceId) -> bool {
        let inner = &self.inner;
        if inner.devices.borrow().get(id).is_none() {
            return false;
        }
        inner.cancel_for_device_removal(id);

        let Some(device) = inner.devices.borrow_mut().remove(id) else {
            return false;
        };
        debug!(device = %id, name = %device.info().name(), "Removing device");
        inner.notify_device(id, DeviceMgmtType::Removed, device.info().clone());
        true
    }

    /// Announces a change to a device's properties.
    pub fn device_changed(&self, id: DeviceId) -> bool {
        let Some(info) = self.get_device(id) else {
            return false;
        };
        self.inner.notify_device(id, DeviceMgmtType::Changed, info);
        true
    }

    /// The devices, in the order they were added.
    pub fn list_devices(&self) -> Vec<DeviceId> {
        self.inner.devices.borrow().ids()
    }

    pub fn get_device(&self, id: DeviceId) -> Option<Rc<DeviceInfo>> {
        self.inner.devices.borrow().get(id).map(|d| d.info().clone())
    }

    pub fn devices_with_capability(&self, capability: CapabilityClass) -> Vec<DeviceId> {
        self.inner.devices.borrow().with_capability(capability)
    }

    pub(crate) fn find_device_by_path(&self, path: &::std::path::Path) -> Option<DeviceId> {
        self.inner.devices.borrow().find_by_path(path)
    }

    // Press state

    pub fn is_key_pressed(&self, device: DeviceId, key: HardwareKey) -> bool {
        self.inner
            .with_device(device, |d| d.keys.as_ref().map_or(false, |k| k.is_pressed(key)))
            .unwrap_or(false)
    }

    /// Whether any pointer button of the device is held.
    pub fn any_pressed(&self, device: DeviceId) -> bool {
        self.inner
            .with_device(device, |d| d.pointer.as_ref().map_or(false, |p| p.any_pressed()))
            .unwrap_or(false)
    }

    pub fn is_joystick_button_pressed(&self, device: DeviceId, button: JoystickButton) -> bool {
        self.inner
            .with_device(device, |d| {
                d.joystick
                    .as_ref()
                    .map_or(false, |j| j.is_button_pressed(button))
            })
            .unwrap_or(false)
    }

    pub fn hat_value(&self, device: DeviceId, hat: usize) -> HatValue {
        self.inner
            .with_device(device, |d| d.joystick.as_ref().map(|j| j.hat_value(hat)))
            .flatten()
            .unwrap_or(HatValue::NotSet)
    }

    pub fn axis_value(&self, device: DeviceId, axis: JoystickAxis) -> i32 {
        self.inner
            .with_device(device, |d| d.joystick.as_ref().map(|j| j.axis_value(axis)))
            .flatten()
            .unwrap_or(0)
    }
}

impl ManagerInner {
    fn is_enabled(&self, class: EventClass) -> bool {
        self.enabled.get()[class.index()]
    }

    fn selected(&self) -> Option<WindowAccessor> {
        self.focus.borrow().selected().cloned()
    }

    fn is_selected(&self, wnd: &WindowAccessor) -> bool {
        self.focus.borrow().is_selected(wnd)
    }

    /// Runs `f` on a device. No borrow is kept when `f` returns.
    fn with_device<R>(&self, id: DeviceId, f: impl FnOnce(&mut Device) -> R) -> Option<R> {
        self.devices.borrow_mut().get_mut(id).map(f)
    }

    /// Delivers a newly built event to the listeners.
    fn dispatch(
        &self,
        accessor: Option<&WindowAccessor>,
        device: DeviceId,
        pressed_at: u64,
        kind: EventKind,
        keep_going: impl Fn() -> bool,
    ) {
        let event = Event::new(accessor.cloned().map(Accessor::Window), device, kind);
        self.listeners.dispatch(&event, pressed_at, keep_going);
    }

    fn notify_device(&self, id: DeviceId, input: DeviceMgmtType, device: Rc<DeviceInfo>) {
        if !self.is_enabled(EventClass::DeviceMgmt) {
            return;
        }
        self.dispatch(
            None,
            id,
            stamp::UNSET,
            EventKind::DeviceMgmt { input, device },
            || true,
        );
    }

    /// Selects a registered, active target, deselecting the current
    /// selection first.
    fn activate(&self, wnd: &WindowAccessor) {
        if self.is_selected(wnd) {
            warn!(wnd_name = %wnd.name(), "Target activated twice");
            return;
        }
        if let Some(selected) = self.selected() {
            if selected.is_deleted() {
                self.remove_window(&selected);
            } else {
                debug!(
                    wnd_name = %wnd.name(),
                    prev_name = %selected.name(),
                    "Target activated while another one is selected"
                );
                self.deselect();
            }
        }

        let mut focus = self.focus.borrow_mut();
        if focus.selected().is_none() && focus.contains(wnd) {
            focus.select(wnd.clone());
        }
    }

    /// Cancels everything routed to the selected target, then clears the
    /// selection.
    fn deselect(&self) {
        let Some(selected) = self.selected() else {
            return;
        };
        debug!(wnd_name = %selected.name(), "Deselecting target");
        self.cancel_all_for_target(&selected);

        let mut focus = self.focus.borrow_mut();
        if focus.is_selected(&selected) {
            focus.take_selected();
        }
    }

    fn remove_window(&self, wnd: &WindowAccessor) -> bool {
        if !self.focus.borrow_mut().remove(wnd) {
            return false;
        }
        if self.is_selected(wnd) {
            self.deselect();
        }
        true
    }

    /// Drops a selected target which was destroyed without being
    /// unregistered.
    fn reap_deleted_selection(&self) {
        if let Some(selected) = self.selected().filter(WindowAccessor::is_deleted) {
            warn!(wnd_name = %selected.name(), "Selected target was deleted");
            self.remove_window(&selected);
        }
    }
}
