//! Synthesized cancellation of held input.
//!
//! Whenever input held on the selected target can no longer be followed to
//! its real release (the target loses the selection, a device goes away, a
//! listener leaves) every listener which saw the press is sent a
//! cancellation instead. Cancellation passes can nest: a listener may change
//! the focus or remove a device from within a cancel callback. Each listener
//! is marked for each primitive it was sent a cancellation for, and the
//! marks are only reset once the outermost pass is over, so nested passes
//! never send a listener the same cancellation twice.

use ::std::rc::Rc;
use ::tracing::trace;

use super::ManagerInner;
use crate::{
    device::DeviceId,
    event::{Event, EventClass, EventKind},
    input::{
        joystick::{ButtonInputType, HatValue, JoystickButton},
        keyboard::{HardwareKey, KeyInputType},
        pointer::{PointerInputType, TouchInputType, TouchRecord},
    },
    listener::{CancelKey, ListenerEntry, ListenerList},
    window::{Accessor, WindowAccessor},
};

/// A cancellation pass in progress. Resets all cancel marks when the
/// outermost pass ends.
pub(crate) struct CancelScope<'a> {
    inner: &'a ManagerInner,
}

impl Drop for CancelScope<'_> {
    fn drop(&mut self) {
        let depth = self.inner.cancel_depth.get() - 1;
        self.inner.cancel_depth.set(depth);
        if depth == 0 {
            for entry in self.inner.listeners.snapshot().iter() {
                entry.reset_marks();
            }
        }
    }
}

/// The open primitives of one device, copied out of the registry so that no
/// borrow is held while listeners run.
#[derive(Default)]
struct OpenRecords {
    keys: Vec<(HardwareKey, u64)>,
    buttons: Vec<i32>,
    any_pressed_at: u64,
    position: (f64, f64),
    touches: Vec<(u64, TouchRecord)>,
    joystick_buttons: Vec<(usize, JoystickButton, u64)>,
    hats: Vec<(usize, HatValue, u64)>,
}

impl ManagerInner {
    pub(crate) fn cancel_scope(&self) -> CancelScope<'_> {
        self.cancel_depth.set(self.cancel_depth.get() + 1);
        CancelScope { inner: self }
    }

    /// Copies the open primitives of the enabled classes of a device.
    ///
    /// Hats which left center before hat events were enabled are left out:
    /// no listener saw them move.
    fn open_records(&self, id: DeviceId) -> Option<OpenRecords> {
        let enabled = |class| self.is_enabled(class);
        let hat_enabled_at = self.hat_enabled_at.get();
        self.with_device(id, |device| {
            let mut open = OpenRecords::default();
            if let Some(keys) = device.keys.as_ref().filter(|_| enabled(EventClass::Key)) {
                open.keys = keys.snapshot();
            }
            if let Some(pointer) = device.pointer.as_ref().filter(|_| enabled(EventClass::Pointer)) {
                open.buttons = pointer.snapshot();
                open.any_pressed_at = pointer.any_pressed_at();
                open.position = pointer.position();
            }
            if let Some(touch) = device.touch.as_ref().filter(|_| enabled(EventClass::Touch)) {
                open.touches = touch.snapshot();
            }
            if let Some(joystick) = device.joystick.as_ref() {
                if enabled(EventClass::JoystickButton) {
                    open.joystick_buttons = joystick.pressed_buttons();
                }
                if enabled(EventClass::JoystickHat) {
                    open.hats = joystick.pressed_hats();
                    open.hats.retain(|(_, _, pressed_at)| *pressed_at >= hat_enabled_at);
                }
            }
            open
        })
    }

    /// Forgets the open primitives of the enabled classes of a device.
    fn clear_records(&self, id: DeviceId) {
        let enabled = |class| self.is_enabled(class);
        self.with_device(id, |device| {
            if let Some(keys) = device.keys.as_mut().filter(|_| enabled(EventClass::Key)) {
                keys.clear();
            }
            if let Some(pointer) = device.pointer.as_mut().filter(|_| enabled(EventClass::Pointer)) {
                pointer.clear();
            }
            if let Some(touch) = device.touch.as_mut().filter(|_| enabled(EventClass::Touch)) {
                touch.clear();
            }
            if let Some(joystick) = device.joystick.as_mut() {
                if enabled(EventClass::JoystickButton) {
                    joystick.clear_buttons();
                }
                if enabled(EventClass::JoystickHat) {
                    joystick.clear_hats();
                }
            }
        });
    }

    /// Sends the cancellations of a device's open primitives to each of
    /// `recipients` not marked for them yet.
    fn cancel_device(&self, target: &WindowAccessor, id: DeviceId, recipients: &[Rc<ListenerEntry>]) {
        let Some(open) = self.open_records(id) else {
            return;
        };
        let accessor = Some(target);

        for (key, pressed_at) in open.keys {
            let kind = EventKind::Key {
                input: KeyInputType::ReleaseCancel,
                key,
            };
            self.send_cancel(recipients, CancelKey::Key(id, key), accessor, id, pressed_at, kind);
        }

        // Each listener gets the cancellations of all buttons it has not been
        // sent yet; the last of them reports no button held.
        let (x, y) = open.position;
        for entry in recipients {
            let pending = open
                .buttons
                .iter()
                .copied()
                .filter(|b| !entry.is_marked(CancelKey::Button(id, *b)))
                .collect::<Vec<_>>();
            for (idx, button) in pending.iter().copied().enumerate() {
                entry.mark(CancelKey::Button(id, button));
                let kind = EventKind::Pointer {
                    input: PointerInputType::ButtonReleaseCancel,
                    x,
                    y,
                    button: Some(button),
                    any_pressed: idx + 1 < pending.len(),
                    was_any_pressed: true,
                };
                self.deliver_to(entry, accessor, id, open.any_pressed_at, kind);
            }
        }

        for (sequence, record) in open.touches {
            let kind = EventKind::Touch {
                input: TouchInputType::Cancel,
                x: record.x,
                y: record.y,
                sequence,
            };
            let key = CancelKey::Touch(id, sequence);
            self.send_cancel(recipients, key, accessor, id, record.started_at, kind);
        }

        for (number, button, pressed_at) in open.joystick_buttons {
            let kind = EventKind::JoystickButton {
                input: ButtonInputType::ReleaseCancel,
                button,
            };
            let key = CancelKey::JoystickButton(id, number);
            self.send_cancel(recipients, key, accessor, id, pressed_at, kind);
        }

        for (hat, previous, pressed_at) in open.hats {
            let kind = EventKind::JoystickHat {
                hat,
                value: HatValue::CenterCancel,
                previous,
            };
            self.send_cancel(recipients, CancelKey::Hat(id, hat), accessor, id, pressed_at, kind);
        }
    }

    fn send_cancel(
        &self,
        recipients: &[Rc<ListenerEntry>],
        key: CancelKey,
        accessor: Option<&WindowAccessor>,
        id: DeviceId,
        pressed_at: u64,
        kind: EventKind,
    ) {
        for entry in recipients {
            if entry.mark(key) {
                self.deliver_to(entry, accessor, id, pressed_at, kind.clone());
            }
        }
    }

    fn deliver_to(
        &self,
        entry: &ListenerEntry,
        accessor: Option<&WindowAccessor>,
        id: DeviceId,
        pressed_at: u64,
        kind: EventKind,
    ) {
        let event = Event::new(accessor.cloned().map(Accessor::Window), id, kind);
        let _guard = self.listeners.enter();
        entry.deliver(&event, pressed_at);
    }

    /// Cancels everything routed to `target` on every device, for every
    /// listener, and clears the press state.
    pub(crate) fn cancel_all_for_target(&self, target: &WindowAccessor) {
        let _scope = self.cancel_scope();
        let recipients: ListenerList = self.listeners.snapshot();
        let ids = self.devices.borrow().ids();
        for id in ids {
            self.cancel_device(target, id, &recipients);
            self.clear_records(id);
        }
    }

    /// Cancels everything held on a device which is about to be removed.
    pub(crate) fn cancel_for_device_removal(&self, id: DeviceId) {
        let Some(target) = self.selected() else {
            return;
        };
        trace!(device = %id, "Cancelling input of removed device");
        let _scope = self.cancel_scope();
        let recipients = self.listeners.snapshot();
        self.cancel_device(&target, id, &recipients);
        self.clear_records(id);
    }

    /// Sends a leaving listener the cancellations of everything it has seen
    /// pressed. The press state is kept: the other listeners still follow
    /// the presses.
    pub(crate) fn finalize_listener(&self, entry: &Rc<ListenerEntry>) {
        let Some(target) = self.selected() else {
            return;
        };
        let _scope = self.cancel_scope();
        let recipients = [entry.clone()];
        let ids = self.devices.borrow().ids();
        for id in ids {
            self.cancel_device(&target, id, &recipients);
        }
    }

    /// Marks every primitive held when a listener joins as cancelled for it.
    ///
    /// The marked primitives are exactly those the listener is not eligible
    /// for, since they were pressed before it was added. The marks only
    /// outlive this call when the listener joins from within a cancellation
    /// pass; they are reset with the outermost pass.
    pub(crate) fn cancel_for_listener_join(&self, entry: &Rc<ListenerEntry>) {
        let _scope = self.cancel_scope();
        let joined_at = entry.added_at();
        let ids = self.devices.borrow().ids();
        for id in ids {
            let Some(open) = self.open_records(id) else {
                continue;
            };
            let before = |pressed_at: u64| pressed_at < joined_at;
            open.keys
                .iter()
                .filter(|(_, s)| before(*s))
                .for_each(|(key, _)| {
                    entry.mark(CancelKey::Key(id, *key));
                });
            if before(open.any_pressed_at) {
                open.buttons.iter().for_each(|b| {
                    entry.mark(CancelKey::Button(id, *b));
                });
            }
            open.touches
                .iter()
                .filter(|(_, r)| before(r.started_at))
                .for_each(|(sequence, _)| {
                    entry.mark(CancelKey::Touch(id, *sequence));
                });
            open.joystick_buttons
                .iter()
                .filter(|(_, _, s)| before(*s))
                .for_each(|(number, _, _)| {
                    entry.mark(CancelKey::JoystickButton(id, *number));
                });
            open.hats
                .iter()
                .filter(|(_, _, s)| before(*s))
                .for_each(|(hat, _, _)| {
                    entry.mark(CancelKey::Hat(id, *hat));
                });
        }
    }
}
