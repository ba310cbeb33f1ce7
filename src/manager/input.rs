//! Raw input entry points.
//!
//! Raw samples are only turned into events while a target is selected.
//! Keyboard, pointer and touch samples name the window they were delivered
//! to and are dropped unless that window is the selected one; joystick
//! samples always go to the selected target.

use ::tracing::trace;

use super::{DeviceManager, ManagerInner};
use crate::{
    config::RepeatPolicy,
    device::DeviceId,
    event::{EventClass, EventKind},
    input::{
        joystick::{AxisSlot, ButtonInputType, JoystickButton, JoystickSample, SampleKind},
        keyboard::{HardwareKey, KeyInputType, KeySample},
        pointer::{ButtonSample, PointerInputType, ScrollDirection, TouchInputType},
    },
    stamp,
    window::{Accessor, WindowAccessor},
};

impl ManagerInner {
    /// The selected target, if raw input of `class` addressed to `target`
    /// (or to no particular window) is to be routed.
    fn route(&self, class: EventClass, target: Option<&Accessor>) -> Option<WindowAccessor> {
        self.reap_deleted_selection();
        let selected = self.selected()?;
        if !self.is_enabled(class) {
            return None;
        }
        match target {
            None => Some(selected),
            Some(Accessor::Window(wnd)) if *wnd == selected => Some(selected),
            Some(_) => None,
        }
    }
}

impl DeviceManager {
    /// Feeds a raw key sample delivered to `target`.
    pub fn key_input(&self, target: &Accessor, device: DeviceId, code: u32, sample: KeySample) {
        let inner = &self.inner;
        let Some(wnd) = inner.route(EventClass::Key, Some(target)) else {
            return;
        };
        let Some(key) = HardwareKey::new(code) else {
            trace!(code, "Ignoring key code out of range");
            return;
        };
        let Some(held) = inner.with_device(device, |d| d.keys.as_ref().map(|k| k.pressed_at(key))) else {
            return;
        };
        let Some(held) = held else {
            trace!(device = %device, "Key input from device without keys");
            return;
        };

        match sample {
            KeySample::Press => {
                if held.is_some() {
                    let release = match inner.repeat_policy {
                        RepeatPolicy::Suppress => return,
                        RepeatPolicy::AddRelease => KeyInputType::Release,
                        RepeatPolicy::AddReleaseCancel => KeyInputType::ReleaseCancel,
                    };
                    let Some(pressed_at) = inner
                        .with_device(device, |d| d.keys.as_mut().and_then(|k| k.release(key)))
                        .flatten()
                    else {
                        return;
                    };
                    inner.dispatch(
                        Some(&wnd),
                        device,
                        pressed_at,
                        EventKind::Key {
                            input: release,
                            key,
                        },
                        || true,
                    );
                    if !inner.is_selected(&wnd) {
                        return;
                    }
                }
                self.press_key(&wnd, device, key);
            }
            KeySample::Release => {
                let Some(pressed_at) = inner
                    .with_device(device, |d| d.keys.as_mut().and_then(|k| k.release(key)))
                    .flatten()
                else {
                    trace!(%key, "Ignoring orphan key release");
                    return;
                };
                inner.dispatch(
                    Some(&wnd),
                    device,
                    pressed_at,
                    EventKind::Key {
                        input: KeyInputType::Release,
                        key,
                    },
                    || true,
                );
            }
        }
    }

    fn press_key(&self, wnd: &WindowAccessor, device: DeviceId, key: HardwareKey) {
        let inner = &self.inner;
        let pressed_at = inner.with_device(device, |d| {
            d.keys
                .as_mut()
                .filter(|k| !k.is_pressed(key))
                .map(|k| k.press(key))
        });
        let Some(pressed_at) = pressed_at.flatten() else {
            return;
        };
        let still_pressed = || {
            inner
                .with_device(device, |d| d.keys.as_ref().and_then(|k| k.pressed_at(key)))
                .flatten()
                == Some(pressed_at)
        };
        inner.dispatch(
            Some(wnd),
            device,
            pressed_at,
            EventKind::Key {
                input: KeyInputType::Press,
                key,
            },
            still_pressed,
        );
    }

    /// Feeds raw pointer motion delivered to `target`.
    pub fn pointer_motion(&self, target: &Accessor, device: DeviceId, x: f64, y: f64) {
        let inner = &self.inner;
        let Some(wnd) = inner.route(EventClass::Pointer, Some(target)) else {
            return;
        };
        let state = inner.with_device(device, |d| {
            d.pointer.as_mut().map(|p| {
                p.motion(x, y);
                (p.any_pressed(), p.any_pressed_at())
            })
        });
        let Some((any_pressed, pressed_at)) = state.flatten() else {
            return;
        };
        let input = if any_pressed {
            PointerInputType::Move
        } else {
            PointerInputType::Hover
        };
        inner.dispatch(
            Some(&wnd),
            device,
            pressed_at,
            EventKind::Pointer {
                input,
                x,
                y,
                button: None,
                any_pressed,
                was_any_pressed: any_pressed,
            },
            || true,
        );
    }

    /// Feeds a raw pointer button sample delivered to `target`.
    pub fn pointer_button(
        &self,
        target: &Accessor,
        device: DeviceId,
        button: i32,
        sample: ButtonSample,
        x: f64,
        y: f64,
    ) {
        let inner = &self.inner;
        let Some(wnd) = inner.route(EventClass::Pointer, Some(target)) else {
            return;
        };
        let change = inner.with_device(device, |d| {
            d.pointer.as_mut().and_then(|p| {
                let change = match sample {
                    ButtonSample::Press => p.press(button, x, y),
                    ButtonSample::Release => p.release(button, x, y),
                }?;
                Some((change, p.any_pressed_at()))
            })
        });
        let Some((change, pressed_at)) = change.flatten() else {
            trace!(button, ?sample, "Ignoring pointer button sample");
            return;
        };

        match sample {
            ButtonSample::Press => {
                let still_pressed = || {
                    inner
                        .with_device(device, |d| {
                            d.pointer.as_ref().map_or(false, |p| {
                                p.is_button_pressed(button) && p.any_pressed_at() == pressed_at
                            })
                        })
                        .unwrap_or(false)
                };
                inner.dispatch(
                    Some(&wnd),
                    device,
                    pressed_at,
                    EventKind::Pointer {
                        input: PointerInputType::ButtonPress,
                        x,
                        y,
                        button: Some(button),
                        any_pressed: change.any_pressed,
                        was_any_pressed: change.was_any_pressed,
                    },
                    still_pressed,
                );
            }
            ButtonSample::Release => {
                inner.dispatch(
                    Some(&wnd),
                    device,
                    pressed_at,
                    EventKind::Pointer {
                        input: PointerInputType::ButtonRelease,
                        x,
                        y,
                        button: Some(button),
                        any_pressed: change.any_pressed,
                        was_any_pressed: change.was_any_pressed,
                    },
                    || inner.is_selected(&wnd),
                );
                inner.with_device(device, |d| d.pointer.as_mut().map(|p| p.settle()));
            }
        }
    }

    /// Feeds a raw scroll step delivered to `target`.
    pub fn pointer_scroll(
        &self,
        target: &Accessor,
        device: DeviceId,
        dir: ScrollDirection,
        x: f64,
        y: f64,
    ) {
        let inner = &self.inner;
        let Some(wnd) = inner.route(EventClass::PointerScroll, Some(target)) else {
            return;
        };
        let state = inner.with_device(device, |d| {
            d.pointer
                .as_ref()
                .map(|p| (p.any_pressed(), p.any_pressed_at()))
        });
        let Some((any_pressed, pressed_at)) = state.flatten() else {
            return;
        };
        inner.dispatch(
            Some(&wnd),
            device,
            pressed_at,
            EventKind::PointerScroll {
                dir,
                x,
                y,
                any_pressed,
            },
            || true,
        );
    }

    /// Feeds a raw touch sample delivered to `target`.
    pub fn touch_input(
        &self,
        target: &Accessor,
        device: DeviceId,
        sequence: u64,
        input: TouchInputType,
        x: f64,
        y: f64,
    ) {
        let inner = &self.inner;
        let Some(wnd) = inner.route(EventClass::Touch, Some(target)) else {
            return;
        };
        if inner
            .with_device(device, |d| d.touch.is_none())
            .unwrap_or(true)
        {
            return;
        }
        let touch_event = |input, x, y| EventKind::Touch {
            input,
            x,
            y,
            sequence,
        };
        let open_since = move |started_at: u64| {
            move || {
                inner
                    .with_device(device, |d| d.touch.as_ref().and_then(|t| t.get(sequence)))
                    .flatten()
                    .map(|r| r.started_at)
                    == Some(started_at)
            }
        };

        match input {
            TouchInputType::Begin => {
                let stale = inner
                    .with_device(device, |d| d.touch.as_mut().and_then(|t| t.take(sequence)))
                    .flatten();
                if let Some(stale) = stale {
                    trace!(sequence, "Touch sequence begun twice");
                    inner.dispatch(
                        Some(&wnd),
                        device,
                        stale.started_at,
                        touch_event(TouchInputType::Cancel, stale.x, stale.y),
                        || true,
                    );
                    if !inner.is_selected(&wnd) {
                        return;
                    }
                }
                let Some(started_at) = inner
                    .with_device(device, |d| d.touch.as_mut().map(|t| t.begin(sequence, x, y)))
                    .flatten()
                else {
                    return;
                };
                inner.dispatch(
                    Some(&wnd),
                    device,
                    started_at,
                    touch_event(TouchInputType::Begin, x, y),
                    open_since(started_at),
                );
            }
            TouchInputType::Update => {
                let Some(record) = inner
                    .with_device(device, |d| d.touch.as_mut().and_then(|t| t.update(sequence, x, y)))
                    .flatten()
                else {
                    trace!(sequence, "Ignoring update of unknown touch sequence");
                    return;
                };
                inner.dispatch(
                    Some(&wnd),
                    device,
                    record.started_at,
                    touch_event(TouchInputType::Update, x, y),
                    open_since(record.started_at),
                );
            }
            TouchInputType::End | TouchInputType::Cancel => {
                let Some(record) = inner
                    .with_device(device, |d| d.touch.as_mut().and_then(|t| t.take(sequence)))
                    .flatten()
                else {
                    trace!(sequence, "Ignoring end of unknown touch sequence");
                    return;
                };
                inner.dispatch(
                    Some(&wnd),
                    device,
                    record.started_at,
                    touch_event(input, x, y),
                    || true,
                );
            }
        }
    }

    /// Feeds a raw joystick sample. Joystick input always goes to the
    /// selected target.
    pub fn joystick_input(&self, device: DeviceId, sample: JoystickSample) {
        let inner = &self.inner;
        inner.reap_deleted_selection();
        let Some(wnd) = inner.selected() else {
            return;
        };
        let slot = inner
            .with_device(device, |d| {
                d.joystick.as_ref().map(|j| match sample.kind {
                    SampleKind::Button => j.layout().button(sample.number).map(Slot::Button),
                    SampleKind::Axis => j.layout().axis(sample.number).map(Slot::Axis),
                })
            })
            .flatten()
            .flatten();
        let Some(slot) = slot else {
            trace!(device = %device, ?sample, "Ignoring joystick sample");
            return;
        };

        match slot {
            Slot::Button(button) => {
                if sample.init {
                    inner.with_device(device, |d| {
                        d.joystick.as_mut().map(|j| j.reset_button(sample.number))
                    });
                    return;
                }
                if !inner.is_enabled(EventClass::JoystickButton) {
                    return;
                }
                self.joystick_button(&wnd, device, sample.number, button, sample.value != 0);
            }
            Slot::Axis(AxisSlot::Hat { hat, y }) => {
                if sample.init {
                    inner.with_device(device, |d| {
                        d.joystick.as_mut().map(|j| j.reset_hat_axis(hat, y))
                    });
                    return;
                }
                self.joystick_hat(&wnd, device, hat, y, sample.value);
            }
            Slot::Axis(AxisSlot::Axis(axis)) => {
                if !inner.is_enabled(EventClass::JoystickAxis) {
                    return;
                }
                let changed = inner
                    .with_device(device, |d| {
                        d.joystick
                            .as_mut()
                            .map_or(false, |j| j.set_axis(sample.number, sample.value))
                    })
                    .unwrap_or(false);
                if changed && !sample.init {
                    inner.dispatch(
                        Some(&wnd),
                        device,
                        stamp::UNSET,
                        EventKind::JoystickAxis {
                            axis,
                            value: sample.value,
                        },
                        || true,
                    );
                }
            }
        }
    }

    fn joystick_button(
        &self,
        wnd: &WindowAccessor,
        device: DeviceId,
        number: usize,
        button: JoystickButton,
        pressed: bool,
    ) {
        let inner = &self.inner;
        let released = inner
            .with_device(device, |d| d.joystick.as_mut().and_then(|j| j.release_button(number)))
            .flatten();
        let event = |input| EventKind::JoystickButton { input, button };

        if !pressed {
            match released {
                Some(pressed_at) => inner.dispatch(
                    Some(wnd),
                    device,
                    pressed_at,
                    event(ButtonInputType::Release),
                    || true,
                ),
                None => trace!(%button, "Ignoring orphan joystick button release"),
            }
            return;
        }

        if let Some(pressed_at) = released {
            inner.dispatch(
                Some(wnd),
                device,
                pressed_at,
                event(ButtonInputType::ReleaseCancel),
                || true,
            );
            if !inner.is_selected(wnd) {
                return;
            }
        }
        let Some(pressed_at) = inner
            .with_device(device, |d| d.joystick.as_mut().map(|j| j.press_button(number)))
            .flatten()
        else {
            return;
        };
        let still_pressed = || {
            inner
                .with_device(device, |d| d.joystick.as_ref().and_then(|j| j.button_pressed_at(number)))
                .flatten()
                == Some(pressed_at)
        };
        inner.dispatch(
            Some(wnd),
            device,
            pressed_at,
            event(ButtonInputType::Press),
            still_pressed,
        );
    }

    fn joystick_hat(&self, wnd: &WindowAccessor, device: DeviceId, hat: usize, y: bool, raw: i32) {
        let inner = &self.inner;
        let Some(change) = inner
            .with_device(device, |d| d.joystick.as_mut().and_then(|j| j.move_hat(hat, y, raw)))
            .flatten()
        else {
            return;
        };

        // Hats are tracked while hat events are disabled. A hat which left
        // center before they were enabled stays silent until it is centered.
        if inner.is_enabled(EventClass::JoystickHat) && change.pressed_at >= inner.hat_enabled_at.get() {
            let unchanged = || {
                inner
                    .with_device(device, |d| d.joystick.as_ref().map(|j| j.hat_value(hat)))
                    .flatten()
                    == Some(change.value)
            };
            inner.dispatch(
                Some(wnd),
                device,
                change.pressed_at,
                EventKind::JoystickHat {
                    hat,
                    value: change.value,
                    previous: change.previous,
                },
                unchanged,
            );
        }
        inner.with_device(device, |d| d.joystick.as_mut().map(|j| j.settle_hat(hat)));
    }
}

/// What a joystick sample number resolved to.
enum Slot {
    Button(JoystickButton),
    Axis(AxisSlot),
}
