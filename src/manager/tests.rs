//! Routing and cancellation scenarios.

use super::*;

use ::pretty_assertions::assert_eq;
use ::quickcheck::{Arbitrary, Gen, QuickCheck};
use ::std::cell::RefCell;

use crate::{
    input::{
        joystick::{ButtonInputType, JoystickLayout, JoystickSample},
        keyboard::{KeyInputType, KeySample},
        pointer::{ButtonSample, PointerInputType, ScrollDirection, TouchInputType},
    },
    listener::CancelKey,
    window::HostWindow,
};

const KEY_A: u32 = 30;
const KEY_B: u32 = 48;

/// A manager with one device per capability and two registered targets, the
/// first of them selected.
struct Fixture {
    manager: DeviceManager,
    wnd_a: Rc<HostWindow>,
    wnd_b: Rc<HostWindow>,
    a: Accessor,
    b: Accessor,
    keyboard: DeviceId,
    mouse: DeviceId,
    touch: DeviceId,
    pad: DeviceId,
}

impl Fixture {
    fn new() -> Self {
        Self::with_builder(Builder::new().with_repeat_policy(RepeatPolicy::Suppress))
    }

    fn with_builder(builder: Builder) -> Self {
        let manager = builder.build().unwrap();
        let keyboard = manager.add_device(DeviceDescriptor::new("keyboard").with_keys());
        let mouse = manager.add_device(DeviceDescriptor::new("mouse").with_pointer());
        let touch = manager.add_device(DeviceDescriptor::new("touchscreen").with_touch());
        let pad = manager.add_device(DeviceDescriptor::new("gamepad").with_joystick(pad_layout()));

        let wnd_a = HostWindow::new("a");
        let wnd_b = HostWindow::new("b");
        let a = Accessor::window(wnd_a.clone());
        let b = Accessor::window(wnd_b.clone());
        wnd_a.set_active(true);
        assert!(manager.add_target(&a));
        assert!(manager.add_target(&b));

        Self {
            manager,
            wnd_a,
            wnd_b,
            a,
            b,
            keyboard,
            mouse,
            touch,
            pad,
        }
    }

    /// Moves the focus from `a` to `b`, the way a host reports it.
    fn activate_b(&self) {
        self.wnd_a.set_active(false);
        self.wnd_b.set_active(true);
        self.manager.focus_changed(&self.b, true);
    }

    fn no_open_records(&self) -> bool {
        self.manager
            .inner
            .devices
            .borrow()
            .iter()
            .all(|d| !d.any_open())
    }
}

/// Buttons A and B; axes X and Y, then the two sub-axes of hat 0.
fn pad_layout() -> JoystickLayout {
    JoystickLayout::new(vec![0x130, 0x131], vec![0x00, 0x01, 0x10, 0x11]).unwrap()
}

const HAT0_X: usize = 2;
const HAT0_Y: usize = 3;

type Log = Rc<RefCell<Vec<Event>>>;

fn record(manager: &DeviceManager, filter: Filter) -> (ListenerToken, Log) {
    let log = Log::default();
    let sink = log.clone();
    let token = manager
        .add_listener(filter, Rc::new(move |ev: &Event| sink.borrow_mut().push(ev.clone())))
        .unwrap();
    (token, log)
}

fn kinds(log: &Log) -> Vec<EventKind> {
    log.borrow().iter().map(|ev| ev.kind.clone()).collect()
}

fn key(code: u32, input: KeyInputType) -> EventKind {
    EventKind::Key {
        input,
        key: HardwareKey::new(code).unwrap(),
    }
}

/// Switching the selection emits one cancellation per held primitive, and
/// every listener receives each cancellation once, even when a listener
/// switches the focus again from within a cancel callback.
#[test]
fn test_focus_change_balance() {
    let fx = Fixture::new();
    let (_, first) = record(&fx.manager, Filter::All);
    let (_, second) = record(&fx.manager, Filter::All);

    fx.manager.key_input(&fx.a, fx.keyboard, KEY_A, KeySample::Press);
    fx.manager
        .touch_input(&fx.a, fx.touch, 9, TouchInputType::Begin, 1.0, 2.0);
    fx.manager.joystick_input(fx.pad, JoystickSample::button(1, 1));
    first.borrow_mut().clear();
    second.borrow_mut().clear();

    let nested = {
        let manager = fx.manager.downgrade();
        let b = fx.b.clone();
        Rc::new(move |ev: &Event| {
            if ev.is_cancel() {
                if let Some(manager) = manager.upgrade() {
                    manager.focus_changed(&b, true);
                }
            }
        })
    };
    fx.manager.add_listener(Filter::All, nested).unwrap();

    fx.activate_b();

    let expected = vec![
        key(KEY_A, KeyInputType::ReleaseCancel),
        EventKind::Touch {
            input: TouchInputType::Cancel,
            x: 1.0,
            y: 2.0,
            sequence: 9,
        },
        EventKind::JoystickButton {
            input: ButtonInputType::ReleaseCancel,
            button: JoystickButton::B,
        },
    ];
    assert_eq!(kinds(&first), expected);
    assert_eq!(kinds(&second), expected);
    assert!(first.borrow().iter().all(|ev| ev.accessor.as_ref() == Some(&fx.a)));
    assert_eq!(fx.manager.selected_target(), Some(fx.b.clone()));
    assert!(fx.no_open_records());
}

/// A listener added while a key is held sees neither its release nor its
/// cancellation.
#[test]
fn test_late_join() {
    let fx = Fixture::new();
    let (_, early) = record(&fx.manager, Filter::All);

    fx.manager.key_input(&fx.a, fx.keyboard, KEY_A, KeySample::Press);
    fx.manager.key_input(&fx.a, fx.keyboard, KEY_B, KeySample::Press);
    let (late_token, late) = record(&fx.manager, Filter::All);

    fx.manager.key_input(&fx.a, fx.keyboard, KEY_A, KeySample::Release);
    fx.activate_b();
    assert!(late.borrow().is_empty());

    fx.wnd_a.set_active(true);
    fx.manager.focus_changed(&fx.a, true);
    fx.manager.key_input(&fx.a, fx.keyboard, KEY_A, KeySample::Press);
    assert!(fx.manager.remove_listener(&late_token, true));
    assert_eq!(
        kinds(&late),
        vec![
            key(KEY_A, KeyInputType::Press),
            key(KEY_A, KeyInputType::ReleaseCancel),
        ]
    );

    assert_eq!(
        kinds(&early),
        vec![
            key(KEY_A, KeyInputType::Press),
            key(KEY_B, KeyInputType::Press),
            key(KEY_A, KeyInputType::Release),
            key(KEY_B, KeyInputType::ReleaseCancel),
            key(KEY_A, KeyInputType::Press),
        ]
    );
    assert!(fx.manager.is_key_pressed(fx.keyboard, HardwareKey::new(KEY_A).unwrap()));
}

/// A listener joining in the middle of a cancellation pass is marked for
/// the primitives held at that point, so a nested pass does not send it
/// their cancellations. The marks end with the outermost pass.
#[test]
fn test_join_during_cancel_pass() {
    let fx = Fixture::new();
    let key_a = CancelKey::Key(fx.keyboard, HardwareKey::new(KEY_A).unwrap());

    let joined: Rc<RefCell<Option<(ListenerToken, Log, bool)>>> = Default::default();
    let adder = {
        let manager = fx.manager.downgrade();
        let joined = joined.clone();
        Rc::new(move |ev: &Event| {
            let Some(manager) = manager.upgrade() else {
                return;
            };
            if ev.is_cancel() && joined.borrow().is_none() {
                let (token, log) = record(&manager, Filter::All);
                let marked = manager
                    .inner
                    .listeners
                    .find(&token)
                    .map_or(false, |entry| entry.is_marked(key_a));
                *joined.borrow_mut() = Some((token, log, marked));
                manager.remove_device(ev.device);
            }
        })
    };
    fx.manager.add_listener(Filter::All, adder).unwrap();
    fx.manager.key_input(&fx.a, fx.keyboard, KEY_A, KeySample::Press);

    fx.activate_b();

    let (token, log, marked) = joined.borrow().clone().unwrap();
    assert!(marked);
    let received = kinds(&log)
        .into_iter()
        .map(|kind| match kind {
            EventKind::DeviceMgmt { input, device } => (input, device.id()),
            other => panic!("unexpected event {other:?}"),
        })
        .collect::<Vec<_>>();
    assert_eq!(received, vec![(DeviceMgmtType::Removed, fx.keyboard)]);
    assert!(fx.manager.get_device(fx.keyboard).is_none());
    assert_eq!(fx.manager.selected_target(), Some(fx.b.clone()));

    let entry = fx.manager.inner.listeners.find(&token).unwrap();
    assert!(!entry.is_marked(key_a));
}

/// A hat gesture: right, down-right, down, center.
#[test]
fn test_hat_composite() {
    let fx = Fixture::new();
    let (_, log) = record(&fx.manager, Filter::EventClass(EventClass::JoystickHat));

    for (axis, value) in [(HAT0_X, 1), (HAT0_Y, 1), (HAT0_X, 0), (HAT0_Y, 0)] {
        fx.manager.joystick_input(fx.pad, JoystickSample::axis(axis, value));
    }

    let values = kinds(&log)
        .into_iter()
        .map(|kind| match kind {
            EventKind::JoystickHat { hat, value, .. } => {
                assert_eq!(hat, 0);
                (value, value.delta_xy())
            }
            other => panic!("unexpected event {other:?}"),
        })
        .collect::<Vec<_>>();
    assert_eq!(
        values,
        vec![
            (HatValue::Right, (1, 0)),
            (HatValue::RightDown, (1, 1)),
            (HatValue::Down, (0, 1)),
            (HatValue::Center, (0, 0)),
        ]
    );
    assert_eq!(fx.manager.hat_value(fx.pad, 0), HatValue::Center);
}

/// Hats moved before hat events get enabled stay silent until centered.
#[test]
fn test_hat_enabled_late() {
    let fx = Fixture::with_builder(Builder::new().with_disabled_classes([EventClass::JoystickHat]));
    let (_, log) = record(&fx.manager, Filter::All);

    fx.manager.joystick_input(fx.pad, JoystickSample::axis(HAT0_X, -1));
    assert_eq!(fx.manager.hat_value(fx.pad, 0), HatValue::Left);

    fx.manager.enable_event_class(EventClass::JoystickHat);
    fx.manager.joystick_input(fx.pad, JoystickSample::axis(HAT0_Y, -1));
    fx.manager.joystick_input(fx.pad, JoystickSample::axis(HAT0_X, 0));
    fx.manager.joystick_input(fx.pad, JoystickSample::axis(HAT0_Y, 0));
    assert!(log.borrow().is_empty());

    fx.manager.joystick_input(fx.pad, JoystickSample::axis(HAT0_Y, 1));
    assert_eq!(
        kinds(&log),
        vec![EventKind::JoystickHat {
            hat: 0,
            value: HatValue::Down,
            previous: HatValue::Center,
        }]
    );
}

/// A hat which left center before hat events were enabled is not cancelled
/// either: no listener saw it move.
#[test]
fn test_gated_hat_not_cancelled() {
    let fx = Fixture::with_builder(Builder::new().with_disabled_classes([EventClass::JoystickHat]));
    let (_, log) = record(&fx.manager, Filter::All);

    fx.manager.joystick_input(fx.pad, JoystickSample::axis(HAT0_X, -1));
    fx.manager.enable_event_class(EventClass::JoystickHat);
    fx.manager.joystick_input(fx.pad, JoystickSample::axis(HAT0_Y, -1));
    assert_eq!(fx.manager.hat_value(fx.pad, 0), HatValue::LeftUp);

    fx.activate_b();

    assert!(log.borrow().is_empty());
    assert!(fx.no_open_records());

    // A gesture started after enabling is cancelled as usual.
    fx.manager.joystick_input(fx.pad, JoystickSample::axis(HAT0_X, 1));
    fx.wnd_b.set_active(false);
    fx.manager.focus_changed(&fx.b, false);
    assert_eq!(
        kinds(&log),
        vec![
            EventKind::JoystickHat {
                hat: 0,
                value: HatValue::Right,
                previous: HatValue::Center,
            },
            EventKind::JoystickHat {
                hat: 0,
                value: HatValue::CenterCancel,
                previous: HatValue::Right,
            },
        ]
    );
}

#[test]
fn test_repeat_add_release_cancel() {
    let fx = Fixture::with_builder(Builder::new().with_repeat_policy(RepeatPolicy::AddReleaseCancel));
    let (_, log) = record(&fx.manager, Filter::All);

    fx.manager.key_input(&fx.a, fx.keyboard, KEY_A, KeySample::Press);
    fx.manager.key_input(&fx.a, fx.keyboard, KEY_A, KeySample::Press);

    assert_eq!(
        kinds(&log),
        vec![
            key(KEY_A, KeyInputType::Press),
            key(KEY_A, KeyInputType::ReleaseCancel),
            key(KEY_A, KeyInputType::Press),
        ]
    );
}

#[test]
fn test_repeat_suppress_and_add_release() {
    let fx = Fixture::new();
    let (_, log) = record(&fx.manager, Filter::All);
    fx.manager.key_input(&fx.a, fx.keyboard, KEY_A, KeySample::Press);
    fx.manager.key_input(&fx.a, fx.keyboard, KEY_A, KeySample::Press);
    assert_eq!(kinds(&log), vec![key(KEY_A, KeyInputType::Press)]);

    let fx = Fixture::with_builder(Builder::new().with_repeat_policy(RepeatPolicy::AddRelease));
    let (_, log) = record(&fx.manager, Filter::All);
    fx.manager.key_input(&fx.a, fx.keyboard, KEY_A, KeySample::Press);
    fx.manager.key_input(&fx.a, fx.keyboard, KEY_A, KeySample::Press);
    assert_eq!(
        kinds(&log),
        vec![
            key(KEY_A, KeyInputType::Press),
            key(KEY_A, KeyInputType::Release),
            key(KEY_A, KeyInputType::Press),
        ]
    );
}

/// Press on A, switch to B, press on B, remove B.
#[test]
fn test_two_targets() {
    let fx = Fixture::new();
    let (_, log) = record(&fx.manager, Filter::EventClass(EventClass::Key));

    fx.manager.key_input(&fx.a, fx.keyboard, KEY_A, KeySample::Press);
    fx.activate_b();
    fx.manager.key_input(&fx.b, fx.keyboard, KEY_B, KeySample::Press);
    assert!(fx.manager.remove_target(&fx.b));

    assert_eq!(
        kinds(&log),
        vec![
            key(KEY_A, KeyInputType::Press),
            key(KEY_A, KeyInputType::ReleaseCancel),
            key(KEY_B, KeyInputType::Press),
            key(KEY_B, KeyInputType::ReleaseCancel),
        ]
    );
    let accessors = log
        .borrow()
        .iter()
        .map(|ev| ev.accessor.clone())
        .collect::<Vec<_>>();
    assert_eq!(
        accessors,
        vec![
            Some(fx.a.clone()),
            Some(fx.a.clone()),
            Some(fx.b.clone()),
            Some(fx.b.clone()),
        ]
    );
    assert_eq!(fx.manager.selected_target(), None);
    assert!(!fx.manager.has_target(&fx.b));
}

/// Input addressed to a window other than the selected one is dropped.
#[test]
fn test_input_for_other_target() {
    let fx = Fixture::new();
    let (_, log) = record(&fx.manager, Filter::All);

    fx.manager.key_input(&fx.b, fx.keyboard, KEY_A, KeySample::Press);
    fx.manager
        .pointer_button(&fx.b, fx.mouse, 1, ButtonSample::Press, 0.0, 0.0);
    fx.manager
        .key_input(&Accessor::foreign("gtk"), fx.keyboard, KEY_A, KeySample::Press);

    assert!(log.borrow().is_empty());
    assert!(fx.no_open_records());
}

/// Every listener's last button cancellation reports no button held.
#[test]
fn test_pointer_cancel() {
    let fx = Fixture::new();
    let (_, log) = record(&fx.manager, Filter::EventClass(EventClass::Pointer));

    fx.manager
        .pointer_button(&fx.a, fx.mouse, 1, ButtonSample::Press, 5.0, 5.0);
    fx.manager.pointer_motion(&fx.a, fx.mouse, 6.0, 7.0);
    fx.manager
        .pointer_button(&fx.a, fx.mouse, 3, ButtonSample::Press, 6.0, 7.0);
    assert!(fx.manager.any_pressed(fx.mouse));
    log.borrow_mut().clear();

    fx.activate_b();

    let cancels = kinds(&log)
        .into_iter()
        .map(|kind| match kind {
            EventKind::Pointer {
                input: PointerInputType::ButtonReleaseCancel,
                button: Some(button),
                any_pressed,
                x,
                y,
                ..
            } => (button, any_pressed, x, y),
            other => panic!("unexpected event {other:?}"),
        })
        .collect::<Vec<_>>();
    assert_eq!(cancels, vec![(1, true, 6.0, 7.0), (3, false, 6.0, 7.0)]);
    assert!(!fx.manager.any_pressed(fx.mouse));
}

/// Pointer motion and buttons of one grab share the grab's routing.
#[test]
fn test_pointer_grab() {
    let fx = Fixture::new();

    fx.manager
        .pointer_button(&fx.a, fx.mouse, 1, ButtonSample::Press, 0.0, 0.0);
    let (_, late) = record(&fx.manager, Filter::All);
    fx.manager.pointer_motion(&fx.a, fx.mouse, 1.0, 0.0);
    fx.manager
        .pointer_scroll(&fx.a, fx.mouse, ScrollDirection::Down, 1.0, 0.0);
    fx.manager
        .pointer_button(&fx.a, fx.mouse, 1, ButtonSample::Release, 1.0, 0.0);
    assert!(late.borrow().is_empty());

    fx.manager.pointer_motion(&fx.a, fx.mouse, 2.0, 0.0);
    assert_eq!(
        kinds(&late),
        vec![EventKind::Pointer {
            input: PointerInputType::Hover,
            x: 2.0,
            y: 0.0,
            button: None,
            any_pressed: false,
            was_any_pressed: false,
        }]
    );
}

#[test]
fn test_touch_begin_twice() {
    let fx = Fixture::new();
    let (_, log) = record(&fx.manager, Filter::All);

    fx.manager
        .touch_input(&fx.a, fx.touch, 4, TouchInputType::Begin, 1.0, 1.0);
    fx.manager
        .touch_input(&fx.a, fx.touch, 4, TouchInputType::Update, 2.0, 2.0);
    fx.manager
        .touch_input(&fx.a, fx.touch, 4, TouchInputType::Begin, 3.0, 3.0);
    fx.manager
        .touch_input(&fx.a, fx.touch, 4, TouchInputType::End, 4.0, 4.0);
    fx.manager
        .touch_input(&fx.a, fx.touch, 4, TouchInputType::End, 4.0, 4.0);

    let touch = |input, x: f64| EventKind::Touch {
        input,
        x,
        y: x,
        sequence: 4,
    };
    assert_eq!(
        kinds(&log),
        vec![
            touch(TouchInputType::Begin, 1.0),
            touch(TouchInputType::Update, 2.0),
            touch(TouchInputType::Cancel, 2.0),
            touch(TouchInputType::Begin, 3.0),
            touch(TouchInputType::End, 4.0),
        ]
    );
}

/// Delivery of a press stops once a listener cancels it. The cancellation
/// still goes to every listener.
#[test]
fn test_press_cancelled_by_listener() {
    let fx = Fixture::new();
    let (_, seen) = record(&fx.manager, Filter::All);
    let deactivate = {
        let manager = fx.manager.downgrade();
        let a = fx.a.clone();
        Rc::new(move |ev: &Event| {
            if matches!(ev.kind, EventKind::Key { input: KeyInputType::Press, .. }) {
                if let Some(manager) = manager.upgrade() {
                    manager.focus_changed(&a, false);
                }
            }
        })
    };
    fx.manager.add_listener(Filter::All, deactivate).unwrap();
    let (_, unseen) = record(&fx.manager, Filter::All);

    fx.manager.key_input(&fx.a, fx.keyboard, KEY_A, KeySample::Press);

    assert_eq!(
        kinds(&seen),
        vec![
            key(KEY_A, KeyInputType::Press),
            key(KEY_A, KeyInputType::ReleaseCancel),
        ]
    );
    assert_eq!(kinds(&unseen), vec![key(KEY_A, KeyInputType::ReleaseCancel)]);
    assert_eq!(fx.manager.selected_target(), None);
    assert!(fx.no_open_records());
}

#[test]
fn test_joystick_button_pressed_twice() {
    let fx = Fixture::new();
    let (_, log) = record(&fx.manager, Filter::All);

    fx.manager.joystick_input(fx.pad, JoystickSample::button(0, 1));
    fx.manager.joystick_input(fx.pad, JoystickSample::button(0, 1));
    fx.manager.joystick_input(fx.pad, JoystickSample::button(0, 0));
    fx.manager.joystick_input(fx.pad, JoystickSample::button(0, 0));
    fx.manager.joystick_input(fx.pad, JoystickSample::button(1, 1).init());
    fx.manager.joystick_input(fx.pad, JoystickSample::button(7, 1));

    let inputs = kinds(&log)
        .into_iter()
        .map(|kind| match kind {
            EventKind::JoystickButton { input, button } => {
                assert_eq!(button, JoystickButton::A);
                input
            }
            other => panic!("unexpected event {other:?}"),
        })
        .collect::<Vec<_>>();
    assert_eq!(
        inputs,
        vec![
            ButtonInputType::Press,
            ButtonInputType::ReleaseCancel,
            ButtonInputType::Press,
            ButtonInputType::Release,
        ]
    );
    assert!(!fx.manager.is_joystick_button_pressed(fx.pad, JoystickButton::B));
}

#[test]
fn test_joystick_axis() {
    let fx = Fixture::new();
    let (_, log) = record(&fx.manager, Filter::All);

    fx.manager.joystick_input(fx.pad, JoystickSample::axis(1, 100).init());
    fx.manager.joystick_input(fx.pad, JoystickSample::axis(1, 100));
    fx.manager.joystick_input(fx.pad, JoystickSample::axis(1, -5));

    assert_eq!(
        kinds(&log),
        vec![EventKind::JoystickAxis {
            axis: JoystickAxis::Y,
            value: -5,
        }]
    );
    assert_eq!(fx.manager.axis_value(fx.pad, JoystickAxis::Y), -5);
}

/// Removing a device cancels only that device's input.
#[test]
fn test_remove_device() {
    let fx = Fixture::new();
    fx.manager.key_input(&fx.a, fx.keyboard, KEY_A, KeySample::Press);
    fx.manager.joystick_input(fx.pad, JoystickSample::button(0, 1));
    let (_, log) = record(&fx.manager, Filter::All);
    let (_, pad_log) = record(&fx.manager, Filter::Device(fx.pad));
    fx.manager.joystick_input(fx.pad, JoystickSample::button(1, 1));

    assert!(fx.manager.remove_device(fx.pad));
    assert!(!fx.manager.remove_device(fx.pad));

    assert_eq!(
        kinds(&pad_log)
            .into_iter()
            .filter(|k| !matches!(k, EventKind::DeviceMgmt { .. }))
            .collect::<Vec<_>>(),
        vec![
            EventKind::JoystickButton {
                input: ButtonInputType::Press,
                button: JoystickButton::B,
            },
            EventKind::JoystickButton {
                input: ButtonInputType::ReleaseCancel,
                button: JoystickButton::B,
            },
        ]
    );
    let removed = log.borrow().last().cloned().unwrap();
    assert_eq!(removed.accessor, None);
    assert!(matches!(
        removed.kind,
        EventKind::DeviceMgmt { input: DeviceMgmtType::Removed, ref device } if device.name() == "gamepad"
    ));
    assert!(fx.manager.is_key_pressed(fx.keyboard, HardwareKey::new(KEY_A).unwrap()));
    assert_eq!(fx.manager.list_devices(), vec![fx.keyboard, fx.mouse, fx.touch]);
}

#[test]
fn test_device_mgmt_events() {
    let manager = Builder::new().build().unwrap();
    let (_, log) = record(&manager, Filter::Capability(CapabilityClass::DeviceMgmt));

    let pad = manager.add_device(DeviceDescriptor::new("pad").with_joystick(pad_layout()));
    assert!(manager.device_changed(pad));
    assert_eq!(
        manager.devices_with_capability(CapabilityClass::JoystickHat),
        vec![pad]
    );

    let inputs = log
        .borrow()
        .iter()
        .map(|ev| match &ev.kind {
            EventKind::DeviceMgmt { input, device } => (*input, device.id()),
            other => panic!("unexpected event {other:?}"),
        })
        .collect::<Vec<_>>();
    assert_eq!(
        inputs,
        vec![(DeviceMgmtType::Added, pad), (DeviceMgmtType::Changed, pad)]
    );

    let quiet = Builder::new()
        .with_disabled_classes([EventClass::DeviceMgmt])
        .build()
        .unwrap();
    let (_, log) = record(&quiet, Filter::All);
    quiet.add_device(DeviceDescriptor::new("keyboard").with_keys());
    assert!(log.borrow().is_empty());
}

/// Removing a listener with pending notification cancels only for it.
#[test]
fn test_remove_listener_notify_pending() {
    let fx = Fixture::new();
    let (token, leaving) = record(&fx.manager, Filter::All);
    let (_, staying) = record(&fx.manager, Filter::All);

    fx.manager.key_input(&fx.a, fx.keyboard, KEY_A, KeySample::Press);
    assert!(fx.manager.remove_listener(&token, true));
    assert!(!fx.manager.remove_listener(&token, true));
    fx.manager.key_input(&fx.a, fx.keyboard, KEY_A, KeySample::Release);

    assert_eq!(
        kinds(&leaving),
        vec![
            key(KEY_A, KeyInputType::Press),
            key(KEY_A, KeyInputType::ReleaseCancel),
        ]
    );
    assert_eq!(
        kinds(&staying),
        vec![
            key(KEY_A, KeyInputType::Press),
            key(KEY_A, KeyInputType::Release),
        ]
    );
}

#[test]
fn test_duplicate_listener() {
    let manager = Builder::new().build().unwrap();
    let callback: Listener = Rc::new(|_: &Event| {});

    let token = manager.add_listener(Filter::All, callback.clone()).unwrap();
    assert!(manager.add_listener(Filter::All, callback.clone()).is_none());
    assert!(manager.remove_listener(&token, false));
    assert!(manager.add_listener(Filter::All, callback).is_some());
}

#[test]
fn test_add_target_rules() {
    let fx = Fixture::new();

    assert!(!fx.manager.add_target(&fx.a));
    assert!(!fx.manager.add_target(&Accessor::foreign("gtk")));

    let zombie = HostWindow::new("zombie");
    let zombie_target = Accessor::window(zombie.clone());
    assert!(fx.manager.add_target(&zombie_target));
    zombie.mark_deleted();
    assert!(!fx.manager.add_target(&zombie_target));
    assert!(!fx.manager.has_target(&zombie_target));

    // An inactive target does not take the selection.
    assert_eq!(fx.manager.selected_target(), Some(fx.a.clone()));

    let popup = HostWindow::new("popup");
    popup.set_active(true);
    let (_, log) = record(&fx.manager, Filter::All);
    fx.manager.key_input(&fx.a, fx.keyboard, KEY_A, KeySample::Press);
    assert!(fx.manager.add_target(&Accessor::window(popup.clone())));
    assert_eq!(fx.manager.selected_target(), Some(Accessor::window(popup)));
    assert_eq!(
        kinds(&log),
        vec![
            key(KEY_A, KeyInputType::Press),
            key(KEY_A, KeyInputType::ReleaseCancel),
        ]
    );
}

/// A selected window destroyed without being unregistered is dropped on the
/// next input, cancelling what it held.
#[test]
fn test_deleted_selection_reaped() {
    let fx = Fixture::new();
    let (_, log) = record(&fx.manager, Filter::All);
    fx.manager.key_input(&fx.a, fx.keyboard, KEY_A, KeySample::Press);

    fx.wnd_a.mark_deleted();
    fx.manager.key_input(&fx.a, fx.keyboard, KEY_B, KeySample::Press);

    assert_eq!(
        kinds(&log),
        vec![
            key(KEY_A, KeyInputType::Press),
            key(KEY_A, KeyInputType::ReleaseCancel),
        ]
    );
    assert!(!fx.manager.has_target(&fx.a));
    assert_eq!(fx.manager.selected_target(), None);
}

#[test]
fn test_activate_twice() {
    let fx = Fixture::new();
    let (_, log) = record(&fx.manager, Filter::All);
    fx.manager.key_input(&fx.a, fx.keyboard, KEY_A, KeySample::Press);

    fx.manager.focus_changed(&fx.a, true);

    assert_eq!(kinds(&log), vec![key(KEY_A, KeyInputType::Press)]);
    assert!(fx.manager.is_key_pressed(fx.keyboard, HardwareKey::new(KEY_A).unwrap()));
}

#[test]
fn test_weak_handle() {
    let manager = Builder::new().build().unwrap();
    let weak = manager.downgrade();

    assert!(weak.upgrade().is_some());
    drop(manager);
    assert!(weak.upgrade().is_none());
}

/// Raw operations for the "nothing held without a selection" property.
#[derive(Clone, Debug)]
enum Op {
    Focus { on_b: bool, active: bool },
    Key { code: u8, press: bool, on_b: bool },
    Button { button: u8, press: bool, on_b: bool },
    Touch { sequence: u8, input: u8, on_b: bool },
    JoyButton { number: u8, press: bool },
    Hat { y: bool, value: i8 },
    RemoveTarget { on_b: bool },
    AddTarget { on_b: bool },
}

impl Arbitrary for Op {
    fn arbitrary(g: &mut Gen) -> Self {
        match u8::arbitrary(g) % 8 {
            0 => Op::Focus {
                on_b: bool::arbitrary(g),
                active: bool::arbitrary(g),
            },
            1 => Op::Key {
                code: u8::arbitrary(g) % 4,
                press: bool::arbitrary(g),
                on_b: bool::arbitrary(g),
            },
            2 => Op::Button {
                button: u8::arbitrary(g) % 3,
                press: bool::arbitrary(g),
                on_b: bool::arbitrary(g),
            },
            3 => Op::Touch {
                sequence: u8::arbitrary(g) % 3,
                input: u8::arbitrary(g) % 4,
                on_b: bool::arbitrary(g),
            },
            4 => Op::JoyButton {
                number: u8::arbitrary(g) % 2,
                press: bool::arbitrary(g),
            },
            5 => Op::Hat {
                y: bool::arbitrary(g),
                value: i8::arbitrary(g) % 2,
            },
            6 => Op::RemoveTarget {
                on_b: bool::arbitrary(g),
            },
            _ => Op::AddTarget {
                on_b: bool::arbitrary(g),
            },
        }
    }
}

impl Op {
    /// Whether the operation addresses the second window.
    fn on_b(&self) -> bool {
        match *self {
            Op::Focus { on_b, .. }
            | Op::Key { on_b, .. }
            | Op::Button { on_b, .. }
            | Op::Touch { on_b, .. }
            | Op::RemoveTarget { on_b }
            | Op::AddTarget { on_b } => on_b,
            Op::JoyButton { .. } | Op::Hat { .. } => false,
        }
    }
}

impl Fixture {
    fn apply(&self, op: &Op) {
        let (wnd, target) = if op.on_b() {
            (&self.wnd_b, &self.b)
        } else {
            (&self.wnd_a, &self.a)
        };
        let m = &self.manager;
        match *op {
            Op::Focus { active, .. } => {
                wnd.set_active(active);
                m.focus_changed(target, active);
            }
            Op::Key { code, press, .. } => {
                let sample = if press { KeySample::Press } else { KeySample::Release };
                m.key_input(target, self.keyboard, KEY_A + u32::from(code), sample);
            }
            Op::Button { button, press, .. } => {
                let sample = if press { ButtonSample::Press } else { ButtonSample::Release };
                m.pointer_button(target, self.mouse, i32::from(button), sample, 0.0, 0.0);
            }
            Op::Touch { sequence, input, .. } => {
                let input = [
                    TouchInputType::Begin,
                    TouchInputType::Update,
                    TouchInputType::End,
                    TouchInputType::Cancel,
                ][usize::from(input)];
                m.touch_input(target, self.touch, u64::from(sequence), input, 0.0, 0.0);
            }
            Op::JoyButton { number, press } => {
                let sample = JoystickSample::button(usize::from(number), i32::from(press));
                m.joystick_input(self.pad, sample);
            }
            Op::Hat { y, value } => {
                let axis = if y { HAT0_Y } else { HAT0_X };
                m.joystick_input(self.pad, JoystickSample::axis(axis, i32::from(value)));
            }
            Op::RemoveTarget { .. } => {
                m.remove_target(target);
            }
            Op::AddTarget { .. } => {
                m.add_target(target);
            }
        }
    }
}

/// Without a selected target nothing is held, whatever the sequence of
/// inputs, focus changes and target (un)registrations.
#[test]
fn test_nothing_held_without_selection() {
    fn prop(ops: Vec<Op>) -> bool {
        let fx = Fixture::new();
        let (_, _log) = record(&fx.manager, Filter::All);
        ops.iter().all(|op| {
            fx.apply(op);
            fx.manager.selected_target().is_some() || fx.no_open_records()
        })
    }

    QuickCheck::new()
        .tests(300)
        .quickcheck(prop as fn(Vec<Op>) -> bool);
}
