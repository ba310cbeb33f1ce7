//! The events delivered to listeners.

mod class;

pub use class::*;

use ::std::rc::Rc;
use ::std::time::Instant;

use crate::{
    device::{DeviceId, DeviceInfo},
    input::{
        joystick::{ButtonInputType, HatValue, JoystickAxis, JoystickButton},
        keyboard::{HardwareKey, KeyInputType},
        pointer::{PointerInputType, ScrollDirection, TouchInputType},
    },
    window::Accessor,
};

/// The type of a device management event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DeviceMgmtType {
    Added,
    Removed,
    Changed,
}

/// Class-specific payload of an [`Event`].
#[derive(Clone, Debug, PartialEq)]
pub enum EventKind {
    DeviceMgmt {
        input: DeviceMgmtType,
        device: Rc<DeviceInfo>,
    },
    Key {
        input: KeyInputType,
        key: HardwareKey,
    },
    Pointer {
        input: PointerInputType,
        x: f64,
        y: f64,
        /// The button pressed or released; `None` for motion.
        button: Option<i32>,
        /// Whether any button is held after this event.
        any_pressed: bool,
        /// Whether any button was held before this event.
        was_any_pressed: bool,
    },
    PointerScroll {
        dir: ScrollDirection,
        x: f64,
        y: f64,
        any_pressed: bool,
    },
    Touch {
        input: TouchInputType,
        x: f64,
        y: f64,
        sequence: u64,
    },
    JoystickButton {
        input: ButtonInputType,
        button: JoystickButton,
    },
    JoystickHat {
        hat: usize,
        value: HatValue,
        previous: HatValue,
    },
    JoystickAxis {
        axis: JoystickAxis,
        value: i32,
    },
}

/// An input or device management event.
#[derive(Clone, Debug, PartialEq)]
pub struct Event {
    /// When the event was generated.
    pub time: Instant,
    /// The selected target the event is routed to. Device management events
    /// have none.
    pub accessor: Option<Accessor>,
    /// The device which produced the event. For device management events,
    /// the device the event is about.
    pub device: DeviceId,
    /// The capability which produced the event.
    pub capability: CapabilityClass,
    pub kind: EventKind,
}

impl Event {
    pub(crate) fn new(accessor: Option<Accessor>, device: DeviceId, kind: EventKind) -> Self {
        let capability = Self::class_of(&kind).capability();
        Self {
            time: Instant::now(),
            accessor,
            device,
            capability,
            kind,
        }
    }

    fn class_of(kind: &EventKind) -> EventClass {
        match kind {
            EventKind::DeviceMgmt { .. } => EventClass::DeviceMgmt,
            EventKind::Key { .. } => EventClass::Key,
            EventKind::Pointer { .. } => EventClass::Pointer,
            EventKind::PointerScroll { .. } => EventClass::PointerScroll,
            EventKind::Touch { .. } => EventClass::Touch,
            EventKind::JoystickButton { .. } => EventClass::JoystickButton,
            EventKind::JoystickHat { .. } => EventClass::JoystickHat,
            EventKind::JoystickAxis { .. } => EventClass::JoystickAxis,
        }
    }

    pub fn class(&self) -> EventClass {
        Self::class_of(&self.kind)
    }

    /// Whether the event is a synthesized cancellation.
    pub fn is_cancel(&self) -> bool {
        matches!(
            self.kind,
            EventKind::Key {
                input: KeyInputType::ReleaseCancel,
                ..
            } | EventKind::Pointer {
                input: PointerInputType::ButtonReleaseCancel,
                ..
            } | EventKind::Touch {
                input: TouchInputType::Cancel,
                ..
            } | EventKind::JoystickButton {
                input: ButtonInputType::ReleaseCancel,
                ..
            } | EventKind::JoystickHat {
                value: HatValue::CenterCancel,
                ..
            }
        )
    }

    /// The key presses and releases the event can be interpreted as.
    ///
    /// Keys and joystick buttons map to themselves. The directions of the
    /// first four hats map to the arrow keys, the d-pad buttons and the
    /// "trigger happy" buttons respectively: a hat move releases the
    /// directions it leaves and then presses the directions it enters.
    pub fn as_keys(&self) -> Vec<(HardwareKey, KeyInputType)> {
        match self.kind {
            EventKind::Key { input, key } => vec![(key, input)],
            EventKind::JoystickButton { input, button } => {
                let input = match input {
                    ButtonInputType::Press => KeyInputType::Press,
                    ButtonInputType::Release => KeyInputType::Release,
                    ButtonInputType::ReleaseCancel => KeyInputType::ReleaseCancel,
                };
                vec![(button.as_key(), input)]
            }
            EventKind::JoystickHat {
                hat,
                value,
                previous,
            } => hat_as_keys(hat, value, previous),
            _ => Vec::new(),
        }
    }
}

/// Keys of hat directions, in up, down, left, right order.
const HAT_KEYS: [[HardwareKey; 4]; 4] = [
    [
        HardwareKey::UP,
        HardwareKey::DOWN,
        HardwareKey::LEFT,
        HardwareKey::RIGHT,
    ],
    [
        HardwareKey::BTN_DPAD_UP,
        HardwareKey::BTN_DPAD_DOWN,
        HardwareKey::BTN_DPAD_LEFT,
        HardwareKey::BTN_DPAD_RIGHT,
    ],
    [
        HardwareKey::trigger_happy(0),
        HardwareKey::trigger_happy(1),
        HardwareKey::trigger_happy(2),
        HardwareKey::trigger_happy(3),
    ],
    [
        HardwareKey::trigger_happy(4),
        HardwareKey::trigger_happy(5),
        HardwareKey::trigger_happy(6),
        HardwareKey::trigger_happy(7),
    ],
];

fn hat_as_keys(
    hat: usize,
    value: HatValue,
    previous: HatValue,
) -> Vec<(HardwareKey, KeyInputType)> {
    let Some([up, down, left, right]) = HAT_KEYS.get(hat).copied() else {
        return Vec::new();
    };
    if value == previous || previous == HatValue::NotSet {
        return Vec::new();
    }
    let release = if value == HatValue::CenterCancel {
        KeyInputType::ReleaseCancel
    } else {
        KeyInputType::Release
    };

    let mut keys = Vec::new();
    if previous.is_up() && !value.is_up() {
        keys.push((up, release));
    } else if previous.is_down() && !value.is_down() {
        keys.push((down, release));
    }
    if previous.is_left() && !value.is_left() {
        keys.push((left, release));
    } else if previous.is_right() && !value.is_right() {
        keys.push((right, release));
    }
    if value.is_up() && !previous.is_up() {
        keys.push((up, KeyInputType::Press));
    } else if value.is_down() && !previous.is_down() {
        keys.push((down, KeyInputType::Press));
    }
    if value.is_left() && !previous.is_left() {
        keys.push((left, KeyInputType::Press));
    } else if value.is_right() && !previous.is_right() {
        keys.push((right, KeyInputType::Press));
    }
    keys
}
