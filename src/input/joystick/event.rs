//! Joystick codes and raw samples.

use ::strum::{Display, FromRepr};

use crate::input::keyboard::HardwareKey;

/// A joystick button, identified by its Linux input code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Display, FromRepr)]
#[repr(u16)]
pub enum JoystickButton {
    Trigger = 0x120,
    Thumb = 0x121,
    Thumb2 = 0x122,
    Top = 0x123,
    Top2 = 0x124,
    Pinkie = 0x125,
    Base = 0x126,
    A = 0x130,
    B = 0x131,
    C = 0x132,
    X = 0x133,
    Y = 0x134,
    Z = 0x135,
    Tl = 0x136,
    Tr = 0x137,
    Tl2 = 0x138,
    Tr2 = 0x139,
    Select = 0x13a,
    Start = 0x13b,
    Mode = 0x13c,
    ThumbL = 0x13d,
    ThumbR = 0x13e,
    GearDown = 0x150,
    GearUp = 0x151,
}

impl JoystickButton {
    pub fn from_code(code: u16) -> Option<Self> {
        Self::from_repr(code)
    }

    pub const fn code(self) -> u16 {
        self as u16
    }

    /// The key a button press simulates.
    pub const fn as_key(self) -> HardwareKey {
        HardwareKey::from_code(self.code())
    }
}

/// A joystick axis, identified by its Linux input code. The hat axes
/// (`0x10..=0x17`) are not axes in this sense; they are reported as hats.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Display, FromRepr)]
#[repr(u16)]
pub enum JoystickAxis {
    X = 0x00,
    Y = 0x01,
    Z = 0x02,
    Rx = 0x03,
    Ry = 0x04,
    Rz = 0x05,
    Throttle = 0x06,
    Rudder = 0x07,
    Wheel = 0x08,
    Gas = 0x09,
    Brake = 0x0a,
    Pressure = 0x18,
    Distance = 0x19,
    TiltX = 0x1a,
    TiltY = 0x1b,
}

impl JoystickAxis {
    pub fn from_code(code: u16) -> Option<Self> {
        Self::from_repr(code)
    }

    pub const fn code(self) -> u16 {
        self as u16
    }
}

/// Linux code of the first hat axis (`ABS_HAT0X`).
pub const HAT0X: u16 = 0x10;
/// Linux code of the last hat axis (`ABS_HAT3Y`).
pub const HAT3Y: u16 = 0x17;
/// Maximum number of hats per device.
pub const MAX_HATS: usize = 4;

pub const fn is_hat_axis(code: u16) -> bool {
    code >= HAT0X && code <= HAT3Y
}

/// The type of a joystick button event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ButtonInputType {
    Press,
    Release,
    ReleaseCancel,
}

/// Whether a raw sample comes from the button or the axis table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SampleKind {
    Button,
    Axis,
}

/// A raw joystick sample as read from a joystick device file.
///
/// `number` indexes the device's button or axis table, not the Linux code.
/// Init samples describe the initial state reported right after the file is
/// opened.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct JoystickSample {
    pub kind: SampleKind,
    pub number: usize,
    pub value: i32,
    pub init: bool,
}

impl JoystickSample {
    pub fn button(number: usize, value: i32) -> Self {
        Self {
            kind: SampleKind::Button,
            number,
            value,
            init: false,
        }
    }

    pub fn axis(number: usize, value: i32) -> Self {
        Self {
            kind: SampleKind::Axis,
            number,
            value,
            init: false,
        }
    }

    /// Marks the sample as an init sample.
    pub fn init(self) -> Self {
        Self { init: true, ..self }
    }
}
