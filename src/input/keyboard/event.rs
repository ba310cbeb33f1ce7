//! Strongly-typed key codes and key event payloads.

use ::std::fmt::{self, Display};

/// Number of distinct hardware key codes (Linux `KEY_MAX + 1`). Raw codes at
/// or above this limit are not keys and are dropped.
pub const KEY_CODE_LIMIT: usize = 0x300;

/// A hardware (scan-level) key code, as defined by `<linux/input-event-codes.h>`.
///
/// Joystick buttons share the same code space, which allows joystick input to
/// be simulated as key input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HardwareKey(u16);

impl HardwareKey {
    pub const ESC: Self = Self(1);
    pub const ENTER: Self = Self(28);
    pub const SPACE: Self = Self(57);
    pub const UP: Self = Self(103);
    pub const LEFT: Self = Self(105);
    pub const RIGHT: Self = Self(106);
    pub const DOWN: Self = Self(108);
    pub const BTN_DPAD_UP: Self = Self(0x220);
    pub const BTN_DPAD_DOWN: Self = Self(0x221);
    pub const BTN_DPAD_LEFT: Self = Self(0x222);
    pub const BTN_DPAD_RIGHT: Self = Self(0x223);
    pub const BTN_TRIGGER_HAPPY1: Self = Self(0x2c0);

    /// Validates a raw key code. Returns `None` for codes outside the key code
    /// space.
    pub fn new(code: u32) -> Option<Self> {
        (code < KEY_CODE_LIMIT as u32).then_some(Self(code as u16))
    }

    /// Wraps a code known to be inside the key code space.
    pub(crate) const fn from_code(code: u16) -> Self {
        Self(code)
    }

    /// The `n`th "trigger happy" button (`n` counting from 0).
    pub(crate) const fn trigger_happy(n: u16) -> Self {
        Self(Self::BTN_TRIGGER_HAPPY1.0 + n)
    }

    /// The raw key code.
    pub const fn code(self) -> u16 {
        self.0
    }
}

impl Display for HardwareKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// The type of a key event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyInputType {
    Press,
    Release,
    /// Synthesized release: the key was not actually released, but the
    /// press can no longer be followed (focus change, device removal, ...).
    ReleaseCancel,
}

/// A raw key sample, as delivered by the window system.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeySample {
    Press,
    Release,
}
