//! Hat (d-pad) values.

use ::strum::{Display, FromRepr};

/// Position of a joystick hat.
///
/// The discriminant is `y * 4 + x`, where `x` and `y` are the sub-axis codes
/// `0` (centered), `1` (negative: left/up) and `2` (positive: right/down).
///
/// ```text
/// Y\X| 1   0   2
/// ---|-----------
///  1 | 5   4   6
///  0 | 1   0   2
///  2 | 9   8  10
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, FromRepr)]
#[repr(i32)]
pub enum HatValue {
    /// No previous value is known.
    NotSet = -1,
    Center = 0,
    Left = 1,
    Right = 2,
    Up = 4,
    LeftUp = 5,
    RightUp = 6,
    Down = 8,
    LeftDown = 9,
    RightDown = 10,
    /// Synthesized return to center: the hat was not actually released, but
    /// its position can no longer be followed.
    CenterCancel = 16,
}

const LEFT_BIT: i32 = 1;
const RIGHT_BIT: i32 = 2;
const UP_BIT: i32 = 4;
const DOWN_BIT: i32 = 8;

impl HatValue {
    /// Composes a value from two sub-axis codes.
    pub fn from_axes(x: u8, y: u8) -> Self {
        debug_assert!(x <= 2 && y <= 2);
        Self::from_repr(i32::from(y) * 4 + i32::from(x)).unwrap_or(Self::Center)
    }

    /// Maps a raw axis reading to a sub-axis code.
    pub fn axis_code(raw: i32) -> u8 {
        match raw {
            0 => 0,
            r if r < 0 => 1,
            _ => 2,
        }
    }

    /// Whether the hat is off center.
    pub fn is_pressed(self) -> bool {
        !matches!(self, Self::NotSet | Self::Center | Self::CenterCancel)
    }

    /// Direction as a unit step: left and up are negative.
    pub fn delta_xy(self) -> (i32, i32) {
        if !self.is_pressed() {
            return (0, 0);
        }
        let dx = if self.has(LEFT_BIT) {
            -1
        } else if self.has(RIGHT_BIT) {
            1
        } else {
            0
        };
        let dy = if self.has(UP_BIT) {
            -1
        } else if self.has(DOWN_BIT) {
            1
        } else {
            0
        };
        (dx, dy)
    }

    pub fn is_left(self) -> bool {
        self.is_pressed() && self.has(LEFT_BIT)
    }

    pub fn is_right(self) -> bool {
        self.is_pressed() && self.has(RIGHT_BIT)
    }

    pub fn is_up(self) -> bool {
        self.is_pressed() && self.has(UP_BIT)
    }

    pub fn is_down(self) -> bool {
        self.is_pressed() && self.has(DOWN_BIT)
    }

    fn has(self, bit: i32) -> bool {
        (self as i32) & bit != 0
    }
}
