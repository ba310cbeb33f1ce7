//! Press state tracking for joystick buttons, hats and axes.

use super::{HatValue, JoystickAxis, JoystickButton, JoystickLayout};
use crate::stamp;

#[derive(Clone, Copy, Debug)]
struct ButtonRecord {
    pressed: bool,
    pressed_at: u64,
}

impl ButtonRecord {
    const UP: Self = Self {
        pressed: false,
        pressed_at: stamp::UNSET,
    };
}

#[derive(Clone, Copy, Debug)]
struct HatRecord {
    /// Sub-axis codes, see [`HatValue`].
    x: u8,
    y: u8,
    /// Stamp of the last move away from center, [`stamp::UNSET`] when
    /// centered.
    pressed_at: u64,
}

impl HatRecord {
    const CENTER: Self = Self {
        x: 0,
        y: 0,
        pressed_at: stamp::UNSET,
    };

    fn value(&self) -> HatValue {
        HatValue::from_axes(self.x, self.y)
    }
}

/// A hat movement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HatChange {
    pub value: HatValue,
    pub previous: HatValue,
    pub pressed_at: u64,
}

/// The state of one joystick: which buttons are held, where each hat points
/// and the last value of each axis.
pub struct JoystickState {
    layout: JoystickLayout,
    buttons: Vec<ButtonRecord>,
    hats: Vec<HatRecord>,
    /// Indexed by axis sample number; hat sub-axes are unused.
    axes: Vec<i32>,
}

impl JoystickState {
    pub fn new(layout: JoystickLayout) -> Self {
        Self {
            buttons: vec![ButtonRecord::UP; layout.button_count()],
            hats: vec![HatRecord::CENTER; layout.hat_count()],
            axes: vec![0; layout.axis_count()],
            layout,
        }
    }

    pub fn layout(&self) -> &JoystickLayout {
        &self.layout
    }

    pub fn is_button_pressed(&self, button: JoystickButton) -> bool {
        self.layout
            .button_number(button)
            .map(|n| self.buttons[n].pressed)
            .unwrap_or(false)
    }

    pub fn button_pressed_at(&self, number: usize) -> Option<u64> {
        self.buttons
            .get(number)
            .filter(|b| b.pressed)
            .map(|b| b.pressed_at)
    }

    /// Resets a button to up without a stamp.
    pub fn reset_button(&mut self, number: usize) {
        if let Some(record) = self.buttons.get_mut(number) {
            *record = ButtonRecord::UP;
        }
    }

    /// Records a button press with a fresh stamp and returns the stamp.
    pub fn press_button(&mut self, number: usize) -> u64 {
        let pressed_at = stamp::unique();
        self.buttons[number] = ButtonRecord {
            pressed: true,
            pressed_at,
        };
        pressed_at
    }

    /// Releases a button, returning the stamp of its press. Returns `None`
    /// when the button is not held.
    pub fn release_button(&mut self, number: usize) -> Option<u64> {
        let record = self.buttons.get_mut(number)?;
        if !record.pressed {
            return None;
        }
        record.pressed = false;
        Some(record.pressed_at)
    }

    /// The held buttons with their sample number and stamp.
    pub fn pressed_buttons(&self) -> Vec<(usize, JoystickButton, u64)> {
        self.buttons
            .iter()
            .enumerate()
            .filter(|(_, b)| b.pressed)
            .filter_map(|(n, b)| Some((n, self.layout.button(n)?, b.pressed_at)))
            .collect()
    }

    pub fn clear_buttons(&mut self) {
        self.buttons.fill(ButtonRecord::UP);
    }

    /// The current position of a hat, [`HatValue::NotSet`] for an unknown hat.
    pub fn hat_value(&self, hat: usize) -> HatValue {
        self.hats
            .get(hat)
            .map(HatRecord::value)
            .unwrap_or(HatValue::NotSet)
    }

    pub fn hat_pressed_at(&self, hat: usize) -> Option<u64> {
        self.hats
            .get(hat)
            .filter(|h| h.value().is_pressed())
            .map(|h| h.pressed_at)
    }

    /// Centers one sub-axis of a hat and forgets its stamp.
    pub fn reset_hat_axis(&mut self, hat: usize, y: bool) {
        if let Some(record) = self.hats.get_mut(hat) {
            if y {
                record.y = 0;
            } else {
                record.x = 0;
            }
            record.pressed_at = stamp::UNSET;
        }
    }

    /// Applies a raw reading of one hat sub-axis. Returns `None` if the
    /// composite value does not change.
    ///
    /// A move away from center takes a fresh stamp. The stamp of a hat that
    /// returns to center is kept until [`settle_hat`], so the move back is
    /// still routed like the rest of the gesture.
    ///
    /// [`settle_hat`]: Self::settle_hat
    pub fn move_hat(&mut self, hat: usize, y: bool, raw: i32) -> Option<HatChange> {
        let record = self.hats.get_mut(hat)?;
        let previous = record.value();
        let code = HatValue::axis_code(raw);
        let (x, y) = if y { (record.x, code) } else { (code, record.y) };
        let value = HatValue::from_axes(x, y);
        if value == previous {
            return None;
        }

        if value.is_pressed() && !previous.is_pressed() {
            record.pressed_at = stamp::unique();
        }
        record.x = x;
        record.y = y;

        Some(HatChange {
            value,
            previous,
            pressed_at: record.pressed_at,
        })
    }

    /// Forgets the stamp of a centered hat.
    pub fn settle_hat(&mut self, hat: usize) {
        if let Some(record) = self.hats.get_mut(hat) {
            if !record.value().is_pressed() {
                record.pressed_at = stamp::UNSET;
            }
        }
    }

    /// The hats off center with their value and stamp.
    pub fn pressed_hats(&self) -> Vec<(usize, HatValue, u64)> {
        self.hats
            .iter()
            .enumerate()
            .filter(|(_, h)| h.value().is_pressed())
            .map(|(n, h)| (n, h.value(), h.pressed_at))
            .collect()
    }

    pub fn clear_hats(&mut self) {
        self.hats.fill(HatRecord::CENTER);
    }

    /// The last value of an axis, `0` if the joystick has no such axis.
    pub fn axis_value(&self, axis: JoystickAxis) -> i32 {
        self.layout
            .axis_number(axis)
            .map(|n| self.axes[n])
            .unwrap_or(0)
    }

    /// Stores an axis reading. Returns `true` if the value changed.
    pub fn set_axis(&mut self, number: usize, value: i32) -> bool {
        match self.axes.get_mut(number) {
            Some(stored) if *stored != value => {
                *stored = value;
                true
            }
            _ => false,
        }
    }
}
