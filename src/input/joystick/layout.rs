//! Button and axis tables of a joystick.

use super::{is_hat_axis, JoystickAxis, JoystickButton, HAT0X, MAX_HATS};
use crate::errors::{ErrorKind, Result};

/// Maps the sample numbers of a joystick to Linux input codes.
///
/// Raw joystick samples carry a number which indexes one of the two tables.
/// Axis codes in the hat range describe the sub-axes of hats, and must cover
/// `HAT0X` upwards without gaps, in X/Y pairs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JoystickLayout {
    buttons: Vec<u16>,
    axes: Vec<u16>,
    hats: usize,
}

impl JoystickLayout {
    /// Validates the tables of a joystick.
    pub fn new(buttons: Vec<u16>, axes: Vec<u16>) -> Result<Self> {
        if buttons.is_empty() {
            return Err(ErrorKind::InvalidJoystickLayout("no buttons").into());
        }
        if axes.is_empty() {
            return Err(ErrorKind::InvalidJoystickLayout("no axes").into());
        }

        let mut hat_axes = axes
            .iter()
            .copied()
            .filter(|c| is_hat_axis(*c))
            .collect::<Vec<_>>();
        hat_axes.sort_unstable();
        if hat_axes.iter().zip(HAT0X..).any(|(c, expected)| *c != expected) {
            return Err(ErrorKind::InvalidJoystickLayout("hat axes not contiguous").into());
        }
        if hat_axes.len() % 2 != 0 {
            return Err(ErrorKind::InvalidJoystickLayout("hat axis without its pair").into());
        }
        let hats = hat_axes.len() / 2;
        debug_assert!(hats <= MAX_HATS);

        Ok(Self {
            buttons,
            axes,
            hats,
        })
    }

    /// Number of entries in the button table.
    pub fn button_count(&self) -> usize {
        self.buttons.len()
    }

    /// Number of entries in the axis table, hat sub-axes included.
    pub fn axis_count(&self) -> usize {
        self.axes.len()
    }

    pub fn hat_count(&self) -> usize {
        self.hats
    }

    /// The button behind a sample number, if it is a known button.
    pub fn button(&self, number: usize) -> Option<JoystickButton> {
        self.buttons
            .get(number)
            .copied()
            .and_then(JoystickButton::from_code)
    }

    /// The sample number of a button.
    pub fn button_number(&self, button: JoystickButton) -> Option<usize> {
        self.buttons.iter().position(|c| *c == button.code())
    }

    pub fn has_button(&self, button: JoystickButton) -> bool {
        self.button_number(button).is_some()
    }

    /// Resolves an axis sample number.
    pub fn axis(&self, number: usize) -> Option<AxisSlot> {
        let code = *self.axes.get(number)?;
        if is_hat_axis(code) {
            let base = usize::from(code - HAT0X);
            return Some(AxisSlot::Hat {
                hat: base / 2,
                y: base % 2 == 1,
            });
        }
        JoystickAxis::from_code(code).map(AxisSlot::Axis)
    }

    /// The sample number of a (non-hat) axis.
    pub fn axis_number(&self, axis: JoystickAxis) -> Option<usize> {
        self.axes.iter().position(|c| *c == axis.code())
    }

    pub fn has_axis(&self, axis: JoystickAxis) -> bool {
        self.axis_number(axis).is_some()
    }
}

/// What an axis sample number stands for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AxisSlot {
    Axis(JoystickAxis),
    /// One sub-axis of a hat.
    Hat { hat: usize, y: bool },
}
