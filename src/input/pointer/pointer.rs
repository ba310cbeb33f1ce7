//! Pointer button state.

use crate::stamp;

/// Button transition produced by a raw press or release.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ButtonChange {
    /// Whether any button was held before the sample.
    pub was_any_pressed: bool,
    /// Whether any button is held after the sample.
    pub any_pressed: bool,
}

/// Tracks the held buttons of one pointer device.
///
/// While at least one button is held the pointer is considered grabbed by the
/// selected target. The "any button pressed" stamp marks the start of the
/// grab and decides which listeners see the pointer events of the grab: a
/// listener added after the grab started sees none of them until all buttons
/// are released.
pub struct PointerState {
    /// Held buttons. Order is not significant beyond being deterministic.
    buttons: Vec<i32>,
    /// Stamp of the last none-held to some-held transition, or
    /// [`stamp::UNSET`] when no button is held.
    any_pressed_at: u64,
    last_x: f64,
    last_y: f64,
}

impl Default for PointerState {
    fn default() -> Self {
        Self::new()
    }
}

impl PointerState {
    pub fn new() -> Self {
        Self {
            buttons: Vec::new(),
            any_pressed_at: stamp::UNSET,
            last_x: 0.0,
            last_y: 0.0,
        }
    }

    pub fn is_button_pressed(&self, button: i32) -> bool {
        self.buttons.contains(&button)
    }

    pub fn any_pressed(&self) -> bool {
        !self.buttons.is_empty()
    }

    pub fn any_pressed_at(&self) -> u64 {
        self.any_pressed_at
    }

    /// The last known pointer position.
    pub fn position(&self) -> (f64, f64) {
        (self.last_x, self.last_y)
    }

    /// Records pointer motion.
    pub fn motion(&mut self, x: f64, y: f64) {
        self.last_x = x;
        self.last_y = y;
    }

    /// Records a button press. Returns `None` if the button is already held
    /// (a press without release, which is ignored).
    pub fn press(&mut self, button: i32, x: f64, y: f64) -> Option<ButtonChange> {
        self.motion(x, y);
        if self.is_button_pressed(button) {
            return None;
        }
        let was_any_pressed = self.any_pressed();
        self.buttons.push(button);
        if !was_any_pressed {
            self.any_pressed_at = stamp::unique();
        }
        Some(ButtonChange {
            was_any_pressed,
            any_pressed: true,
        })
    }

    /// Records a button release. Returns `None` for an orphan release.
    ///
    /// The grab stamp survives until [`settle`] so that the release itself is
    /// still routed to the listeners of the grab.
    ///
    /// [`settle`]: Self::settle
    pub fn release(&mut self, button: i32, x: f64, y: f64) -> Option<ButtonChange> {
        self.motion(x, y);
        let idx = self.buttons.iter().position(|b| *b == button)?;
        self.buttons.swap_remove(idx);
        Some(ButtonChange {
            was_any_pressed: true,
            any_pressed: self.any_pressed(),
        })
    }

    /// Ends the grab if no button is held anymore.
    pub fn settle(&mut self) {
        if self.buttons.is_empty() {
            self.any_pressed_at = stamp::UNSET;
        }
    }

    /// A copy of the held buttons.
    pub fn snapshot(&self) -> Vec<i32> {
        self.buttons.clone()
    }

    pub fn clear(&mut self) {
        self.buttons.clear();
        self.any_pressed_at = stamp::UNSET;
    }
}
