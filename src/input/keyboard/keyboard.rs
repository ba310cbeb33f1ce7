//! Press state tracking for the keys of a keyboard device.

use ::bitvec::prelude::*;

use super::{HardwareKey, KEY_CODE_LIMIT};
use crate::stamp;

/// Tracks which keys of one keyboard are currently held down, and since when.
///
/// The state only ever contains presses that were delivered to the currently
/// selected target. It is emptied when that target loses the selection.
pub struct KeyState {
    /// Bitfield which tracks the press state for the keyboard keys.
    pressed: BitArr!(for KEY_CODE_LIMIT, in usize, Lsb0),
    /// Pressed-at stamp per key code. Only meaningful where `pressed` is set.
    stamps: Vec<u64>,
}

impl Default for KeyState {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyState {
    /// Constructs the state of a keyboard with no key pressed.
    pub fn new() -> Self {
        Self {
            pressed: BitArray::ZERO,
            stamps: vec![stamp::UNSET; KEY_CODE_LIMIT],
        }
    }

    /// Returns `true` if the given key is currently pressed, otherwise `false`.
    pub fn is_pressed(&self, key: HardwareKey) -> bool {
        self.pressed
            .get(key.code() as usize)
            .map(|bit| *bit)
            .unwrap_or(false)
    }

    /// The stamp of the press of `key`, if held.
    pub fn pressed_at(&self, key: HardwareKey) -> Option<u64> {
        self.is_pressed(key)
            .then(|| self.stamps[key.code() as usize])
    }

    /// Records a press of `key` with a fresh stamp and returns the stamp.
    ///
    /// The key must not be pressed already: a repeated press has to be
    /// resolved by the caller (see [`RepeatPolicy`]) before calling this.
    ///
    /// [`RepeatPolicy`]: crate::config::RepeatPolicy
    pub fn press(&mut self, key: HardwareKey) -> u64 {
        debug_assert!(!self.is_pressed(key));
        let stamp = stamp::unique();
        self.pressed.set(key.code() as usize, true);
        self.stamps[key.code() as usize] = stamp;
        stamp
    }

    /// Clears the press of `key`, returning the stamp of the press. Returns
    /// `None` for an orphan release.
    pub fn release(&mut self, key: HardwareKey) -> Option<u64> {
        let stamp = self.pressed_at(key)?;
        self.pressed.set(key.code() as usize, false);
        self.stamps[key.code() as usize] = stamp::UNSET;
        Some(stamp)
    }

    /// A copy of the currently pressed keys and their stamps, in key order.
    pub fn snapshot(&self) -> Vec<(HardwareKey, u64)> {
        self.pressed
            .iter_ones()
            .map(|code| (HardwareKey::from_code(code as u16), self.stamps[code]))
            .collect()
    }

    /// Whether any key is held.
    pub fn any_pressed(&self) -> bool {
        self.pressed.any()
    }

    /// Reset all keyboard state.
    pub fn clear(&mut self) {
        self.pressed = BitArray::ZERO;
        self.stamps.fill(stamp::UNSET);
    }
}
