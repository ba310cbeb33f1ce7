//! Event and capability classes.

use ::serde::{Deserialize, Serialize};
use ::strum::{Display, EnumCount, EnumIter, EnumString};

/// The class of an [`Event`]. Classes can be enabled individually on a
/// device manager; events of a disabled class are never generated.
///
/// [`Event`]: crate::event::Event
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    EnumCount,
    EnumIter,
    EnumString,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum EventClass {
    /// A device was added, removed or changed.
    DeviceMgmt,
    /// A key was pressed or released.
    Key,
    /// Pointer motion and pointer buttons.
    Pointer,
    /// Pointer wheel scrolling.
    PointerScroll,
    /// Touch sequences.
    Touch,
    /// Joystick buttons.
    JoystickButton,
    /// Joystick hats (d-pads).
    JoystickHat,
    /// Joystick analog axes.
    JoystickAxis,
}

impl EventClass {
    /// Position of the class in a dense per-class table.
    pub(crate) const fn index(self) -> usize {
        self as usize
    }

    /// The capability which produces events of this class.
    pub const fn capability(self) -> CapabilityClass {
        match self {
            Self::DeviceMgmt => CapabilityClass::DeviceMgmt,
            Self::Key => CapabilityClass::Key,
            Self::Pointer | Self::PointerScroll => CapabilityClass::Pointer,
            Self::Touch => CapabilityClass::Touch,
            Self::JoystickButton => CapabilityClass::JoystickButton,
            Self::JoystickHat => CapabilityClass::JoystickHat,
            Self::JoystickAxis => CapabilityClass::JoystickAxis,
        }
    }
}

/// A facet of a device, e.g. "has keys" or "has joystick hats".
///
/// [`CapabilityClass::DeviceMgmt`] is never exposed by a device: it is the
/// capability of the device manager itself, and the source of
/// device management events.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    EnumIter,
    EnumString,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum CapabilityClass {
    DeviceMgmt,
    Key,
    Pointer,
    Touch,
    JoystickButton,
    JoystickHat,
    JoystickAxis,
}

#[cfg(test)]
mod tests {
    use super::*;

    use ::pretty_assertions::assert_eq;
    use ::std::str::FromStr;
    use ::strum::IntoEnumIterator;

    /// Dense indices are unique and in range, so they can address a table of
    /// `EventClass::COUNT` entries.
    #[test]
    fn test_index_dense() {
        let indices = EventClass::iter().map(EventClass::index).collect::<Vec<_>>();

        assert_eq!(indices, (0..EventClass::COUNT).collect::<Vec<_>>());
    }

    #[test]
    fn test_names_round_trip() {
        for class in EventClass::iter() {
            assert_eq!(EventClass::from_str(&class.to_string()), Ok(class));
        }
        assert_eq!(EventClass::JoystickHat.to_string(), "joystick-hat");
    }

    #[test]
    fn test_scroll_comes_from_pointer() {
        assert_eq!(
            EventClass::PointerScroll.capability(),
            CapabilityClass::Pointer
        );
    }
}
