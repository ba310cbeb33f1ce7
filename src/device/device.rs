//! Devices and their per-capability state.

use ::std::collections::BTreeSet;
use ::std::path::{Path, PathBuf};
use ::std::rc::Rc;

use super::DeviceId;
use crate::{
    event::CapabilityClass,
    input::{
        joystick::{JoystickLayout, JoystickState},
        keyboard::KeyState,
        pointer::{PointerState, TouchState},
    },
};

/// Public description of a device, as returned by lookups and carried by
/// device management events.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeviceInfo {
    id: DeviceId,
    name: String,
    path: Option<PathBuf>,
    capabilities: BTreeSet<CapabilityClass>,
    joystick: Option<JoystickLayout>,
}

impl DeviceInfo {
    pub fn id(&self) -> DeviceId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The device file of a hot-plugged device.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn capabilities(&self) -> &BTreeSet<CapabilityClass> {
        &self.capabilities
    }

    pub fn has_capability(&self, capability: CapabilityClass) -> bool {
        self.capabilities.contains(&capability)
    }

    /// The button and axis tables of a joystick.
    pub fn joystick_layout(&self) -> Option<&JoystickLayout> {
        self.joystick.as_ref()
    }
}

/// Describes a device to be added to a device manager.
///
/// ```
/// use ::inroute::{device::DeviceDescriptor, event::CapabilityClass};
///
/// let keyboard = DeviceDescriptor::new("Built-in keyboard").with_keys();
/// assert!(keyboard.capabilities().contains(&CapabilityClass::Key));
/// ```
#[derive(Clone, Debug)]
pub struct DeviceDescriptor {
    name: String,
    path: Option<PathBuf>,
    capabilities: BTreeSet<CapabilityClass>,
    joystick: Option<JoystickLayout>,
}

impl DeviceDescriptor {
    /// A device without capabilities.
    pub fn new(name: impl AsRef<str>) -> Self {
        Self {
            name: name.as_ref().to_owned(),
            path: None,
            capabilities: BTreeSet::new(),
            joystick: None,
        }
    }

    pub fn with_path(self, path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            ..self
        }
    }

    pub fn with_keys(mut self) -> Self {
        self.capabilities.insert(CapabilityClass::Key);
        self
    }

    pub fn with_pointer(mut self) -> Self {
        self.capabilities.insert(CapabilityClass::Pointer);
        self
    }

    pub fn with_touch(mut self) -> Self {
        self.capabilities.insert(CapabilityClass::Touch);
        self
    }

    /// Adds the joystick capabilities the layout supports: buttons always,
    /// hats and axes if the layout has any.
    pub fn with_joystick(mut self, layout: JoystickLayout) -> Self {
        self.capabilities.insert(CapabilityClass::JoystickButton);
        if layout.hat_count() > 0 {
            self.capabilities.insert(CapabilityClass::JoystickHat);
        }
        if layout.axis_count() > layout.hat_count() * 2 {
            self.capabilities.insert(CapabilityClass::JoystickAxis);
        }
        Self {
            joystick: Some(layout),
            ..self
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn capabilities(&self) -> &BTreeSet<CapabilityClass> {
        &self.capabilities
    }
}

/// A device owned by a device manager's registry.
pub(crate) struct Device {
    info: Rc<DeviceInfo>,
    pub(crate) keys: Option<KeyState>,
    pub(crate) pointer: Option<PointerState>,
    pub(crate) touch: Option<TouchState>,
    pub(crate) joystick: Option<JoystickState>,
}

impl Device {
    pub(crate) fn new(id: DeviceId, descriptor: DeviceDescriptor) -> Self {
        let DeviceDescriptor {
            name,
            path,
            capabilities,
            joystick,
        } = descriptor;
        let has = |c| capabilities.contains(&c);

        Self {
            keys: has(CapabilityClass::Key).then(KeyState::new),
            pointer: has(CapabilityClass::Pointer).then(PointerState::new),
            touch: has(CapabilityClass::Touch).then(TouchState::new),
            joystick: joystick.clone().map(JoystickState::new),
            info: Rc::new(DeviceInfo {
                id,
                name,
                path,
                capabilities,
                joystick,
            }),
        }
    }

    pub(crate) fn id(&self) -> DeviceId {
        self.info.id
    }

    pub(crate) fn info(&self) -> &Rc<DeviceInfo> {
        &self.info
    }

    /// Whether any primitive of the device is held.
    pub(crate) fn any_open(&self) -> bool {
        self.keys.as_ref().map_or(false, KeyState::any_pressed)
            || self.pointer.as_ref().map_or(false, PointerState::any_pressed)
            || self.touch.as_ref().map_or(false, TouchState::any_open)
            || self.joystick.as_ref().map_or(false, |j| {
                !j.pressed_buttons().is_empty() || !j.pressed_hats().is_empty()
            })
    }
}
