//! Focus-aware routing of keyboard, pointer, touch and joystick input.
//!
//! A [`DeviceManager`] owns a set of input devices and a set of target
//! windows, one of which is selected at a time. Raw input fed into the
//! manager is turned into [`Event`]s for the listeners of the selected
//! target. Whenever held input can no longer be followed to its release
//! (the selection changes, a device is unplugged, a listener leaves) the
//! manager synthesizes cancellations, so that every listener sees balanced
//! press/release pairs.
//!
//! Joystick device files can be hot-plugged with a
//! [`HotplugWatcher`](hotplug::HotplugWatcher).
//!
//! [`DeviceManager`]: manager::DeviceManager
//! [`Event`]: event::Event

pub mod config;
pub mod device;
pub mod errors;
pub mod event;
pub mod hotplug;
pub mod input;
pub mod listener;
pub mod manager;
pub mod stamp;
pub mod window;
