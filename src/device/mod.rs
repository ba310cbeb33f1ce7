//! Devices: identifiers, public descriptions and the registry holding their
//! state.

mod device;
mod id;
mod registry;

pub use device::{DeviceDescriptor, DeviceInfo};
pub use id::DeviceId;

pub(crate) use device::Device;
pub(crate) use registry::Registry;
