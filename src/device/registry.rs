//! The devices of a device manager.

use ::std::collections::BTreeMap;
use ::std::path::Path;

use super::{Device, DeviceId};
use crate::event::CapabilityClass;

/// Devices keyed by id. Ids increase with every added device, so iteration
/// follows the order in which devices were added.
#[derive(Default)]
pub(crate) struct Registry {
    devices: BTreeMap<DeviceId, Device>,
}

impl Registry {
    pub(crate) fn insert(&mut self, device: Device) {
        let prev = self.devices.insert(device.id(), device);
        debug_assert!(prev.is_none());
    }

    pub(crate) fn remove(&mut self, id: DeviceId) -> Option<Device> {
        self.devices.remove(&id)
    }

    pub(crate) fn get(&self, id: DeviceId) -> Option<&Device> {
        self.devices.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: DeviceId) -> Option<&mut Device> {
        self.devices.get_mut(&id)
    }

    pub(crate) fn ids(&self) -> Vec<DeviceId> {
        self.devices.keys().copied().collect()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Device> {
        self.devices.values()
    }

    pub(crate) fn with_capability(&self, capability: CapabilityClass) -> Vec<DeviceId> {
        self.iter()
            .filter(|d| d.info().has_capability(capability))
            .map(Device::id)
            .collect()
    }

    pub(crate) fn find_by_path(&self, path: &Path) -> Option<DeviceId> {
        self.iter()
            .find(|d| d.info().path() == Some(path))
            .map(Device::id)
    }
}
