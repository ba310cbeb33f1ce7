//! Conditions under which a listener is called.

use ::std::fmt;
use ::std::rc::Rc;

use crate::{
    device::DeviceId,
    event::{CapabilityClass, Event, EventClass},
};

/// Decides which events a listener receives. The filter is applied after the
/// routing rules, so a listener never sees more than the unfiltered
/// registration would.
///
/// ```
/// use ::inroute::{event::EventClass, listener::Filter};
///
/// let keys_and_buttons = Filter::classes([EventClass::Key, EventClass::JoystickButton]);
/// let anything_but_axes = Filter::Not(Box::new(Filter::EventClass(EventClass::JoystickAxis)));
/// # let _ = (keys_and_buttons, anything_but_axes);
/// ```
#[derive(Clone)]
pub enum Filter {
    All,
    EventClass(EventClass),
    Capability(CapabilityClass),
    Device(DeviceId),
    AnyOf(Vec<Filter>),
    AllOf(Vec<Filter>),
    Not(Box<Filter>),
    Custom(Rc<dyn Fn(&Event) -> bool>),
}

impl Filter {
    /// Accepts events of any of the given classes.
    pub fn classes(classes: impl IntoIterator<Item = EventClass>) -> Self {
        Self::AnyOf(classes.into_iter().map(Self::EventClass).collect())
    }

    pub fn accepts(&self, event: &Event) -> bool {
        match self {
            Self::All => true,
            Self::EventClass(class) => event.class() == *class,
            Self::Capability(capability) => event.capability == *capability,
            Self::Device(device) => event.device == *device,
            Self::AnyOf(filters) => filters.iter().any(|f| f.accepts(event)),
            Self::AllOf(filters) => filters.iter().all(|f| f.accepts(event)),
            Self::Not(filter) => !filter.accepts(event),
            Self::Custom(pred) => pred(event),
        }
    }
}

impl Default for Filter {
    fn default() -> Self {
        Self::All
    }
}

impl fmt::Debug for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("All"),
            Self::EventClass(class) => f.debug_tuple("EventClass").field(class).finish(),
            Self::Capability(cap) => f.debug_tuple("Capability").field(cap).finish(),
            Self::Device(device) => f.debug_tuple("Device").field(device).finish(),
            Self::AnyOf(filters) => f.debug_tuple("AnyOf").field(filters).finish(),
            Self::AllOf(filters) => f.debug_tuple("AllOf").field(filters).finish(),
            Self::Not(filter) => f.debug_tuple("Not").field(filter).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::{
        event::EventKind,
        input::keyboard::{HardwareKey, KeyInputType},
    };

    fn key_event(device: DeviceId) -> Event {
        Event::new(
            None,
            device,
            EventKind::Key {
                input: KeyInputType::Press,
                key: HardwareKey::ENTER,
            },
        )
    }

    #[test]
    fn test_combinators() {
        let keyboard = DeviceId::next();
        let other = DeviceId::next();
        let ev = key_event(keyboard);

        assert!(Filter::All.accepts(&ev));
        assert!(Filter::classes([EventClass::Touch, EventClass::Key]).accepts(&ev));
        assert!(!Filter::AnyOf(Vec::new()).accepts(&ev));
        assert!(Filter::Capability(CapabilityClass::Key).accepts(&ev));
        assert!(!Filter::Device(other).accepts(&ev));
        assert!(Filter::AllOf(vec![
            Filter::Device(keyboard),
            Filter::Not(Box::new(Filter::EventClass(EventClass::Pointer))),
        ])
        .accepts(&ev));
        assert!(!Filter::Custom(Rc::new(|ev: &Event| ev.is_cancel())).accepts(&ev));
    }
}
