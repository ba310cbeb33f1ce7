use ::std::fmt::{self, Display};
use ::std::num::NonZeroU32;
use ::std::sync::atomic::{AtomicU32, Ordering};
use ::tap::Pipe;

static NEXT_DEVICE_ID: AtomicU32 = AtomicU32::new(1);

/// Process-unique identifier of a device. Identifiers are never reused, not
/// even across device managers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DeviceId(NonZeroU32);

impl DeviceId {
    /// Allocates a fresh identifier.
    pub(crate) fn next() -> Self {
        NEXT_DEVICE_ID
            .fetch_add(1, Ordering::Relaxed)
            .pipe(NonZeroU32::new)
            .map_or(Self(NonZeroU32::MIN), Self)
    }

    pub fn get(self) -> u32 {
        self.0.get()
    }
}

impl Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
