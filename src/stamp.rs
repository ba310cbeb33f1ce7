//! Process-wide logical clock.
//!
//! Every "pressed-at", "sequence-started-at" and "listener-added-at" value in
//! the crate is drawn from this one counter, so comparing two stamps always
//! tells which of the two things happened first, regardless of which device
//! manager or device produced them.

use ::std::sync::atomic::{AtomicU64, Ordering};

/// Marker for "no stamp": a primitive that is not held, or a class that was
/// never enabled. It compares greater than every stamp ever handed out.
pub const UNSET: u64 = u64::MAX;

static NEXT_STAMP: AtomicU64 = AtomicU64::new(1);

/// Returns a new stamp, strictly greater than every stamp returned before.
pub fn unique() -> u64 {
    NEXT_STAMP.fetch_add(1, Ordering::Relaxed)
}
