//! Touch sequence state.

use ::std::collections::BTreeMap;

use crate::stamp;

/// An open touch sequence.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TouchRecord {
    /// Stamp of the sequence's BEGIN.
    pub started_at: u64,
    /// Last known coordinates.
    pub x: f64,
    pub y: f64,
}

/// Tracks the open touch sequences of one touch device, keyed by the opaque
/// sequence id supplied by the window system.
#[derive(Default)]
pub struct TouchState {
    sequences: BTreeMap<u64, TouchRecord>,
}

impl TouchState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, sequence: u64) -> Option<TouchRecord> {
        self.sequences.get(&sequence).copied()
    }

    pub fn contains(&self, sequence: u64) -> bool {
        self.sequences.contains_key(&sequence)
    }

    /// Opens a sequence with a fresh start stamp and returns the stamp. Any
    /// stale record for the same id must have been taken out with [`take`]
    /// first.
    ///
    /// [`take`]: Self::take
    pub fn begin(&mut self, sequence: u64, x: f64, y: f64) -> u64 {
        let started_at = stamp::unique();
        let stale = self
            .sequences
            .insert(sequence, TouchRecord { started_at, x, y });
        debug_assert!(stale.is_none());
        started_at
    }

    /// Refreshes the coordinates of an open sequence, keeping its start stamp.
    pub fn update(&mut self, sequence: u64, x: f64, y: f64) -> Option<TouchRecord> {
        let record = self.sequences.get_mut(&sequence)?;
        record.x = x;
        record.y = y;
        Some(*record)
    }

    /// Closes a sequence, returning its record.
    pub fn take(&mut self, sequence: u64) -> Option<TouchRecord> {
        self.sequences.remove(&sequence)
    }

    /// A copy of the open sequences, in sequence id order.
    pub fn snapshot(&self) -> Vec<(u64, TouchRecord)> {
        self.sequences.iter().map(|(s, r)| (*s, *r)).collect()
    }

    pub fn any_open(&self) -> bool {
        !self.sequences.is_empty()
    }

    pub fn clear(&mut self) {
        self.sequences.clear();
    }
}
