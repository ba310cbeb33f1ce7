//! Pointer, scroll and touch event payloads.

/// The type of a pointer event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointerInputType {
    /// Motion with no button held.
    Hover,
    /// Motion with at least one button held.
    Move,
    ButtonPress,
    ButtonRelease,
    /// Synthesized release of a button whose real release can no longer be
    /// delivered.
    ButtonReleaseCancel,
}

/// Direction of a wheel scroll step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScrollDirection {
    Up,
    Down,
    Left,
    Right,
}

/// The type of a touch event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TouchInputType {
    Begin,
    Update,
    End,
    Cancel,
}

/// A raw pointer button sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ButtonSample {
    Press,
    Release,
}
