//! Handles naming the target of routed input.

use ::std::fmt;
use ::std::rc::Rc;

use super::TargetWindow;

/// A handle to a window which can be selected as input target. Two accessors
/// are equal when they wrap the same window object.
#[derive(Clone)]
pub struct WindowAccessor(Rc<dyn TargetWindow>);

impl WindowAccessor {
    pub fn new(window: Rc<dyn TargetWindow>) -> Self {
        Self(window)
    }

    pub fn window(&self) -> &Rc<dyn TargetWindow> {
        &self.0
    }

    pub fn is_active(&self) -> bool {
        self.0.is_active()
    }

    pub fn is_deleted(&self) -> bool {
        self.0.is_deleted()
    }

    pub fn name(&self) -> &str {
        self.0.name()
    }
}

impl PartialEq for WindowAccessor {
    fn eq(&self, other: &Self) -> bool {
        ::std::ptr::eq(Rc::as_ptr(&self.0) as *const (), Rc::as_ptr(&other.0) as *const ())
    }
}

impl Eq for WindowAccessor {}

impl fmt::Debug for WindowAccessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("WindowAccessor")
            .field(&self.0.name())
            .finish()
    }
}

/// A handle belonging to some other kind of input target, e.g. the accessor
/// type of a different toolkit. Device managers never accept one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ForeignAccessor {
    pub kind: String,
}

/// The target of routed input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Accessor {
    Window(WindowAccessor),
    Foreign(ForeignAccessor),
}

impl Accessor {
    /// Wraps a window.
    pub fn window<W: TargetWindow + 'static>(window: Rc<W>) -> Self {
        Self::Window(WindowAccessor::new(window))
    }

    pub fn foreign(kind: impl AsRef<str>) -> Self {
        Self::Foreign(ForeignAccessor {
            kind: kind.as_ref().to_owned(),
        })
    }

    pub fn is_window(&self) -> bool {
        matches!(self, Self::Window(_))
    }

    pub fn as_window(&self) -> Option<&WindowAccessor> {
        match self {
            Self::Window(wnd) => Some(wnd),
            Self::Foreign(_) => None,
        }
    }
}

impl From<WindowAccessor> for Accessor {
    fn from(wnd: WindowAccessor) -> Self {
        Self::Window(wnd)
    }
}
