//! Crate-specific error and result types, plus common conversions.

use ::std::fmt::{self, Display};

use crate::event::EventClass;

/// Result type returned by fallible construction-time functions.
pub type Result<T> = ::std::result::Result<T, Error>;

/// The underlying cause of an [`Error`].
#[derive(Debug, ::thiserror::Error)]
pub enum ErrorKind {
    /// Reading a file (configuration, device directory) failed.
    #[error("I/O error: {0}")]
    Io(#[from] ::std::io::Error),

    /// The directory watcher backing hot-plug detection could not be set up.
    #[error("file watch error: {0}")]
    Watch(#[from] ::notify::Error),

    /// A configuration document was not valid TOML or did not match the
    /// expected schema.
    #[error("invalid configuration: {0}")]
    ConfigParse(#[from] ::toml::de::Error),

    /// The same event class was listed twice in the enabled/disabled list.
    #[error("event class '{0}' listed more than once")]
    DuplicateEventClass(EventClass),

    /// A device file path was relative, empty or ended with more than one
    /// slash.
    #[error("invalid device file path '{0}'")]
    InvalidDevicePath(String),

    /// A joystick's button and axis tables cannot be used.
    #[error("unusable joystick layout: {0}")]
    InvalidJoystickLayout(&'static str),
}

/// Error type for functions which can fail while a device manager or one of
/// its collaborators is being constructed. Once a manager exists none of its
/// operations return errors.
///
/// The error attempts to capture as much context as possible at the point of
/// failure: the underlying cause, the operation which failed and a free-form
/// description of what was happening.
#[derive(Debug)]
pub struct Error {
    /// The underlying cause.
    kind: ErrorKind,

    /// The name of the operation which failed.
    operation: Option<&'static str>,

    /// An optional context information which describes what was happening
    /// at the time error.
    context: Option<String>,
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self {
            kind,
            operation,
            context,
        } = &self;

        if let Some(context) = context {
            write!(f, "{context}\nCaused by:\n    {kind}")?;
        } else {
            write!(f, "{kind}")?;
        }

        if let Some(operation) = operation {
            write!(f, " ({operation})")?;
        }

        Ok(())
    }
}

impl ::std::error::Error for Error {
    fn source(&self) -> Option<&(dyn ::std::error::Error + 'static)> {
        match &self.kind {
            ErrorKind::Io(err) => Some(err),
            ErrorKind::Watch(err) => Some(err),
            ErrorKind::ConfigParse(err) => Some(err),
            ErrorKind::DuplicateEventClass(_)
            | ErrorKind::InvalidDevicePath(_)
            | ErrorKind::InvalidJoystickLayout(_) => None,
        }
    }
}

impl Error {
    /// Returns the underlying cause.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// The operation which failed, if recorded.
    pub fn operation(&self) -> Option<&'static str> {
        self.operation
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Self {
            kind,
            operation: None,
            context: None,
        }
    }
}

impl From<::std::io::Error> for Error {
    fn from(err: ::std::io::Error) -> Self {
        ErrorKind::from(err).into()
    }
}

impl From<::notify::Error> for Error {
    fn from(err: ::notify::Error) -> Self {
        ErrorKind::from(err).into()
    }
}

impl From<::toml::de::Error> for Error {
    fn from(err: ::toml::de::Error) -> Self {
        ErrorKind::from(err).into()
    }
}

/// A crate-private trait which allows context information to be attached to
/// fallible types.
///
/// This is useful to attach high level context information and track which
/// particular operation failed, something that might not be obvious when
/// relying on the inner error alone.
pub(crate) trait Context<T> {
    /// Attach the name of the operation which failed to the error as
    /// additional context.
    fn operation(self, operation: &'static str) -> Result<T>
    where
        Self: Sized;

    /// Attach a context message to a fallible type and return crate error.
    fn context(self, ctx: impl AsRef<str>) -> Result<T>
    where
        Self: Sized;
}

impl<T, E> Context<T> for ::std::result::Result<T, E>
where
    E: Into<Error>,
{
    fn operation(self, operation: &'static str) -> Result<T> {
        self.map_err(|source| {
            let mut err = source.into();
            err.operation = Some(operation);
            err
        })
    }

    fn context(self, ctx: impl AsRef<str>) -> Result<T> {
        self.map_err(|source| {
            let mut err = source.into();
            err.context = Some(ctx.as_ref().to_owned());
            err
        })
    }
}
