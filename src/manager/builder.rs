//! Builder object which constructs [`DeviceManager`]s
//!
//! [`DeviceManager`]: crate::manager::DeviceManager

use ::std::collections::HashSet;
use ::strum::EnumCount;

use crate::{
    config::{Config, RepeatPolicy},
    errors::{Context, ErrorKind, Result},
    event::EventClass,
    manager::DeviceManager,
};

/// A builder pattern object which simplifies the process of creating a
/// [`DeviceManager`].
///
/// The same builder can be re-used to create multiple managers with the same
/// configuration, as a type of prototype.
///
/// ```
/// use ::inroute::{config::RepeatPolicy, event::EventClass, manager::Builder};
///
/// let manager = Builder::new()
///     .with_repeat_policy(RepeatPolicy::AddRelease)
///     .with_disabled_classes([EventClass::JoystickAxis])
///     .build()
///     .expect("Device manager creation failed");
///
/// assert!(!manager.is_event_class_enabled(EventClass::JoystickAxis));
/// ```
///
/// [`DeviceManager`]: crate::manager::DeviceManager
#[derive(Clone, Debug)]
pub struct Builder {
    repeat_policy: Option<RepeatPolicy>,
    enable_event_classes: bool,
    event_classes: Vec<EventClass>,
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

impl Builder {
    /// Construct a new builder. Default values will be used for all properties
    /// until explicitly set.
    pub fn new() -> Self {
        Self {
            repeat_policy: None,
            enable_event_classes: false,
            event_classes: Vec::new(),
        }
    }

    /// A builder with the settings of a [`Config`].
    pub fn from_config(config: &Config) -> Self {
        Self {
            repeat_policy: Some(config.repeat_policy),
            enable_event_classes: config.enable_event_classes,
            event_classes: config.event_classes.clone(),
        }
    }

    /// Set the policy for repeated key presses.
    ///
    /// Defaults to the process-wide default if not set, see
    /// [`RepeatPolicy::set_default`].
    pub fn with_repeat_policy(self, repeat_policy: RepeatPolicy) -> Self {
        Self {
            repeat_policy: Some(repeat_policy),
            ..self
        }
    }

    /// Enable only the given event classes.
    pub fn with_enabled_classes(self, classes: impl IntoIterator<Item = EventClass>) -> Self {
        Self {
            enable_event_classes: true,
            event_classes: classes.into_iter().collect(),
            ..self
        }
    }

    /// Enable all event classes but the given ones.
    ///
    /// Defaults to all classes enabled if neither this nor
    /// [`with_enabled_classes`] is called.
    ///
    /// [`with_enabled_classes`]: Self::with_enabled_classes
    pub fn with_disabled_classes(self, classes: impl IntoIterator<Item = EventClass>) -> Self {
        Self {
            enable_event_classes: false,
            event_classes: classes.into_iter().collect(),
            ..self
        }
    }

    /// Gets the currently set repeat policy.
    pub fn repeat_policy(&self) -> Option<RepeatPolicy> {
        self.repeat_policy
    }

    /// Build a new [`DeviceManager`] with the properties of the builder.
    ///
    /// Fails if an event class is listed twice.
    ///
    /// [`DeviceManager`]: crate::manager::DeviceManager
    pub fn build(&self) -> Result<DeviceManager> {
        let mut seen = HashSet::new();
        if let Some(dup) = self.event_classes.iter().find(|c| !seen.insert(**c)) {
            return Err(ErrorKind::DuplicateEventClass(*dup))
                .context("Failed to construct device manager")
                .operation("Builder::build");
        }

        let mut enabled = [!self.enable_event_classes; EventClass::COUNT];
        for class in &self.event_classes {
            enabled[class.index()] = self.enable_event_classes;
        }

        let repeat_policy = self
            .repeat_policy
            .unwrap_or_else(RepeatPolicy::default_policy);
        Ok(DeviceManager::new(repeat_policy, enabled))
    }
}
