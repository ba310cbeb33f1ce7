//! Device manager configuration.
//!
//! A manager is configured either programmatically through
//! [`manager::Builder`] or from a TOML document:
//!
//! ```toml
//! repeat-policy = "add-release-cancel"
//! enable-event-classes = false
//! event-classes = ["device-mgmt", "joystick-hat"]
//!
//! [hotplug]
//! files = ["/dev/input/js-custom"]
//! base-nr-files = ["/dev/input/js"]
//! retry-interval-ms = 1000
//! retry-max-ms = 4000
//! ```
//!
//! [`manager::Builder`]: crate::manager::Builder

use ::lazy_static::lazy_static;
use ::parking_lot::Mutex;
use ::serde::{Deserialize, Serialize};
use ::std::{fs, path::Path, time::Duration};
use ::tracing::debug;

use crate::{
    errors::{Context, Result},
    event::EventClass,
};

/// What happens when a key that is already held is reported pressed again,
/// typically by the keyboard's auto-repeat.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RepeatPolicy {
    /// The repeated press is dropped.
    Suppress,
    /// A release is generated before the repeated press.
    AddRelease,
    /// A release-cancel is generated before the repeated press.
    AddReleaseCancel,
}

lazy_static! {
    static ref DEFAULT_REPEAT_POLICY: Mutex<Option<RepeatPolicy>> = Default::default();
}

impl RepeatPolicy {
    /// Sets the process-wide default policy, used by managers whose policy
    /// was not set explicitly.
    ///
    /// The default can be set once, and only before it was first read.
    /// Returns `false` if it was already initialised.
    pub fn set_default(policy: RepeatPolicy) -> bool {
        let mut default = DEFAULT_REPEAT_POLICY.lock();
        if default.is_some() {
            return false;
        }
        debug!(?policy, "Setting default repeat policy");
        *default = Some(policy);
        true
    }

    /// The process-wide default policy. Reading it fixes it: if it was never
    /// set it becomes [`RepeatPolicy::Suppress`].
    pub fn default_policy() -> RepeatPolicy {
        *DEFAULT_REPEAT_POLICY
            .lock()
            .get_or_insert(RepeatPolicy::Suppress)
    }
}

/// Hot-plug settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct HotplugConfig {
    /// Device files watched by exact path.
    pub files: Vec<String>,
    /// Device file base paths: `/dev/input/js` matches `/dev/input/js0`,
    /// `/dev/input/js1` and so on.
    pub base_nr_files: Vec<String>,
    /// Delay between two attempts to open a newly created device file.
    pub retry_interval_ms: u64,
    /// Time after which a device file which still can't be opened is given
    /// up on.
    pub retry_max_ms: u64,
}

impl Default for HotplugConfig {
    fn default() -> Self {
        Self {
            files: Vec::new(),
            base_nr_files: vec!["/dev/input/js".to_owned()],
            retry_interval_ms: 1000,
            retry_max_ms: 4000,
        }
    }
}

impl HotplugConfig {
    pub fn retry_interval(&self) -> Duration {
        Duration::from_millis(self.retry_interval_ms)
    }

    pub fn retry_max(&self) -> Duration {
        Duration::from_millis(self.retry_max_ms)
    }
}

/// Device manager settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
    pub repeat_policy: RepeatPolicy,
    /// If `true`, `event_classes` lists the classes to enable and all others
    /// start disabled. If `false`, it lists the classes to disable.
    pub enable_event_classes: bool,
    pub event_classes: Vec<EventClass>,
    pub hotplug: HotplugConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            repeat_policy: RepeatPolicy::default_policy(),
            enable_event_classes: false,
            event_classes: Vec::new(),
            hotplug: HotplugConfig::default(),
        }
    }
}

impl Config {
    /// Parses a TOML document. Missing keys take their default value.
    pub fn from_toml_str(doc: &str) -> Result<Self> {
        ::toml::from_str(doc)
            .context("Failed to parse device manager configuration")
            .operation("Config::from_toml_str")
    }

    /// Reads and parses a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Loading configuration");
        let doc = fs::read_to_string(path)
            .context(format!("Failed to read {}", path.display()))
            .operation("Config::load")?;
        Self::from_toml_str(&doc)
    }
}
