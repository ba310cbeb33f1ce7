//! Hot-plugging of joystick device files.
//!
//! A [`HotplugWatcher`] follows a set of device files. Files which exist
//! when it starts are probed once by [`enumerate`]. A file created later is
//! usually not ready to be opened right away, so it is probed again and
//! again at a fixed interval until it turns out to be a joystick or a
//! maximum time has passed. Deleting a file removes its device.
//!
//! The watcher never blocks: the application's event loop calls [`poll`]
//! whenever the watch source may have events, or [`next_deadline`] is
//! reached.
//!
//! [`enumerate`]: HotplugWatcher::enumerate
//! [`poll`]: HotplugWatcher::poll
//! [`next_deadline`]: HotplugWatcher::next_deadline

mod files;
mod probe;
mod reader;
mod watch;

pub use files::{DeviceFiles, DEFAULT_BASE_NR_FILE};
#[cfg(target_os = "linux")]
pub use probe::JsProbe;
pub use probe::{Probe, ProbedJoystick};
pub use reader::{decode_js_event, read_samples, JS_EVENT_SIZE};
pub use watch::{FileEvent, FileEventKind, FileWatchSource, NotifyWatchSource, QueuedWatchSource};

use ::std::collections::BTreeMap;
use ::std::fs::{self, File};
use ::std::path::{Path, PathBuf};
use ::std::time::{Duration, Instant};
use ::tracing::{debug, trace, warn};

use crate::{
    config::HotplugConfig,
    device::{DeviceDescriptor, DeviceId},
    errors::Result,
    input::joystick::JoystickLayout,
    manager::DeviceManager,
};

/// A created device file waiting to become probeable.
#[derive(Clone, Copy, Debug)]
struct Pending {
    created_at: Instant,
    next_at: Instant,
}

/// A device added by the watcher.
struct Plugged {
    device: DeviceId,
    rdev: u64,
    file: Option<File>,
}

/// Adds and removes the joystick devices of a [`DeviceManager`] as their
/// device files come and go.
pub struct HotplugWatcher<S, P> {
    files: DeviceFiles,
    source: S,
    probe: P,
    retry_interval: Duration,
    retry_max: Duration,
    pending: BTreeMap<PathBuf, Pending>,
    plugged: BTreeMap<PathBuf, Plugged>,
}

#[cfg(target_os = "linux")]
impl HotplugWatcher<NotifyWatchSource, JsProbe> {
    /// Watches the joystick device files of a configuration.
    ///
    /// Fails on malformed paths or if no file watcher can be created at all.
    /// A directory which can't be watched (e.g. because it doesn't exist) is
    /// skipped: its files are neither enumerated nor hot-plugged.
    pub fn from_config(config: &HotplugConfig) -> Result<Self> {
        let files = DeviceFiles::from_config(config)?;
        let mut source = NotifyWatchSource::new()?;
        for dir in files.directories() {
            if let Err(err) = source.watch(&dir) {
                warn!(dir = %dir.display(), %err, "Hot-plug disabled for directory");
            }
        }

        Ok(Self::new(
            files,
            source,
            JsProbe,
            config.retry_interval(),
            config.retry_max(),
        ))
    }
}

impl<S, P> HotplugWatcher<S, P>
where
    S: FileWatchSource,
    P: Probe,
{
    pub fn new(
        files: DeviceFiles,
        source: S,
        probe: P,
        retry_interval: Duration,
        retry_max: Duration,
    ) -> Self {
        Self {
            files,
            source,
            probe,
            retry_interval,
            retry_max,
            pending: BTreeMap::new(),
            plugged: BTreeMap::new(),
        }
    }

    pub fn files(&self) -> &DeviceFiles {
        &self.files
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Whether a created device file is still waiting to be probed.
    pub fn is_pending(&self, path: &Path) -> bool {
        self.pending.contains_key(path)
    }

    /// Probes the watched files which already exist, once. Returns the
    /// number of devices added.
    pub fn enumerate(&mut self, manager: &DeviceManager) -> usize {
        let mut paths = Vec::new();
        for dir in self.files.directories() {
            let entries = match fs::read_dir(&dir) {
                Ok(entries) => entries,
                Err(err) => {
                    debug!(dir = %dir.display(), %err, "Can't list device directory");
                    continue;
                }
            };
            paths.extend(
                entries
                    .filter_map(|e| e.ok())
                    .map(|e| e.path())
                    .filter(|p| self.files.matches(p)),
            );
        }
        paths.sort();

        let before = self.plugged.len();
        for path in paths {
            self.try_add(manager, &path);
        }
        self.plugged.len().saturating_sub(before)
    }

    /// Reacts to a file event. Creation schedules probing, deletion removes
    /// the device of the file, cancelling whatever is held on it.
    pub fn handle_file_event(&mut self, manager: &DeviceManager, event: &FileEvent, now: Instant) {
        if !self.files.matches(&event.path) {
            trace!(path = %event.path.display(), "Ignoring unwatched file");
            return;
        }

        match event.kind {
            FileEventKind::Created => {
                debug!(path = %event.path.display(), "Device file created");
                self.pending.entry(event.path.clone()).or_insert(Pending {
                    created_at: now,
                    next_at: now + self.retry_interval,
                });
            }
            FileEventKind::Deleted => {
                self.pending.remove(&event.path);
                self.plugged.remove(&event.path);
                if let Some(id) = manager.find_device_by_path(&event.path) {
                    debug!(path = %event.path.display(), device = %id, "Device file deleted");
                    manager.remove_device(id);
                }
            }
        }
    }

    /// Handles the source's file events, probes the pending files which are
    /// due and forwards the raw samples of the plugged devices.
    pub fn poll(&mut self, manager: &DeviceManager, now: Instant) {
        for event in self.source.poll_events() {
            self.handle_file_event(manager, &event, now);
        }
        self.retry_due(manager, now);
        self.read_input(manager);
    }

    /// When the next pending file is to be probed.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.values().map(|p| p.next_at).min()
    }

    fn retry_due(&mut self, manager: &DeviceManager, now: Instant) {
        let due = self
            .pending
            .iter()
            .filter(|(_, p)| p.next_at <= now)
            .map(|(path, _)| path.clone())
            .collect::<Vec<_>>();

        for path in due {
            let Some(pending) = self.pending.get(&path).copied() else {
                continue;
            };
            if self.try_add(manager, &path) {
                self.pending.remove(&path);
                continue;
            }

            let elapsed = pending.next_at.saturating_duration_since(pending.created_at);
            if elapsed > self.retry_max || self.retry_interval.is_zero() {
                debug!(path = %path.display(), ?elapsed, "Giving up on device file");
                self.pending.remove(&path);
            } else if let Some(pending) = self.pending.get_mut(&path) {
                pending.next_at += self.retry_interval;
            }
        }
    }

    /// Probes a file and adds its device. Returns `true` if there is nothing
    /// left to do for the file.
    fn try_add(&mut self, manager: &DeviceManager, path: &Path) -> bool {
        if manager.find_device_by_path(path).is_some() {
            return true;
        }
        let ProbedJoystick {
            name,
            rdev,
            buttons,
            axes,
            file,
        } = match self.probe.probe(path) {
            Ok(probed) => probed,
            Err(err) => {
                debug!(path = %path.display(), %err, "Probing device file failed");
                return false;
            }
        };

        self.plugged
            .retain(|_, plugged| manager.get_device(plugged.device).is_some());
        if let Some((other, _)) = self.plugged.iter().find(|(_, p)| p.rdev == rdev) {
            debug!(
                path = %path.display(),
                other = %other.display(),
                "Device file names a device which is already plugged"
            );
            return true;
        }

        let layout = match JoystickLayout::new(buttons, axes) {
            Ok(layout) => layout,
            Err(err) => {
                debug!(path = %path.display(), %err, "Not a usable joystick");
                return false;
            }
        };
        let descriptor = DeviceDescriptor::new(&name)
            .with_path(path)
            .with_joystick(layout);
        let device = manager.add_device(descriptor);
        debug!(path = %path.display(), %device, %name, "Joystick plugged in");

        self.plugged
            .insert(path.to_owned(), Plugged { device, rdev, file });
        true
    }

    fn read_input(&mut self, manager: &DeviceManager) {
        let mut input = Vec::new();
        for (path, plugged) in &mut self.plugged {
            let Some(file) = plugged.file.as_mut() else {
                continue;
            };
            match read_samples(file) {
                Ok(samples) => input.extend(samples.into_iter().map(|s| (plugged.device, s))),
                Err(err) => {
                    debug!(path = %path.display(), %err, "Device file stopped reading");
                    plugged.file = None;
                }
            }
        }

        for (device, sample) in input {
            manager.joystick_input(device, sample);
        }
    }
}
