//! The device files a [`HotplugWatcher`] looks after.
//!
//! [`HotplugWatcher`]: super::HotplugWatcher

use ::std::collections::BTreeSet;
use ::std::path::{Path, PathBuf};

use crate::{
    config::HotplugConfig,
    errors::{Context, ErrorKind, Result},
};

/// Base path of the numbered joystick device files of the Linux joystick API.
pub const DEFAULT_BASE_NR_FILE: &str = "/dev/input/js";

/// A file name within a watched directory.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct DirEntry {
    dir: PathBuf,
    name: String,
}

/// Device files watched either by exact path or by "numbered" base path:
/// the base `/dev/input/js` matches `/dev/input/js0`, `/dev/input/js12` and
/// so on.
///
/// ```
/// use ::inroute::hotplug::DeviceFiles;
/// use ::std::path::Path;
///
/// let mut files = DeviceFiles::new();
/// files.add_base_nr_file("/dev/input/js").unwrap();
///
/// assert!(files.matches(Path::new("/dev/input/js3")));
/// assert!(!files.matches(Path::new("/dev/input/js")));
/// assert!(!files.matches(Path::new("/dev/input/event3")));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DeviceFiles {
    files: BTreeSet<DirEntry>,
    bases: BTreeSet<DirEntry>,
}

impl DeviceFiles {
    pub fn new() -> Self {
        Self::default()
    }

    /// The files of a hot-plug configuration. If it names no file at all
    /// the numbered joystick files are watched.
    pub fn from_config(config: &HotplugConfig) -> Result<Self> {
        let mut files = Self::new();
        for path in &config.files {
            files.add_file(path)?;
        }
        for path in &config.base_nr_files {
            files.add_base_nr_file(path)?;
        }
        if files.is_empty() {
            files.add_base_nr_file(DEFAULT_BASE_NR_FILE)?;
        }
        Ok(files)
    }

    /// Watches a single device file.
    pub fn add_file(&mut self, path: &str) -> Result<()> {
        let entry = split(path).operation("DeviceFiles::add_file")?;
        self.files.insert(entry);
        Ok(())
    }

    /// Watches the device files named like `path` followed by a number.
    pub fn add_base_nr_file(&mut self, path: &str) -> Result<()> {
        let entry = split(path).operation("DeviceFiles::add_base_nr_file")?;
        self.bases.insert(entry);
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.bases.is_empty()
    }

    /// The directories which contain watched files.
    pub fn directories(&self) -> BTreeSet<PathBuf> {
        self.files
            .iter()
            .chain(&self.bases)
            .map(|e| e.dir.clone())
            .collect()
    }

    /// Whether `path` is one of the watched device files.
    pub fn matches(&self, path: &Path) -> bool {
        let (Some(dir), Some(name)) = (path.parent(), path.file_name().and_then(|n| n.to_str()))
        else {
            return false;
        };

        let in_dir = |e: &&DirEntry| e.dir == dir;
        self.files.iter().filter(in_dir).any(|e| e.name == name)
            || self.bases.iter().filter(in_dir).any(|e| {
                name.strip_prefix(e.name.as_str())
                    .map_or(false, |nr| !nr.is_empty() && nr.bytes().all(|b| b.is_ascii_digit()))
            })
    }
}

/// Cleans a device file path and splits it into directory and file name.
///
/// One trailing slash is tolerated, more are not. The path must be absolute
/// and name a file below some directory.
fn split(path: &str) -> Result<DirEntry> {
    let invalid = || {
        Err(ErrorKind::InvalidDevicePath(path.to_owned()))
            .context("Failed to add hot-plug device file")
    };

    let trimmed = path.strip_suffix('/').unwrap_or(path);
    if trimmed.ends_with('/') || !trimmed.starts_with('/') {
        return invalid();
    }
    let Some((dir, name)) = trimmed.rsplit_once('/') else {
        return invalid();
    };
    if name.is_empty() {
        return invalid();
    }
    let dir = if dir.is_empty() { "/" } else { dir };

    Ok(DirEntry {
        dir: PathBuf::from(dir),
        name: name.to_owned(),
    })
}
