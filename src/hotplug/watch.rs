//! Directory watching for device file creation and deletion.

use ::notify::{
    event::{ModifyKind, RenameMode},
    EventKind, RecommendedWatcher, RecursiveMode, Watcher as _,
};
use ::std::path::{Path, PathBuf};
use ::tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use ::tracing::{debug, trace, warn};

use crate::errors::{Context, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FileEventKind {
    Created,
    Deleted,
}

/// A file appearing in or disappearing from a watched directory.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FileEvent {
    pub path: PathBuf,
    pub kind: FileEventKind,
}

impl FileEvent {
    pub fn created(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            kind: FileEventKind::Created,
        }
    }

    pub fn deleted(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            kind: FileEventKind::Deleted,
        }
    }
}

/// A source of file events, polled from the thread driving the device
/// manager.
pub trait FileWatchSource {
    /// Returns the events which arrived since the last call, oldest first.
    /// Never blocks.
    fn poll_events(&mut self) -> Vec<FileEvent>;
}

/// Watches directories with the platform's native file watcher.
///
/// The watcher runs its own thread; its events are forwarded over a channel
/// and picked up by [`poll_events`].
///
/// [`poll_events`]: FileWatchSource::poll_events
pub struct NotifyWatchSource {
    watcher: RecommendedWatcher,
    rx: UnboundedReceiver<FileEvent>,
}

impl NotifyWatchSource {
    pub fn new() -> Result<Self> {
        let (tx, rx) = mpsc::unbounded_channel();
        let handler = move |res: ::notify::Result<::notify::Event>| forward(&tx, res);
        let watcher = ::notify::recommended_watcher(handler)
            .context("Failed to create file watcher")
            .operation("NotifyWatchSource::new")?;

        Ok(Self { watcher, rx })
    }

    /// Starts watching a directory, not recursively.
    pub fn watch(&mut self, dir: &Path) -> Result<()> {
        debug!(dir = %dir.display(), "Watching device directory");
        self.watcher
            .watch(dir, RecursiveMode::NonRecursive)
            .context(format!("Failed to watch '{}'", dir.display()))
            .operation("NotifyWatchSource::watch")
    }
}

impl FileWatchSource for NotifyWatchSource {
    fn poll_events(&mut self) -> Vec<FileEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.rx.try_recv() {
            events.push(event);
        }
        events
    }
}

/// Runs on the watcher thread.
fn forward(tx: &UnboundedSender<FileEvent>, res: ::notify::Result<::notify::Event>) {
    let event = match res {
        Ok(event) => event,
        Err(err) => {
            warn!(%err, "File watcher error");
            return;
        }
    };
    let kind = match event.kind {
        EventKind::Create(_) | EventKind::Modify(ModifyKind::Name(RenameMode::To)) => {
            FileEventKind::Created
        }
        EventKind::Remove(_) | EventKind::Modify(ModifyKind::Name(RenameMode::From)) => {
            FileEventKind::Deleted
        }
        _ => return,
    };
    for path in event.paths {
        trace!(path = %path.display(), ?kind, "File event");
        // The receiver is gone once the source is dropped.
        let _ = tx.send(FileEvent { path, kind });
    }
}

/// A [`FileWatchSource`] fed by hand.
#[derive(Debug, Default)]
pub struct QueuedWatchSource {
    queue: Vec<FileEvent>,
}

impl QueuedWatchSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: FileEvent) {
        self.queue.push(event);
    }
}

impl FileWatchSource for QueuedWatchSource {
    fn poll_events(&mut self) -> Vec<FileEvent> {
        ::std::mem::take(&mut self.queue)
    }
}
