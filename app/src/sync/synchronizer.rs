use std::collections::HashSet;
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use storage::{LocalStorage, Storage, StorageEntry};
use utils::error::{Error, Result};

use super::event_log::{Category, EventLog};
use super::stats::SyncStats;

/// One-way mirror of a source tree onto a replica tree.
///
/// Every call to [`Synchronizer::synchronize`] walks both trees from scratch:
/// missing or stale replica files are copied, missing directories are copied
/// whole, and replica entries without a source counterpart are removed.
/// Per-item failures are logged and skipped. Only event log write failures
/// and failures at the roots abort a pass.
pub struct Synchronizer<S: Storage = LocalStorage> {
    source: PathBuf,
    replica: PathBuf,
    log: EventLog,
    storage: S,
    track_new_items: bool,
    /// 上次同步时源根目录下的条目名称，首次同步前为空
    seen: Option<HashSet<OsString>>,
}

impl Synchronizer<LocalStorage> {
    pub fn new(source: impl Into<PathBuf>, replica: impl Into<PathBuf>, log: EventLog) -> Self {
        Self::with_storage(source, replica, log, LocalStorage::new())
    }
}

impl<S: Storage> Synchronizer<S> {
    pub fn with_storage(
        source: impl Into<PathBuf>, replica: impl Into<PathBuf>, log: EventLog, storage: S,
    ) -> Self {
        Self {
            source: source.into(),
            replica: replica.into(),
            log,
            storage,
            track_new_items: false,
            seen: None,
        }
    }

    /// Log top-level source entries that appeared since the previous pass.
    pub fn track_new_items(mut self, enabled: bool) -> Self {
        self.track_new_items = enabled;
        self
    }

    pub fn event_log(&self) -> &EventLog {
        &self.log
    }

    /// Run one full reconciliation pass.
    pub fn synchronize(&mut self) -> Result<SyncStats> {
        let mut stats = SyncStats::default();
        let source = self.source.clone();
        let replica = self.replica.clone();

        self.ensure_root(&source, &mut stats)?;
        self.ensure_root(&replica, &mut stats)?;

        // 副本快照必须在任何修改之前获取
        let snapshot = self.storage.list(&replica).map_err(|e| listing_error(&replica, e))?;
        let entries = self.storage.list(&source).map_err(|e| listing_error(&source, e))?;

        if self.track_new_items {
            self.note_new_items(&entries, &mut stats)?;
        }

        self.reconcile(&source, &replica, entries, snapshot, &mut stats)?;

        log::debug!("Synchronized {} -> {}: {}", source.display(), replica.display(), stats);
        Ok(stats)
    }

    fn ensure_root(&mut self, root: &Path, stats: &mut SyncStats) -> Result<()> {
        if self.storage.exists(root) {
            return Ok(());
        }

        self.storage.create_dir_all(root).map_err(|e| {
            Error::with_source(&format!("Failed to create folder {}", root.display()), Box::new(e))
        })?;
        stats.folders_created += 1;
        self.log.log(&format!("Folder created: {}", root.display()), Category::Creation)
    }

    fn note_new_items(&mut self, entries: &[StorageEntry], stats: &mut SyncStats) -> Result<()> {
        let current: HashSet<OsString> = entries.iter().map(|e| e.name.clone()).collect();

        if let Some(previous) = self.seen.take() {
            for entry in entries.iter().filter(|e| !previous.contains(&e.name)) {
                stats.new_items += 1;
                self.log.log(
                    &format!("New item detected: {}", entry.path.display()),
                    Category::NewItem,
                )?;
            }
        }

        self.seen = Some(current);
        Ok(())
    }

    /// Recurse into a directory present on both sides.
    fn reconcile_dir(&mut self, src: &Path, dest: &Path, stats: &mut SyncStats) -> Result<()> {
        let snapshot = match self.storage.list(dest) {
            Ok(entries) => entries,
            Err(e) => return self.read_error(dest, e, stats),
        };
        let entries = match self.storage.list(src) {
            Ok(entries) => entries,
            Err(e) => return self.read_error(src, e, stats),
        };

        self.reconcile(src, dest, entries, snapshot, stats)
    }

    fn reconcile(
        &mut self, src: &Path, dest: &Path, entries: Vec<StorageEntry>, snapshot: Vec<StorageEntry>,
        stats: &mut SyncStats,
    ) -> Result<()> {
        for entry in entries {
            let target = dest.join(&entry.name);

            if entry.is_dir {
                if self.storage.exists(&target) {
                    self.reconcile_dir(&entry.path, &target, stats)?;
                } else {
                    self.copy_dir(&entry.path, &target, stats)?;
                }
            } else {
                self.copy_file(&entry.path, &target, stats)?;
            }
        }

        for orphan in snapshot {
            if self.storage.exists(&src.join(&orphan.name)) {
                continue;
            }
            self.remove(&orphan, stats)?;
        }

        Ok(())
    }

    fn copy_dir(&mut self, src: &Path, dest: &Path, stats: &mut SyncStats) -> Result<()> {
        match self.storage.copy_tree(src, dest) {
            Ok(()) => {
                stats.dirs_copied += 1;
                self.log.log(
                    &format!("Copied directory: {} to {}", src.display(), dest.display()),
                    Category::Copy,
                )
            }
            Err(e) => {
                stats.errors += 1;
                self.log.log(
                    &format!("Error copying directory {}: {}", src.display(), e),
                    Category::Error,
                )
            }
        }
    }

    fn copy_file(&mut self, src: &Path, dest: &Path, stats: &mut SyncStats) -> Result<()> {
        match self.copy_if_stale(src, dest) {
            Ok(false) => Ok(()),
            Ok(true) => {
                stats.files_copied += 1;
                self.log.log(
                    &format!("Copied file: {} to {}", src.display(), dest.display()),
                    Category::Copy,
                )
            }
            Err(e) => {
                stats.errors += 1;
                self.log
                    .log(&format!("Error copying file {}: {}", src.display(), e), Category::Error)
            }
        }
    }

    /// Copy when the replica is missing or strictly older. Equal mtimes never copy.
    fn copy_if_stale(&self, src: &Path, dest: &Path) -> io::Result<bool> {
        if self.storage.exists(dest) && self.storage.modified(src)? <= self.storage.modified(dest)? {
            return Ok(false);
        }

        self.storage.copy_file(src, dest)?;
        Ok(true)
    }

    fn remove(&mut self, orphan: &StorageEntry, stats: &mut SyncStats) -> Result<()> {
        let path = &orphan.path;
        let outcome = if orphan.is_dir {
            self.storage.remove_tree(path)
        } else {
            self.storage.remove_file(path)
        };

        match outcome {
            Ok(()) if orphan.is_dir => {
                stats.dirs_removed += 1;
                self.log.log(&format!("Removed directory: {}", path.display()), Category::Removal)
            }
            Ok(()) => {
                stats.files_removed += 1;
                self.log.log(&format!("Removed file: {}", path.display()), Category::Removal)
            }
            Err(e) => {
                stats.errors += 1;
                self.log.log(&format!("Error removing {}: {}", path.display(), e), Category::Error)
            }
        }
    }

    fn read_error(&mut self, dir: &Path, e: io::Error, stats: &mut SyncStats) -> Result<()> {
        stats.errors += 1;
        self.log.log(&format!("Error reading directory {}: {}", dir.display(), e), Category::Error)
    }
}

fn listing_error(dir: &Path, e: io::Error) -> Error {
    Error::with_source(&format!("Failed to list {}", dir.display()), Box::new(e))
}
