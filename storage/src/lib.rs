pub mod common;
pub mod file;

pub use common::*;
pub use file::*;

use std::io;
use std::path::Path;
use std::time::SystemTime;

/// Filesystem primitives the synchronizer is written against.
///
/// Every operation is blocking and reports failures as `io::Error` so callers
/// can decide per item whether to log and continue or to abort.
pub trait Storage {
    /// Whether anything (file, directory, followed symlink) exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Immediate children of `dir`, sorted by name.
    fn list(&self, dir: &Path) -> io::Result<Vec<StorageEntry>>;

    fn modified(&self, path: &Path) -> io::Result<SystemTime>;

    /// Copy a single file, overwriting `dest` and carrying over its timestamps.
    fn copy_file(&self, src: &Path, dest: &Path) -> io::Result<()>;

    /// Copy a whole directory tree into the not yet existing `dest`.
    fn copy_tree(&self, src: &Path, dest: &Path) -> io::Result<()>;

    fn remove_file(&self, path: &Path) -> io::Result<()>;

    fn remove_tree(&self, path: &Path) -> io::Result<()>;
}
