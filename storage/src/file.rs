use filetime::FileTime;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use walkdir::WalkDir;

use crate::{Storage, StorageEntry};

/// Local filesystem storage
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorage;

impl LocalStorage {
    /// Create new local storage instance
    pub fn new() -> Self {
        Self
    }
}

/// 将源文件的访问时间和修改时间复制到目标
fn copy_times(src: &Path, dest: &Path) -> io::Result<()> {
    let metadata = fs::metadata(src)?;
    let atime = FileTime::from_last_access_time(&metadata);
    let mtime = FileTime::from_last_modification_time(&metadata);
    filetime::set_file_times(dest, atime, mtime)
}

impl Storage for LocalStorage {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }

    fn list(&self, dir: &Path) -> io::Result<Vec<StorageEntry>> {
        let mut entries = Vec::new();

        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            // 悬空的符号链接按文件处理
            let is_dir = fs::metadata(&path).map(|m| m.is_dir()).unwrap_or(false);

            entries.push(StorageEntry {
                name: entry.file_name(),
                path,
                is_dir,
            });
        }

        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    fn modified(&self, path: &Path) -> io::Result<SystemTime> {
        fs::metadata(path)?.modified()
    }

    fn copy_file(&self, src: &Path, dest: &Path) -> io::Result<()> {
        fs::copy(src, dest)?;
        copy_times(src, dest)
    }

    fn copy_tree(&self, src: &Path, dest: &Path) -> io::Result<()> {
        let mut dirs: Vec<(PathBuf, PathBuf)> = Vec::new();

        // 不跟随符号链接，避免循环
        for entry in WalkDir::new(src).follow_links(false) {
            let entry = entry?;
            let relative = entry
                .path()
                .strip_prefix(src)
                .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
            let target = dest.join(relative);
            let file_type = entry.file_type();

            if file_type.is_dir() {
                fs::create_dir_all(&target)?;
                dirs.push((entry.path().to_path_buf(), target));
            } else if file_type.is_file() || entry.path().is_file() {
                self.copy_file(entry.path(), &target)?;
            } else {
                log::debug!("Skipping unsupported entry {}", entry.path().display());
            }
        }

        // 目录时间要在内容写完之后再设置，否则会被子条目的写入刷新
        for (src_dir, dest_dir) in dirs.iter().rev() {
            copy_times(src_dir, dest_dir)?;
        }

        Ok(())
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }

    fn remove_tree(&self, path: &Path) -> io::Result<()> {
        fs::remove_dir_all(path)
    }
}
