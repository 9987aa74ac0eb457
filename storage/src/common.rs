use std::ffi::OsString;
use std::path::PathBuf;

/// 目录中的一个直接子条目
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageEntry {
    /// 条目名称（相对于父目录）
    pub name: OsString,
    /// 完整路径
    pub path: PathBuf,
    /// 是否为目录（跟随符号链接）
    pub is_dir: bool,
}

