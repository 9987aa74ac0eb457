use std::fmt;

/// 单次同步的统计信息
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncStats {
    /// 根目录创建次数（源或副本不存在时）
    pub folders_created: u64,
    pub files_copied: u64,
    /// 整体复制的目录树数量
    pub dirs_copied: u64,
    pub files_removed: u64,
    pub dirs_removed: u64,
    /// 自上次同步以来新出现的顶层条目
    pub new_items: u64,
    /// 单个条目失败的次数
    pub errors: u64,
}

impl SyncStats {
    pub fn copies(&self) -> u64 {
        self.files_copied + self.dirs_copied
    }

    pub fn removals(&self) -> u64 {
        self.files_removed + self.dirs_removed
    }

    /// 没有任何修改且没有错误
    pub fn is_clean(&self) -> bool {
        self.folders_created == 0 && self.copies() == 0 && self.removals() == 0 && self.errors == 0
    }
}

impl fmt::Display for SyncStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "created {} folders, copied {} files and {} directories, removed {} files and {} directories, {} new items, {} errors",
            self.folders_created,
            self.files_copied,
            self.dirs_copied,
            self.files_removed,
            self.dirs_removed,
            self.new_items,
            self.errors
        )
    }
}
