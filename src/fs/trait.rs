use anyhow::Result;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Dir,
    /// Symlinks to nothing, sockets and the like
    Other,
}

/// One child of a listed directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub path: PathBuf,
    pub kind: EntryKind,
}

impl Entry {
    pub fn new(path: PathBuf, kind: EntryKind) -> Self {
        Self { path, kind }
    }

    /// Last path component, lossily converted
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Dir
    }

    pub fn into_path(self) -> PathBuf {
        self.path
    }
}

/// Everything the resolvers need from a build or deps directory.
///
/// Errors carry the offending path as context.
pub trait FileSystem: Send + Sync {
    fn exists(&self, path: &Path) -> bool;

    fn is_dir(&self, path: &Path) -> bool;

    fn is_file(&self, path: &Path) -> bool;

    fn read_to_string(&self, path: &Path) -> Result<String>;

    /// Direct children of `dir`, in no guaranteed order
    fn list_dir(&self, dir: &Path) -> Result<Vec<Entry>>;

    /// Every regular file below `root`, sorted by path.
    ///
    /// A directory for which `prune` is true is skipped with its subtree.
    /// `root` is never pruned.
    fn walk_files(&self, root: &Path, prune: &dyn Fn(&Path) -> bool) -> Result<Vec<PathBuf>>;

    /// chmod 0755
    fn set_executable(&self, path: &Path) -> Result<()>;
}
