use super::{Entry, EntryKind, FileSystem};
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// [`FileSystem`] backed by the local disk
#[derive(Debug, Default, Clone, Copy)]
pub struct RealFileSystem;

impl RealFileSystem {
    pub fn new() -> Self {
        Self
    }
}

impl FileSystem for RealFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))
    }

    fn list_dir(&self, dir: &Path) -> Result<Vec<Entry>> {
        fs::read_dir(dir)
            .with_context(|| format!("Failed to list {:?}", dir))?
            .map(|entry| -> Result<Entry> {
                let entry = entry.with_context(|| format!("Failed to list {:?}", dir))?;
                // Follow symlinks so a linked package version still counts as a dir
                let path = entry.path();
                let kind = if path.is_dir() {
                    EntryKind::Dir
                } else if path.is_file() {
                    EntryKind::File
                } else {
                    EntryKind::Other
                };
                Ok(Entry::new(path, kind))
            })
            .collect()
    }

    fn walk_files(&self, root: &Path, prune: &dyn Fn(&Path) -> bool) -> Result<Vec<PathBuf>> {
        let walker = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !e.file_type().is_dir() || !prune(e.path()));

        let mut files = Vec::new();
        for entry in walker {
            let entry = entry.with_context(|| format!("Failed to walk {:?}", root))?;
            if entry.file_type().is_file() {
                files.push(entry.into_path());
            }
        }
        Ok(files)
    }

    #[cfg(unix)]
    fn set_executable(&self, path: &Path) -> Result<()> {
        use std::os::unix::fs::PermissionsExt;

        fs::set_permissions(path, fs::Permissions::from_mode(0o755))
            .with_context(|| format!("Failed to make {:?} executable", path))
    }

    #[cfg(not(unix))]
    fn set_executable(&self, _path: &Path) -> Result<()> {
        Ok(())
    }
}
