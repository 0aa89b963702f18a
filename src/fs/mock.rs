use super::{Entry, EntryKind, FileSystem};
use anyhow::{anyhow, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

#[derive(Debug, Clone)]
enum Node {
    Dir,
    File { content: String, mode: u32 },
}

/// In-memory tree rooted at `/mock` unless told otherwise.
///
/// Relative paths given to the builder methods are joined onto the root;
/// parent directories spring into existence as needed.
#[derive(Debug)]
pub struct MockFileSystem {
    root: PathBuf,
    nodes: RwLock<BTreeMap<PathBuf, Node>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self::with_root(PathBuf::from("/mock"))
    }

    pub fn with_root(root: PathBuf) -> Self {
        Self {
            root,
            nodes: RwLock::new(BTreeMap::new()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn add_file(&self, path: impl AsRef<Path>, content: &str) {
        let path = self.resolve(path.as_ref());
        let mut nodes = self.nodes.write().unwrap_or_else(|e| e.into_inner());
        if let Some(parent) = path.parent() {
            mkdir_p(&mut nodes, parent);
        }
        nodes.insert(
            path,
            Node::File {
                content: content.to_string(),
                mode: 0o644,
            },
        );
    }

    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let path = self.resolve(path.as_ref());
        mkdir_p(&mut self.nodes.write().unwrap_or_else(|e| e.into_inner()), &path);
    }

    /// Permission bits of a file; `None` for directories and missing paths
    pub fn mode(&self, path: impl AsRef<Path>) -> Option<u32> {
        match self.node(path.as_ref())? {
            Node::File { mode, .. } => Some(mode),
            Node::Dir => None,
        }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    fn node(&self, path: &Path) -> Option<Node> {
        self.nodes
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(&self.resolve(path))
            .cloned()
    }
}

fn mkdir_p(nodes: &mut BTreeMap<PathBuf, Node>, dir: &Path) {
    for ancestor in dir.ancestors() {
        if ancestor.as_os_str().is_empty() {
            continue;
        }
        nodes.entry(ancestor.to_path_buf()).or_insert(Node::Dir);
    }
}

impl Default for MockFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystem for MockFileSystem {
    fn exists(&self, path: &Path) -> bool {
        self.node(path).is_some()
    }

    fn is_dir(&self, path: &Path) -> bool {
        matches!(self.node(path), Some(Node::Dir))
    }

    fn is_file(&self, path: &Path) -> bool {
        matches!(self.node(path), Some(Node::File { .. }))
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        match self.node(path) {
            Some(Node::File { content, .. }) => Ok(content),
            Some(Node::Dir) => Err(anyhow!("Failed to read {:?}: is a directory", path)),
            None => Err(anyhow!("Failed to read {:?}: no such file", path)),
        }
    }

    fn list_dir(&self, dir: &Path) -> Result<Vec<Entry>> {
        let dir = self.resolve(dir);
        if !self.is_dir(&dir) {
            return Err(anyhow!("Failed to list {:?}: no such directory", dir));
        }

        let nodes = self.nodes.read().unwrap_or_else(|e| e.into_inner());
        Ok(nodes
            .iter()
            .filter(|(path, _)| path.parent() == Some(dir.as_path()))
            .map(|(path, node)| {
                let kind = match node {
                    Node::Dir => EntryKind::Dir,
                    Node::File { .. } => EntryKind::File,
                };
                Entry::new(path.clone(), kind)
            })
            .collect())
    }

    fn walk_files(&self, root: &Path, prune: &dyn Fn(&Path) -> bool) -> Result<Vec<PathBuf>> {
        let root = self.resolve(root);
        if !self.is_dir(&root) {
            return Err(anyhow!("Failed to walk {:?}: no such directory", root));
        }

        let nodes = self.nodes.read().unwrap_or_else(|e| e.into_inner());
        let within = |path: &Path| path.starts_with(&root) && path != root.as_path();

        let pruned: Vec<&PathBuf> = nodes
            .iter()
            .filter(|(path, node)| matches!(node, Node::Dir) && within(path) && prune(path))
            .map(|(path, _)| path)
            .collect();

        Ok(nodes
            .iter()
            .filter(|(path, node)| matches!(node, Node::File { .. }) && within(path))
            .filter(|(path, _)| !pruned.iter().any(|dir| path.starts_with(dir)))
            .map(|(path, _)| path.clone())
            .collect())
    }

    fn set_executable(&self, path: &Path) -> Result<()> {
        let path = self.resolve(path);
        let mut nodes = self.nodes.write().unwrap_or_else(|e| e.into_inner());
        match nodes.get_mut(&path) {
            Some(Node::File { mode, .. }) => {
                *mode = 0o755;
                Ok(())
            }
            _ => Err(anyhow!("Failed to make {:?} executable: no such file", path)),
        }
    }
}
