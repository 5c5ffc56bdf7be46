use std::future::Future;
use std::path::{Path, PathBuf};

use crate::error::{AppError, Result};
use crate::explorer::model::TreeNode;

/// The two async loads the panel consumes: the full snapshot and the
/// project display name. Implementations are cloned into spawned tasks, so
/// the returned futures must be `Send`.
pub trait ProjectSource: Clone + Send + Sync + 'static {
    fn load_snapshot(&self) -> impl Future<Output = Result<TreeNode>> + Send;
    fn load_project_name(&self) -> impl Future<Output = Result<String>> + Send;
}

/// Snapshot source backed by the local filesystem.
///
/// Reads names and kinds only, never file contents. Node ids are paths
/// relative to the root (`"src"`, `"src/main.rs"`), so they stay stable
/// across reloads for unchanged paths. Hidden entries (dot-prefixed) are
/// skipped; symlinks are listed but never followed.
#[derive(Debug, Clone)]
pub struct FsSource {
    root: PathBuf,
    show_hidden: bool,
}

impl FsSource {
    pub fn new(root: PathBuf, show_hidden: bool) -> Self {
        Self { root, show_hidden }
    }

    fn root_name(&self) -> Result<String> {
        self.root
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .ok_or_else(|| AppError::InvalidPath(self.root.display().to_string()))
    }

    /// Read one directory level into child nodes, recursing into
    /// subdirectories. Unreadable entries are silently skipped.
    fn read_children(&self, dir: &Path, id_prefix: &str) -> Result<Vec<TreeNode>> {
        let mut children = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let entry = match entry {
                Ok(e) => e,
                Err(_) => continue,
            };
            let name = entry.file_name().to_string_lossy().to_string();
            if !self.show_hidden && name.starts_with('.') {
                continue;
            }
            let id = if id_prefix.is_empty() {
                name.clone()
            } else {
                format!("{id_prefix}/{name}")
            };
            let meta = match std::fs::symlink_metadata(entry.path()) {
                Ok(m) => m,
                Err(_) => continue,
            };
            if meta.is_dir() {
                let grandchildren = self.read_children(&entry.path(), &id).unwrap_or_default();
                children.push(TreeNode::directory(id, name, grandchildren));
            } else {
                children.push(TreeNode::file(id, name));
            }
        }
        sort_children(&mut children);
        Ok(children)
    }
}

/// Display order: directories first, then case-insensitive name.
fn sort_children(children: &mut [TreeNode]) {
    children.sort_by(|a, b| {
        b.is_directory
            .cmp(&a.is_directory)
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
    });
}

impl ProjectSource for FsSource {
    async fn load_snapshot(&self) -> Result<TreeNode> {
        let children = self.read_children(&self.root, "")?;
        Ok(TreeNode::root(
            self.root_name()?,
            Some(self.root.display().to_string()),
            children,
        ))
    }

    async fn load_project_name(&self) -> Result<String> {
        self.root_name()
    }
}
