//! Ordered directory tree shared by the concrete filesystems.
//!
//! Entries are names only. Children keep the order in which they were first
//! inserted, which becomes the listing order of the owning filesystem.

use jrt_core::{Error, FsPath, Result};
use std::collections::HashMap;

/// Kind of a tree entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// Regular file
    File,
    /// Directory
    Directory,
}

#[derive(Debug, Clone)]
struct Node {
    kind: EntryKind,
    children: Vec<FsPath>,
}

impl Node {
    const fn new(kind: EntryKind) -> Self {
        Self {
            kind,
            children: Vec::new(),
        }
    }
}

/// A hierarchy of file and directory names rooted at `/`.
///
/// # Examples
///
/// ```
/// use jrt_core::FsPath;
/// use jrt_fs::{EntryKind, EntryTree};
///
/// let mut tree = EntryTree::new();
/// tree.insert_file(&FsPath::new("/b/one")?)?;
/// tree.insert_file(&FsPath::new("/a/two")?)?;
///
/// // Insertion order, not sorted
/// let names: Vec<_> = tree
///     .list(&FsPath::root())?
///     .iter()
///     .map(|p| p.display_name().to_string())
///     .collect();
/// assert_eq!(names, vec!["b", "a"]);
/// assert_eq!(tree.kind(&FsPath::new("/a")?), Some(EntryKind::Directory));
/// # Ok::<(), jrt_core::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct EntryTree {
    nodes: HashMap<FsPath, Node>,
}

impl EntryTree {
    /// Creates a tree holding only the root directory.
    #[must_use]
    pub fn new() -> Self {
        let mut nodes = HashMap::new();
        nodes.insert(FsPath::root(), Node::new(EntryKind::Directory));
        Self { nodes }
    }

    /// Inserts a directory and any missing ancestors.
    ///
    /// Returns `true` if the directory was newly created.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotADirectory`] if the path or one of its ancestors
    /// is already a file.
    pub fn insert_dir(&mut self, path: &FsPath) -> Result<bool> {
        match self.kind(path) {
            Some(EntryKind::Directory) => return Ok(false),
            Some(EntryKind::File) => {
                return Err(Error::NotADirectory {
                    path: path.to_string(),
                });
            }
            None => {}
        }
        self.insert_new(path, EntryKind::Directory)?;
        Ok(true)
    }

    /// Inserts a file and any missing ancestor directories.
    ///
    /// Returns `true` if the file was newly created.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotADirectory`] if an ancestor is a file, or
    /// [`Error::InvalidPath`] if the path is the root or already a directory.
    pub fn insert_file(&mut self, path: &FsPath) -> Result<bool> {
        match self.kind(path) {
            Some(EntryKind::File) => return Ok(false),
            Some(EntryKind::Directory) => {
                return Err(Error::InvalidPath {
                    path: path.to_string(),
                });
            }
            None => {}
        }
        self.insert_new(path, EntryKind::File)?;
        Ok(true)
    }

    fn insert_new(&mut self, path: &FsPath, kind: EntryKind) -> Result<()> {
        // Only the root has no parent, and the root always exists.
        let Some(parent) = path.parent() else {
            return Err(Error::InvalidPath {
                path: path.to_string(),
            });
        };
        self.insert_dir(&parent)?;
        if let Some(node) = self.nodes.get_mut(&parent) {
            node.children.push(path.clone());
        }
        self.nodes.insert(path.clone(), Node::new(kind));
        Ok(())
    }

    /// Lists the immediate children of a directory in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PathNotFound`] for missing paths and
    /// [`Error::NotADirectory`] for files.
    pub fn list(&self, dir: &FsPath) -> Result<Vec<FsPath>> {
        let node = self.nodes.get(dir).ok_or_else(|| Error::PathNotFound {
            path: dir.to_string(),
        })?;
        if node.kind != EntryKind::Directory {
            return Err(Error::NotADirectory {
                path: dir.to_string(),
            });
        }
        Ok(node.children.clone())
    }

    /// Returns the kind of the entry at `path`, if any.
    #[must_use]
    pub fn kind(&self, path: &FsPath) -> Option<EntryKind> {
        self.nodes.get(path).map(|n| n.kind)
    }

    /// Returns `true` if an entry exists at `path`.
    #[must_use]
    pub fn contains(&self, path: &FsPath) -> bool {
        self.nodes.contains_key(path)
    }

    /// Number of files in the tree.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.count(EntryKind::File)
    }

    /// Number of directories in the tree, including the root.
    #[must_use]
    pub fn dir_count(&self) -> usize {
        self.count(EntryKind::Directory)
    }

    fn count(&self, kind: EntryKind) -> usize {
        self.nodes.values().filter(|n| n.kind == kind).count()
    }
}

impl Default for EntryTree {
    fn default() -> Self {
        Self::new()
    }
}
