//! In-memory filesystem implementation.
//!
//! Provides a read-only (once handed out) virtual filesystem whose structure
//! lives entirely in memory. Used for synthesized module images and as the
//! natural test double for traversal code.
//!
//! # Examples
//!
//! ```
//! use jrt_core::{FsAddress, FsPath, VirtualFileSystem};
//! use jrt_fs::MemoryFileSystem;
//!
//! let mut fs = MemoryFileSystem::new(FsAddress::new("mem", "/"));
//! fs.add_dir("/packages/java.lang/java.base").unwrap();
//!
//! let packages = fs.list(&FsPath::new("/packages").unwrap()).unwrap();
//! assert_eq!(packages.len(), 1);
//! ```

use crate::tree::{EntryKind, EntryTree};
use jrt_core::{Error, FsAddress, FsHandle, FsPath, Result, VirtualFileSystem};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// An in-memory virtual filesystem.
///
/// Structure is mutated through `&mut self` while it is being assembled.
/// Once converted into an [`FsHandle`] it is only read.
///
/// # Thread Safety
///
/// This type is `Send` and `Sync`, making it safe to traverse from several
/// threads at once.
#[derive(Debug)]
pub struct MemoryFileSystem {
    address: FsAddress,
    tree: EntryTree,
    open: AtomicBool,
}

impl MemoryFileSystem {
    /// Creates a new empty filesystem at the given address.
    #[must_use]
    pub fn new(address: FsAddress) -> Self {
        Self::from_tree(address, EntryTree::new())
    }

    /// Wraps an already assembled tree.
    #[must_use]
    pub const fn from_tree(address: FsAddress, tree: EntryTree) -> Self {
        Self {
            address,
            tree,
            open: AtomicBool::new(true),
        }
    }

    /// Adds a file and any missing parent directories.
    ///
    /// Adding an existing file is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is invalid (not absolute, contains
    /// `..`, etc.) or collides with an existing entry of the other kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use jrt_core::FsAddress;
    /// use jrt_fs::MemoryFileSystem;
    ///
    /// let mut fs = MemoryFileSystem::new(FsAddress::new("mem", "/"));
    /// fs.add_file("/modules/java.base/java/lang/Object.class")?;
    ///
    /// assert!(fs.exists("/modules/java.base/java/lang"));
    /// assert_eq!(fs.file_count(), 1);
    /// # Ok::<(), jrt_core::Error>(())
    /// ```
    pub fn add_file(&mut self, path: impl AsRef<str>) -> Result<()> {
        let path = FsPath::new(path)?;
        self.tree.insert_file(&path)?;
        Ok(())
    }

    /// Adds a directory and any missing parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is invalid or an ancestor is a file.
    pub fn add_dir(&mut self, path: impl AsRef<str>) -> Result<()> {
        let path = FsPath::new(path)?;
        self.tree.insert_dir(&path)?;
        Ok(())
    }

    /// Checks if an entry exists at the given path.
    ///
    /// Returns `false` if the path is invalid.
    #[must_use]
    pub fn exists(&self, path: impl AsRef<str>) -> bool {
        FsPath::new(path).is_ok_and(|p| self.tree.contains(&p))
    }

    /// Returns the number of files.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.tree.file_count()
    }

    /// Returns the number of directories, including the root.
    #[must_use]
    pub fn dir_count(&self) -> usize {
        self.tree.dir_count()
    }

    /// Converts the filesystem into a shared handle.
    #[must_use]
    pub fn into_handle(self) -> FsHandle {
        Arc::new(self)
    }

    fn ensure_open(&self) -> Result<()> {
        if self.is_open() {
            Ok(())
        } else {
            Err(Error::FileSystemClosed {
                address: self.address.to_string(),
            })
        }
    }
}

impl VirtualFileSystem for MemoryFileSystem {
    fn address(&self) -> &FsAddress {
        &self.address
    }

    fn list(&self, dir: &FsPath) -> Result<Vec<FsPath>> {
        self.ensure_open()?;
        self.tree.list(dir)
    }

    fn is_dir(&self, path: &FsPath) -> bool {
        self.is_open() && self.tree.kind(path) == Some(EntryKind::Directory)
    }

    fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire)
    }

    fn close(&self) -> Result<()> {
        if self.open.swap(false, Ordering::AcqRel) {
            tracing::debug!("Closed in-memory filesystem {}", self.address);
            Ok(())
        } else {
            Err(Error::FileSystemClosed {
                address: self.address.to_string(),
            })
        }
    }
}
