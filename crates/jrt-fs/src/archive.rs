//! Archive-backed filesystem (`jar` scheme).
//!
//! Opens a zip archive such as `lib/ct.sym` and exposes its entry names as a
//! read-only hierarchy. Only the central directory is read; entry contents
//! are never decompressed or cached.
//!
//! Children are listed in central directory order.

use crate::tree::{EntryKind, EntryTree};
use jrt_core::{
    Error, FileSystemProvider, FsAddress, FsHandle, FsPath, ProviderOptions, Result,
    VirtualFileSystem,
};
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use zip::ZipArchive;

/// A read-only filesystem over the entries of a zip archive.
#[derive(Debug)]
pub struct ArchiveFileSystem {
    address: FsAddress,
    archive: PathBuf,
    tree: EntryTree,
    open: AtomicBool,
}

impl ArchiveFileSystem {
    /// Opens the archive at `archive` and indexes its entry names.
    ///
    /// The filesystem reports `address` as its identity.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be opened and
    /// [`Error::Archive`] if it is not a readable zip archive.
    pub fn open(archive: &Path, address: FsAddress) -> Result<Self> {
        let file = File::open(archive)
            .map_err(|e| Error::io(format!("opening archive {}", archive.display()), e))?;
        let tree = index_entries(BufReader::new(file), archive)?;

        tracing::debug!(
            "Opened archive filesystem {} ({} files, {} directories)",
            address,
            tree.file_count(),
            tree.dir_count()
        );

        Ok(Self {
            address,
            archive: archive.to_path_buf(),
            tree,
            open: AtomicBool::new(true),
        })
    }

    /// Returns the archive file backing this filesystem.
    #[must_use]
    pub fn archive(&self) -> &Path {
        &self.archive
    }

    /// Returns the number of file entries.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.tree.file_count()
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

impl VirtualFileSystem for ArchiveFileSystem {
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
            tracing::debug!("Closed archive filesystem {}", self.address);
            Ok(())
        } else {
            Err(Error::FileSystemClosed {
                address: self.address.to_string(),
            })
        }
    }
}

/// Builds an entry tree from the central directory of a zip stream.
///
/// Entries whose names cannot be represented as an [`FsPath`] (empty
/// segments, `..`) are skipped with a warning.
pub(crate) fn index_entries<R: Read + Seek>(reader: R, archive: &Path) -> Result<EntryTree> {
    let zip = ZipArchive::new(reader).map_err(|e| Error::Archive {
        path: archive.to_path_buf(),
        source: Box::new(e),
    })?;

    let mut tree = EntryTree::new();
    for name in zip.file_names() {
        let Some((path, is_dir)) = entry_path(name) else {
            tracing::warn!("Skipping entry '{}' in {}", name, archive.display());
            continue;
        };
        let inserted = if is_dir {
            tree.insert_dir(&path)
        } else {
            tree.insert_file(&path)
        };
        if let Err(e) = inserted {
            tracing::warn!("Skipping entry '{}' in {}: {}", name, archive.display(), e);
        }
    }
    Ok(tree)
}

fn entry_path(name: &str) -> Option<(FsPath, bool)> {
    let is_dir = name.ends_with('/');
    let trimmed = name.trim_matches('/');
    if trimmed.is_empty() {
        return None;
    }
    FsPath::root().join(trimmed).ok().map(|p| (p, is_dir))
}

/// Provider for the `jar` scheme.
///
/// Accepts addresses whose location is `file:<encoded absolute path>`, as
/// produced by [`FsAddress::archive`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ArchiveProvider;

impl ArchiveProvider {
    /// Creates the provider.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl FileSystemProvider for ArchiveProvider {
    fn scheme(&self) -> &str {
        FsAddress::ARCHIVE_SCHEME
    }

    fn new_file_system(&self, address: &FsAddress, _options: &ProviderOptions) -> Result<FsHandle> {
        let archive = address.archive_path().ok_or_else(|| Error::InvalidPath {
            path: address.to_string(),
        })?;
        let fs = ArchiveFileSystem::open(&archive, address.clone())?;
        Ok(Arc::new(fs))
    }
}
