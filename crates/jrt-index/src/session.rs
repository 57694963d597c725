//! Session owning the handle registry for its whole lifetime.

use crate::lifecycle::{DisposeReport, dispose_all};
use crate::opener::FileSystemOpener;
use crate::package_index::{PackageIndex, build_package_to_module_map};
use crate::registry::HandleRegistry;
use jrt_core::{FsHandle, Result};
use std::fmt;
use std::path::Path;

/// Which filesystem of an installation to index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IndexSource {
    /// Module image (`jrt:/`) loaded through the helper archive
    #[default]
    ModuleImage,
    /// Symbol archive (`lib/ct.sym`) of early-generation installations
    SymbolArchive,
}

impl IndexSource {
    /// Returns the short name of the source.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ModuleImage => "image",
            Self::SymbolArchive => "symbols",
        }
    }
}

impl fmt::Display for IndexSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Opens filesystems, indexes them and releases every handle at the end.
///
/// Handles are released by [`dispose`](Self::dispose). Handles still open
/// when the session is dropped are closed then.
///
/// # Examples
///
/// ```no_run
/// use jrt_index::{IndexSource, JrtSession};
/// use std::path::Path;
///
/// let session = JrtSession::default();
/// let index = session.index_installation(Path::new("/opt/jdk-21"), IndexSource::ModuleImage)?;
/// for (package, module) in index.packages.iter() {
///     println!("{package} -> {module}");
/// }
/// let report = session.dispose();
/// assert!(report.is_clean());
/// # Ok::<(), jrt_core::Error>(())
/// ```
#[derive(Debug)]
pub struct JrtSession {
    registry: HandleRegistry,
    opener: FileSystemOpener,
}

impl JrtSession {
    /// Creates a session using `opener`.
    #[must_use]
    pub fn new(opener: FileSystemOpener) -> Self {
        Self {
            registry: HandleRegistry::new(),
            opener,
        }
    }

    /// Returns the session's handle registry.
    #[must_use]
    pub const fn registry(&self) -> &HandleRegistry {
        &self.registry
    }

    /// Returns the session's opener.
    #[must_use]
    pub const fn opener(&self) -> &FileSystemOpener {
        &self.opener
    }

    /// Opens the filesystem of `source` for the installation at `install_root`.
    ///
    /// # Errors
    ///
    /// See [`FileSystemOpener::open_module_filesystem`] and
    /// [`FileSystemOpener::open_symbol_archive_filesystem`].
    pub fn open(&self, install_root: &Path, source: IndexSource) -> Result<FsHandle> {
        match source {
            IndexSource::ModuleImage => self
                .opener
                .open_module_filesystem(&self.registry, install_root),
            IndexSource::SymbolArchive => self
                .opener
                .open_symbol_archive_filesystem(&self.registry, install_root),
        }
    }

    /// Builds the package index of an open filesystem.
    ///
    /// # Errors
    ///
    /// Returns an error if the packages directory cannot be listed.
    pub fn build_package_index(&self, fs: &FsHandle) -> Result<PackageIndex> {
        build_package_to_module_map(fs.as_ref(), &self.opener.layout().packages_dir)
    }

    /// Opens `source` for `install_root` and builds its package index.
    ///
    /// # Errors
    ///
    /// Returns the open or build error.
    pub fn index_installation(
        &self,
        install_root: &Path,
        source: IndexSource,
    ) -> Result<PackageIndex> {
        let fs = self.open(install_root, source)?;
        self.build_package_index(&fs)
    }

    /// Closes every registered handle.
    ///
    /// Handles closed by an earlier call are reported as failures.
    pub fn dispose(&self) -> DisposeReport {
        dispose_all(&self.registry)
    }
}

impl Default for JrtSession {
    fn default() -> Self {
        Self::new(FileSystemOpener::new())
    }
}

impl Drop for JrtSession {
    fn drop(&mut self) {
        for (id, handle) in self.registry.all_handles() {
            if !handle.is_open() {
                continue;
            }
            if let Err(e) = handle.close() {
                tracing::error!("Failed to close filesystem for {}: {}", id, e);
            } else {
                tracing::debug!("Closed filesystem for {} on drop", id);
            }
        }
    }
}
