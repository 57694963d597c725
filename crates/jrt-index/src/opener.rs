//! Opening module image and symbol archive filesystems for an installation.
//!
//! Both operations resolve a provider archive below the installation root
//! using the configured [`InstallLayout`]. A missing archive yields
//! [`Error::InstallationNotFound`] and leaves the registry untouched.

use crate::registry::HandleRegistry;
use jrt_core::{
    Error, FsAddress, FsHandle, InstallLayout, ProviderLoader, ProviderOptions, ProviderSource,
    Result, RootId,
};
use jrt_fs::{FileSystems, JmodImageLoader};
use std::path::Path;
use std::sync::Arc;

/// Opens filesystems for installation roots and registers them.
///
/// # Examples
///
/// ```no_run
/// use jrt_index::{FileSystemOpener, HandleRegistry};
/// use std::path::Path;
///
/// let registry = HandleRegistry::new();
/// let opener = FileSystemOpener::new();
///
/// match opener.open_module_filesystem(&registry, Path::new("/opt/jdk-21")) {
///     Ok(fs) => println!("opened {}", fs.address()),
///     Err(e) if e.is_not_found() => println!("not a valid installation"),
///     Err(e) => return Err(e),
/// }
/// # Ok::<(), jrt_core::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct FileSystemOpener {
    layout: InstallLayout,
    loader: Arc<dyn ProviderLoader>,
    file_systems: Arc<FileSystems>,
}

impl FileSystemOpener {
    /// Creates an opener with the modern layout, the module image loader
    /// and a fresh filesystem table with the default providers.
    #[must_use]
    pub fn new() -> Self {
        Self::with_parts(
            InstallLayout::default(),
            Arc::new(JmodImageLoader::new()),
            Arc::new(FileSystems::with_default_providers()),
        )
    }

    /// Creates an opener from explicit collaborators.
    #[must_use]
    pub fn with_parts(
        layout: InstallLayout,
        loader: Arc<dyn ProviderLoader>,
        file_systems: Arc<FileSystems>,
    ) -> Self {
        Self {
            layout,
            loader,
            file_systems,
        }
    }

    /// Replaces the install layout.
    #[must_use]
    pub fn with_layout(mut self, layout: InstallLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Replaces the provider loader.
    #[must_use]
    pub fn with_loader(mut self, loader: Arc<dyn ProviderLoader>) -> Self {
        self.loader = loader;
        self
    }

    /// Returns the install layout in use.
    #[must_use]
    pub const fn layout(&self) -> &InstallLayout {
        &self.layout
    }

    /// Returns the filesystem table used for archive-backed filesystems.
    #[must_use]
    pub fn file_systems(&self) -> &Arc<FileSystems> {
        &self.file_systems
    }

    /// Opens the module image of the installation at `install_root`.
    ///
    /// The provider is loaded from the helper archive named by the layout
    /// and asked for a new filesystem at `jrt:/` with no options. The
    /// handle is registered under the installation root.
    ///
    /// # Errors
    ///
    /// - [`Error::InstallationNotFound`] if the helper archive is missing
    /// - [`Error::ProviderLoad`] if the helper archive cannot be loaded
    /// - any I/O error from building the filesystem
    pub fn open_module_filesystem(
        &self,
        registry: &HandleRegistry,
        install_root: &Path,
    ) -> Result<FsHandle> {
        let archive = self.layout.module_provider_archive_in(install_root);
        require_file(install_root, &archive)?;

        let provider = self.loader.load(&ProviderSource {
            install_root: install_root.to_path_buf(),
            archive,
        })?;
        let fs = provider.new_file_system(&FsAddress::module_image(), &ProviderOptions::new())?;

        register(registry, install_root, &fs);
        tracing::info!("Opened module image of {}", install_root.display());
        Ok(fs)
    }

    /// Opens the symbol archive of the installation at `install_root`.
    ///
    /// An archive filesystem already open at the same address is reused.
    /// The handle is registered under the installation root.
    ///
    /// # Errors
    ///
    /// - [`Error::InstallationNotFound`] if the symbol archive is missing
    /// - [`Error::ProviderNotFound`] if no provider handles `jar` addresses
    /// - any I/O error from opening the archive
    pub fn open_symbol_archive_filesystem(
        &self,
        registry: &HandleRegistry,
        install_root: &Path,
    ) -> Result<FsHandle> {
        let archive = self.layout.symbol_archive_in(install_root);
        require_file(install_root, &archive)?;

        let address = FsAddress::archive(&archive)?;
        let fs = match self.file_systems.get_file_system(&address) {
            Ok(fs) => {
                tracing::debug!("Reusing open filesystem {}", address);
                fs
            }
            Err(_) => self.create_or_reuse(&address)?,
        };

        register(registry, install_root, &fs);
        tracing::info!("Opened symbol archive of {}", install_root.display());
        Ok(fs)
    }

    fn create_or_reuse(&self, address: &FsAddress) -> Result<FsHandle> {
        match self
            .file_systems
            .new_file_system(address, &ProviderOptions::new())
        {
            Err(e) if e.is_already_exists() => {
                tracing::debug!("Filesystem {} created concurrently, looking it up", address);
                self.file_systems.get_file_system(address)
            }
            other => other,
        }
    }
}

impl Default for FileSystemOpener {
    fn default() -> Self {
        Self::new()
    }
}

/// Registers `fs` under `install_root` and closes the handle it displaces.
///
/// A displaced handle is left open when it is `fs` itself or is still
/// registered under another root.
fn register(registry: &HandleRegistry, install_root: &Path, fs: &FsHandle) {
    let Some(displaced) = registry.register(RootId::from_path(install_root), Arc::clone(fs)) else {
        return;
    };
    if Arc::ptr_eq(&displaced, fs) || !displaced.is_open() {
        return;
    }
    let shared = registry
        .all_handles()
        .iter()
        .any(|(_, handle)| Arc::ptr_eq(handle, &displaced));
    if shared {
        return;
    }

    match displaced.close() {
        Ok(()) => tracing::debug!(
            "Closed displaced filesystem {} of {}",
            displaced.address(),
            install_root.display()
        ),
        Err(e) => tracing::error!(
            "Failed to close displaced filesystem {} of {}: {}",
            displaced.address(),
            install_root.display(),
            e
        ),
    }
}

fn require_file(install_root: &Path, archive: &Path) -> Result<()> {
    if archive.is_file() {
        Ok(())
    } else {
        tracing::debug!("{} does not exist", archive.display());
        Err(Error::InstallationNotFound {
            root: install_root.to_path_buf(),
            missing: archive.to_path_buf(),
        })
    }
}
