//! Table of installed providers and currently open filesystems.
//!
//! At most one open filesystem exists per [`FsAddress`]. Callers first try
//! [`FileSystems::get_file_system`] and fall back to
//! [`FileSystems::new_file_system`], which reports
//! [`Error::FileSystemAlreadyExists`] when another caller won the race.

use crate::archive::ArchiveProvider;
use jrt_core::{Error, FileSystemProvider, FsAddress, FsHandle, ProviderOptions, Result};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

/// Registry of providers by scheme and open filesystems by address.
///
/// # Thread Safety
///
/// This type is `Send` and `Sync`. Creation holds the open-table lock, so
/// two concurrent creations for one address cannot both succeed.
///
/// # Examples
///
/// ```no_run
/// use jrt_core::{FsAddress, ProviderOptions};
/// use jrt_fs::FileSystems;
/// use std::path::Path;
///
/// let table = FileSystems::with_default_providers();
/// let address = FsAddress::archive(Path::new("/opt/jdk8/lib/ct.sym"))?;
/// let fs = match table.get_file_system(&address) {
///     Ok(fs) => fs,
///     Err(_) => table.new_file_system(&address, &ProviderOptions::new())?,
/// };
/// # Ok::<(), jrt_core::Error>(())
/// ```
pub struct FileSystems {
    providers: RwLock<HashMap<String, Arc<dyn FileSystemProvider>>>,
    open: Mutex<HashMap<FsAddress, FsHandle>>,
}

impl FileSystems {
    /// Creates an empty table with no providers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            providers: RwLock::new(HashMap::new()),
            open: Mutex::new(HashMap::new()),
        }
    }

    /// Creates a table with the `jar` archive provider installed.
    #[must_use]
    pub fn with_default_providers() -> Self {
        let table = Self::new();
        table.install_provider(Arc::new(ArchiveProvider::new()));
        table
    }

    /// Installs a provider, replacing any provider for the same scheme.
    pub fn install_provider(&self, provider: Arc<dyn FileSystemProvider>) {
        let scheme = provider.scheme().to_string();
        let mut providers = self
            .providers
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if providers.insert(scheme.clone(), provider).is_some() {
            tracing::debug!("Replaced provider for scheme '{}'", scheme);
        }
    }

    /// Returns the provider installed for `scheme`.
    #[must_use]
    pub fn provider(&self, scheme: &str) -> Option<Arc<dyn FileSystemProvider>> {
        self.providers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(scheme)
            .cloned()
    }

    /// Returns the open filesystem registered for `address`.
    ///
    /// Closed filesystems are evicted on lookup.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FileSystemNotFound`] if no open filesystem exists.
    pub fn get_file_system(&self, address: &FsAddress) -> Result<FsHandle> {
        let mut open = self.open.lock().unwrap_or_else(PoisonError::into_inner);
        match open.get(address) {
            Some(fs) if fs.is_open() => Ok(Arc::clone(fs)),
            Some(_) => {
                open.remove(address);
                Err(Error::FileSystemNotFound {
                    address: address.to_string(),
                })
            }
            None => Err(Error::FileSystemNotFound {
                address: address.to_string(),
            }),
        }
    }

    /// Creates and registers a new filesystem for `address`.
    ///
    /// # Errors
    ///
    /// - [`Error::FileSystemAlreadyExists`] if an open filesystem is
    ///   already registered for the address
    /// - [`Error::ProviderNotFound`] if no provider handles its scheme
    /// - any error from the provider itself
    pub fn new_file_system(
        &self,
        address: &FsAddress,
        options: &ProviderOptions,
    ) -> Result<FsHandle> {
        let provider = self
            .provider(address.scheme())
            .ok_or_else(|| Error::ProviderNotFound {
                scheme: address.scheme().to_string(),
                address: address.to_string(),
            })?;

        let mut open = self.open.lock().unwrap_or_else(PoisonError::into_inner);
        if open.get(address).is_some_and(|fs| fs.is_open()) {
            return Err(Error::FileSystemAlreadyExists {
                address: address.to_string(),
            });
        }

        let fs = provider.new_file_system(address, options)?;
        open.insert(address.clone(), Arc::clone(&fs));
        tracing::debug!("Created filesystem {}", address);
        Ok(fs)
    }

    /// Number of registered filesystems that are still open.
    #[must_use]
    pub fn open_count(&self) -> usize {
        self.open
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|fs| fs.is_open())
            .count()
    }
}

impl Default for FileSystems {
    fn default() -> Self {
        Self::with_default_providers()
    }
}

impl fmt::Debug for FileSystems {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let schemes: Vec<String> = self
            .providers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        f.debug_struct("FileSystems")
            .field("schemes", &schemes)
            .field("open", &self.open_count())
            .finish()
    }
}
