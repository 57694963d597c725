//! Filesystem provider traits.

use crate::{FsAddress, FsHandle, Result};
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Provider-specific options passed when creating a filesystem.
pub type ProviderOptions = HashMap<String, String>;

/// Creates filesystems for a single address scheme.
pub trait FileSystemProvider: Send + Sync + fmt::Debug {
    /// Scheme handled by this provider, e.g. `jrt` or `jar`.
    fn scheme(&self) -> &str;

    /// Opens a new filesystem at the address.
    ///
    /// # Errors
    ///
    /// Fails if the address is not understood or the backing data cannot
    /// be read.
    fn new_file_system(&self, address: &FsAddress, options: &ProviderOptions) -> Result<FsHandle>;
}

/// Where a provider is loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderSource {
    /// Installation root the archive belongs to.
    pub install_root: PathBuf,
    /// Helper archive carrying the provider.
    pub archive: PathBuf,
}

/// Loads a filesystem provider from a helper archive.
///
/// This is the dynamic loading seam: the opener only knows that a single
/// archive file yields a provider.
pub trait ProviderLoader: Send + Sync + fmt::Debug {
    /// Loads the provider carried by `source.archive`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ProviderLoad`](crate::Error::ProviderLoad) or an
    /// I/O-class error if the archive cannot be loaded.
    fn load(&self, source: &ProviderSource) -> Result<Arc<dyn FileSystemProvider>>;
}
