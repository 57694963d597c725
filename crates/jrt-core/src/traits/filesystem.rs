//! Read-only virtual filesystem trait.

use crate::{FsAddress, FsPath, Result};
use std::fmt;
use std::sync::Arc;

/// Shared handle to an open filesystem.
///
/// Handles are owned by the registry that opened them; everyone else holds
/// a clone only for the duration of a traversal.
pub type FsHandle = Arc<dyn VirtualFileSystem>;

/// An open, read-only, hierarchical filesystem.
///
/// Implementations must be safe for concurrent read-only traversal. Closing
/// while a traversal is running is a caller error; implementations only need
/// to make later calls fail with [`Error::FileSystemClosed`](crate::Error::FileSystemClosed).
///
/// # Examples
///
/// ```
/// use jrt_core::traits::VirtualFileSystem;
/// use jrt_core::{Error, FsAddress, FsPath, Result};
/// use std::sync::atomic::{AtomicBool, Ordering};
///
/// #[derive(Debug)]
/// struct Flat {
///     address: FsAddress,
///     names: Vec<&'static str>,
///     open: AtomicBool,
/// }
///
/// impl VirtualFileSystem for Flat {
///     fn address(&self) -> &FsAddress {
///         &self.address
///     }
///
///     fn list(&self, dir: &FsPath) -> Result<Vec<FsPath>> {
///         if !dir.is_root() {
///             return Err(Error::PathNotFound { path: dir.to_string() });
///         }
///         self.names.iter().map(|n| dir.join(n)).collect()
///     }
///
///     fn is_dir(&self, path: &FsPath) -> bool {
///         path.is_root()
///     }
///
///     fn is_open(&self) -> bool {
///         self.open.load(Ordering::Acquire)
///     }
///
///     fn close(&self) -> Result<()> {
///         if self.open.swap(false, Ordering::AcqRel) {
///             Ok(())
///         } else {
///             Err(Error::FileSystemClosed { address: self.address.to_string() })
///         }
///     }
/// }
///
/// let fs = Flat {
///     address: FsAddress::new("flat", "/"),
///     names: vec!["a", "b"],
///     open: AtomicBool::new(true),
/// };
/// assert_eq!(fs.list(&FsPath::root())?.len(), 2);
/// fs.close()?;
/// assert!(fs.close().unwrap_err().is_closed());
/// # Ok::<(), Error>(())
/// ```
pub trait VirtualFileSystem: Send + Sync + fmt::Debug {
    /// Returns the address this filesystem was opened at.
    fn address(&self) -> &FsAddress;

    /// Lists the immediate children of a directory.
    ///
    /// Children are returned in the filesystem's own listing order, which
    /// callers must not assume to be sorted.
    ///
    /// # Errors
    ///
    /// Fails if the filesystem is closed, the path does not exist, or the
    /// path is not a directory.
    fn list(&self, dir: &FsPath) -> Result<Vec<FsPath>>;

    /// Returns `true` if the path exists and is a directory.
    fn is_dir(&self, path: &FsPath) -> bool;

    /// Returns `true` until [`close`](Self::close) succeeds.
    fn is_open(&self) -> bool;

    /// Releases the filesystem.
    ///
    /// # Errors
    ///
    /// Closing an already closed filesystem returns
    /// [`Error::FileSystemClosed`](crate::Error::FileSystemClosed); other
    /// failures are implementation specific.
    fn close(&self) -> Result<()>;
}
