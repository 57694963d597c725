//! Builder pattern for constructing in-memory filesystems.
//!
//! Provides a fluent API for assembling a [`MemoryFileSystem`], including a
//! shortcut for the `packages/<package>/<module>` layout.
//!
//! # Examples
//!
//! ```
//! use jrt_fs::MemoryFsBuilder;
//!
//! let fs = MemoryFsBuilder::new()
//!     .package("java.lang", "java.base")
//!     .package("java.sql", "java.sql")
//!     .build()
//!     .unwrap();
//!
//! assert!(fs.exists("/packages/java.sql/java.sql"));
//! ```

use crate::memory::MemoryFileSystem;
use jrt_core::{Error, FsAddress, Result};

/// Builder for constructing an in-memory filesystem.
///
/// Errors from individual additions are collected and the first one is
/// returned by [`build`](Self::build).
///
/// # Examples
///
/// ```
/// use jrt_core::{FsPath, VirtualFileSystem};
/// use jrt_fs::MemoryFsBuilder;
///
/// let fs = MemoryFsBuilder::new()
///     .add_dir("/packages/pkgB/modY")
///     .add_dir("/packages/pkgA/modX")
///     .build()?;
///
/// let packages = fs.list(&FsPath::new("/packages")?)?;
/// assert_eq!(packages[0].display_name(), "pkgB");
/// # Ok::<(), jrt_core::Error>(())
/// ```
#[derive(Debug)]
pub struct MemoryFsBuilder {
    fs: MemoryFileSystem,
    errors: Vec<Error>,
}

impl MemoryFsBuilder {
    /// Creates a new builder for a filesystem at `mem:/`.
    #[must_use]
    pub fn new() -> Self {
        Self::with_address(FsAddress::new("mem", "/"))
    }

    /// Creates a new builder for a filesystem at the given address.
    #[must_use]
    pub fn with_address(address: FsAddress) -> Self {
        Self {
            fs: MemoryFileSystem::new(address),
            errors: Vec::new(),
        }
    }

    /// Adds a file to the filesystem being built.
    ///
    /// If the path is invalid, the error will be collected and returned
    /// when `build()` is called.
    #[must_use]
    pub fn add_file(mut self, path: impl AsRef<str>) -> Self {
        if let Err(e) = self.fs.add_file(path) {
            self.errors.push(e);
        }
        self
    }

    /// Adds a directory to the filesystem being built.
    #[must_use]
    pub fn add_dir(mut self, path: impl AsRef<str>) -> Self {
        if let Err(e) = self.fs.add_dir(path) {
            self.errors.push(e);
        }
        self
    }

    /// Adds several files at once.
    ///
    /// # Examples
    ///
    /// ```
    /// use jrt_fs::MemoryFsBuilder;
    ///
    /// let fs = MemoryFsBuilder::new()
    ///     .add_files(["/a.class", "/b.class"])
    ///     .build()
    ///     .unwrap();
    ///
    /// assert_eq!(fs.file_count(), 2);
    /// ```
    #[must_use]
    pub fn add_files<P>(mut self, files: impl IntoIterator<Item = P>) -> Self
    where
        P: AsRef<str>,
    {
        for path in files {
            if let Err(e) = self.fs.add_file(path) {
                self.errors.push(e);
            }
        }
        self
    }

    /// Adds `/packages/<package>/<module>` as a directory.
    #[must_use]
    pub fn package(self, package: &str, module: &str) -> Self {
        self.add_dir(format!("/packages/{package}/{module}"))
    }

    /// Adds an empty `/packages/<package>` directory.
    #[must_use]
    pub fn empty_package(self, package: &str) -> Self {
        self.add_dir(format!("/packages/{package}"))
    }

    /// Returns the number of files currently in the builder.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.fs.file_count()
    }

    /// Consumes the builder and returns the constructed filesystem.
    ///
    /// # Errors
    ///
    /// Returns the first error encountered during construction, if any.
    ///
    /// ```
    /// use jrt_fs::MemoryFsBuilder;
    ///
    /// let result = MemoryFsBuilder::new()
    ///     .add_file("invalid/relative/path")
    ///     .build();
    ///
    /// assert!(result.is_err());
    /// ```
    pub fn build(self) -> Result<MemoryFileSystem> {
        if let Some(error) = self.errors.into_iter().next() {
            return Err(error);
        }
        Ok(self.fs)
    }
}

impl Default for MemoryFsBuilder {
    fn default() -> Self {
        Self::new()
    }
}
