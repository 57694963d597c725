//! Error types for runtime image access.
//!
//! This module provides the error hierarchy shared by every crate in the
//! workspace. Variants fall into three classes:
//!
//! - **not found**: the installation root lacks a required provider archive.
//!   This is an expected outcome meaning "not a valid installation".
//! - **I/O**: loading, creation, listing and closing failures.
//! - **fatal**: no provider understands an address scheme at all.
//!
//! # Examples
//!
//! ```
//! use jrt_core::{Error, Result};
//! use std::path::PathBuf;
//!
//! fn require_archive(exists: bool) -> Result<()> {
//!     if !exists {
//!         return Err(Error::InstallationNotFound {
//!             root: PathBuf::from("/opt/jdk"),
//!             missing: PathBuf::from("/opt/jdk/lib/jrt-fs.jar"),
//!         });
//!     }
//!     Ok(())
//! }
//!
//! let err = require_archive(false).unwrap_err();
//! assert!(err.is_not_found());
//! assert!(!err.is_io_error());
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for runtime image access.
#[derive(Error, Debug)]
pub enum Error {
    /// A required provider archive is absent below the installation root.
    ///
    /// Callers should surface this as "not a valid installation" rather
    /// than as an internal fault.
    #[error("not a valid installation: {root} (missing {missing})")]
    InstallationNotFound {
        /// Installation root that was inspected
        root: PathBuf,
        /// Archive or directory that does not exist
        missing: PathBuf,
    },

    /// Underlying I/O failure.
    #[error("I/O error while {context}")]
    Io {
        /// What was being done when the failure occurred
        context: String,
        /// Underlying error cause
        #[source]
        source: std::io::Error,
    },

    /// The provider helper archive could not be loaded.
    #[error("failed to load filesystem provider from {archive}")]
    ProviderLoad {
        /// Helper archive that failed to load
        archive: PathBuf,
        /// Underlying error cause
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// An archive could not be read.
    #[error("failed to read archive {path}")]
    Archive {
        /// Archive file
        path: PathBuf,
        /// Underlying error cause
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// No installed provider handles the address scheme.
    ///
    /// Indicates a broken or incompatible environment. Not retryable.
    #[error("no filesystem provider for scheme '{scheme}' ({address})")]
    ProviderNotFound {
        /// Scheme that nobody handles
        scheme: String,
        /// Full address that was requested
        address: String,
    },

    /// A filesystem is already open at the address.
    #[error("filesystem already exists: {address}")]
    FileSystemAlreadyExists {
        /// Address of the open filesystem
        address: String,
    },

    /// No open filesystem exists at the address.
    #[error("filesystem not found: {address}")]
    FileSystemNotFound {
        /// Address that was looked up
        address: String,
    },

    /// The filesystem has been closed.
    #[error("filesystem is closed: {address}")]
    FileSystemClosed {
        /// Address of the closed filesystem
        address: String,
    },

    /// No entry exists at the path inside a filesystem.
    #[error("no such file or directory: {path}")]
    PathNotFound {
        /// Missing path
        path: String,
    },

    /// The path exists but is not a directory.
    #[error("not a directory: {path}")]
    NotADirectory {
        /// Path that is not a directory
        path: String,
    },

    /// Path is empty, relative, or contains invalid components.
    #[error("invalid path: {path}")]
    InvalidPath {
        /// The rejected path
        path: String,
    },

    /// Configuration could not be parsed or is inconsistent.
    #[error("configuration error: {message}")]
    ConfigError {
        /// Description of the configuration problem
        message: String,
    },
}

impl Error {
    /// Creates an [`Error::Io`] with a short description of the operation.
    ///
    /// # Examples
    ///
    /// ```
    /// use jrt_core::Error;
    ///
    /// let err = Error::io("listing /packages", std::io::ErrorKind::Other.into());
    /// assert!(err.is_io_error());
    /// assert_eq!(err.to_string(), "I/O error while listing /packages");
    /// ```
    #[must_use]
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Returns `true` if the installation lacks a required archive.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::InstallationNotFound { .. })
    }

    /// Returns `true` for recoverable I/O-class failures.
    ///
    /// # Examples
    ///
    /// ```
    /// use jrt_core::Error;
    ///
    /// let err = Error::FileSystemClosed {
    ///     address: "jrt:/".to_string(),
    /// };
    /// assert!(err.is_io_error());
    /// assert!(err.is_closed());
    /// ```
    #[must_use]
    pub const fn is_io_error(&self) -> bool {
        matches!(
            self,
            Self::Io { .. }
                | Self::ProviderLoad { .. }
                | Self::Archive { .. }
                | Self::FileSystemNotFound { .. }
                | Self::FileSystemClosed { .. }
                | Self::PathNotFound { .. }
                | Self::NotADirectory { .. }
        )
    }

    /// Returns `true` if no provider exists for the requested scheme.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::ProviderNotFound { .. })
    }

    /// Returns `true` if a filesystem is already open at the address.
    #[must_use]
    pub const fn is_already_exists(&self) -> bool {
        matches!(self, Self::FileSystemAlreadyExists { .. })
    }

    /// Returns `true` if the filesystem was already closed.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        matches!(self, Self::FileSystemClosed { .. })
    }

    /// Returns `true` if this is an invalid path error.
    #[must_use]
    pub const fn is_invalid_path(&self) -> bool {
        matches!(self, Self::InvalidPath { .. })
    }

    /// Returns `true` if this is a configuration error.
    #[must_use]
    pub const fn is_config_error(&self) -> bool {
        matches!(self, Self::ConfigError { .. })
    }
}

/// Result type alias for runtime image operations.
pub type Result<T> = std::result::Result<T, Error>;
