//! Strong domain types for runtime image access.
//!
//! This module implements the newtype pattern for the identifiers that flow
//! between the opener, the registry and the index builder:
//!
//! - [`RootId`] keys the handle registry (an installation root as given)
//! - [`FsPath`] addresses an entry inside a virtual filesystem
//! - [`FsAddress`] identifies a whole filesystem (`jrt:/`, `jar:file:/...`)
//!
//! # Examples
//!
//! ```
//! use jrt_core::{FsAddress, FsPath, RootId};
//!
//! let id = RootId::new("/opt/jdk-21");
//! let path = FsPath::root().join("packages/java.lang").unwrap();
//! let address = FsAddress::module_image();
//!
//! assert_eq!(id.as_str(), "/opt/jdk-21");
//! assert_eq!(path.display_name(), "java.lang");
//! assert_eq!(address.to_string(), "jrt:/");
//! ```

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Installation root identifier (newtype over String).
///
/// Keys the handle registry. The value is the root exactly as the caller
/// supplied it; it is not canonicalized or otherwise validated.
///
/// # Examples
///
/// ```
/// use jrt_core::RootId;
/// use std::path::Path;
///
/// let id = RootId::from_path(Path::new("/usr/lib/jvm/java-17"));
/// assert_eq!(id, RootId::new("/usr/lib/jvm/java-17"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RootId(String);

impl RootId {
    /// Creates a new root identifier.
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Creates a root identifier from a filesystem path.
    ///
    /// Non UTF-8 components are replaced lossily.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        Self(path.to_string_lossy().into_owned())
    }

    /// Returns the identifier as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `RootId` and returns the inner `String`.
    #[inline]
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for RootId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for RootId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for RootId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Name used for paths without a final segment.
pub const ROOT_NAME: &str = "/";

/// A validated path inside a virtual filesystem.
///
/// `FsPath` always uses Unix conventions regardless of the host OS:
/// - starts with `/`
/// - segments are separated by a single `/`
/// - no empty, `.` or `..` segments
/// - no trailing `/` except for the root itself
///
/// # Examples
///
/// ```
/// use jrt_core::FsPath;
///
/// let path = FsPath::new("/packages/java.util")?;
/// assert_eq!(path.file_name(), Some("java.util"));
/// assert_eq!(path.parent().unwrap().as_str(), "/packages");
///
/// assert!(FsPath::new("packages").is_err());
/// assert!(FsPath::new("/packages/../modules").is_err());
/// # Ok::<(), jrt_core::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FsPath(String);

impl FsPath {
    /// Returns the root path `/`.
    #[must_use]
    pub fn root() -> Self {
        Self(ROOT_NAME.to_string())
    }

    /// Creates a new `FsPath` from an absolute path string.
    ///
    /// A single trailing `/` is accepted and dropped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPath`] if the path is empty, relative, or
    /// contains empty, `.` or `..` segments.
    pub fn new(path: impl AsRef<str>) -> Result<Self> {
        let raw = path.as_ref();
        if !raw.starts_with('/') {
            return Err(invalid(raw));
        }
        if raw == ROOT_NAME {
            return Ok(Self::root());
        }

        let trimmed = raw.strip_suffix('/').unwrap_or(raw);
        let mut normalized = String::with_capacity(trimmed.len());
        for segment in trimmed[1..].split('/') {
            if !is_valid_segment(segment) {
                return Err(invalid(raw));
            }
            normalized.push('/');
            normalized.push_str(segment);
        }

        Ok(Self(normalized))
    }

    /// Resolves a relative path against this one.
    ///
    /// `relative` may hold several `/`-separated segments.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPath`] if `relative` is empty, absolute, or
    /// contains empty, `.` or `..` segments.
    ///
    /// # Examples
    ///
    /// ```
    /// use jrt_core::FsPath;
    ///
    /// let packages = FsPath::root().join("packages")?;
    /// assert_eq!(packages.as_str(), "/packages");
    ///
    /// let module = packages.join("java.lang/java.base")?;
    /// assert_eq!(module.as_str(), "/packages/java.lang/java.base");
    /// # Ok::<(), jrt_core::Error>(())
    /// ```
    pub fn join(&self, relative: &str) -> Result<Self> {
        if relative.is_empty() || relative.starts_with('/') {
            return Err(invalid(relative));
        }

        let mut joined = if self.is_root() {
            String::new()
        } else {
            self.0.clone()
        };
        for segment in relative.split('/') {
            if !is_valid_segment(segment) {
                return Err(invalid(relative));
            }
            joined.push('/');
            joined.push_str(segment);
        }

        Ok(Self(joined))
    }

    /// Returns the path as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` for the root path.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0 == ROOT_NAME
    }

    /// Returns the final segment, or `None` for the root.
    #[must_use]
    pub fn file_name(&self) -> Option<&str> {
        if self.is_root() {
            return None;
        }
        self.0.rsplit('/').next()
    }

    /// Returns the final segment, falling back to `/` for the root.
    ///
    /// # Examples
    ///
    /// ```
    /// use jrt_core::FsPath;
    ///
    /// assert_eq!(FsPath::root().display_name(), "/");
    /// assert_eq!(FsPath::new("/packages/java.sql")?.display_name(), "java.sql");
    /// # Ok::<(), jrt_core::Error>(())
    /// ```
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.file_name().unwrap_or(ROOT_NAME)
    }

    /// Returns the parent path, or `None` for the root.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        if self.is_root() {
            return None;
        }
        self.0.rfind('/').map(|pos| {
            if pos == 0 {
                Self::root()
            } else {
                Self(self.0[..pos].to_string())
            }
        })
    }

    /// Iterates over the path segments, root first.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/').filter(|s| !s.is_empty())
    }
}

impl fmt::Display for FsPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for FsPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

fn is_valid_segment(segment: &str) -> bool {
    !segment.is_empty() && segment != "." && segment != ".." && !segment.contains('\0')
}

fn invalid(path: &str) -> Error {
    Error::InvalidPath {
        path: path.to_string(),
    }
}

/// Address of a whole filesystem: a scheme plus a scheme-specific location.
///
/// Two addresses are equal when their rendered URIs are equal, which is what
/// the address table uses for identity.
///
/// # Examples
///
/// ```
/// use jrt_core::FsAddress;
/// use std::path::Path;
///
/// let image = FsAddress::module_image();
/// assert_eq!(image.scheme(), "jrt");
///
/// let archive = FsAddress::archive(Path::new("/opt/my jdk/lib/ct.sym"))?;
/// assert_eq!(archive.to_string(), "jar:file:/opt/my%20jdk/lib/ct.sym");
/// assert_eq!(archive.archive_path().unwrap(), Path::new("/opt/my jdk/lib/ct.sym"));
/// # Ok::<(), jrt_core::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FsAddress {
    scheme: String,
    location: String,
}

impl FsAddress {
    /// Scheme of the in-image module filesystem.
    pub const MODULE_IMAGE_SCHEME: &'static str = "jrt";

    /// Scheme of archive-backed filesystems.
    pub const ARCHIVE_SCHEME: &'static str = "jar";

    const FILE_PREFIX: &'static str = "file:";

    /// Creates an address from a scheme and a scheme-specific location.
    #[must_use]
    pub fn new(scheme: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            scheme: scheme.into(),
            location: location.into(),
        }
    }

    /// Returns the module image address `jrt:/`.
    #[must_use]
    pub fn module_image() -> Self {
        Self::new(Self::MODULE_IMAGE_SCHEME, ROOT_NAME)
    }

    /// Computes the canonical archive address for a file.
    ///
    /// The path is made absolute (without resolving symlinks) and rendered
    /// with `/` separators. Each segment is percent-encoded.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the current directory is needed and cannot be
    /// read, or [`Error::InvalidPath`] if the path is not valid UTF-8.
    pub fn archive(path: &Path) -> Result<Self> {
        let absolute = std::path::absolute(path)
            .map_err(|e| Error::io(format!("resolving {}", path.display()), e))?;
        let raw = absolute.to_str().ok_or_else(|| Error::InvalidPath {
            path: absolute.display().to_string(),
        })?;

        let mut unix = raw.replace(std::path::MAIN_SEPARATOR, "/");
        if !unix.starts_with('/') {
            unix.insert(0, '/');
        }

        Ok(Self::new(
            Self::ARCHIVE_SCHEME,
            format!("{}{}", Self::FILE_PREFIX, encode_segments(&unix)),
        ))
    }

    /// Returns the scheme.
    #[must_use]
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Returns the scheme-specific location.
    #[must_use]
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Returns the archive file for `file:` based locations.
    ///
    /// Returns `None` when the location does not name a local file or is
    /// not decodable.
    #[must_use]
    pub fn archive_path(&self) -> Option<PathBuf> {
        let encoded = self.location.strip_prefix(Self::FILE_PREFIX)?;
        let decoded = urlencoding::decode(encoded).ok()?.into_owned();
        if cfg!(target_os = "windows") && decoded.as_bytes().get(2) == Some(&b':') {
            return Some(PathBuf::from(&decoded[1..]));
        }
        Some(PathBuf::from(decoded))
    }
}

impl fmt::Display for FsAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.scheme, self.location)
    }
}

fn encode_segments(path: &str) -> String {
    path.split('/')
        .map(urlencoding::encode)
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fs_path_root() {
        let root = FsPath::root();
        assert!(root.is_root());
        assert_eq!(root.file_name(), None);
        assert_eq!(root.display_name(), "/");
        assert_eq!(root.parent(), None);
        assert_eq!(FsPath::new("/").unwrap(), root);
    }

    #[test]
    fn test_fs_path_trailing_slash_dropped() {
        let path = FsPath::new("/packages/").unwrap();
        assert_eq!(path.as_str(), "/packages");
    }

    #[test]
    fn test_fs_path_rejects_bad_input() {
        for bad in ["", "packages", "/a//b", "/a/./b", "/a/../b", "/.."] {
            let err = FsPath::new(bad).unwrap_err();
            assert!(err.is_invalid_path(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn test_fs_path_allows_dotted_segments() {
        let path = FsPath::new("/packages/java.lang.invoke").unwrap();
        assert_eq!(path.file_name(), Some("java.lang.invoke"));
    }

    #[test]
    fn test_fs_path_join() {
        let base = FsPath::new("/packages").unwrap();
        assert_eq!(base.join("java.io").unwrap().as_str(), "/packages/java.io");
        assert!(base.join("").is_err());
        assert!(base.join("/abs").is_err());
        assert!(base.join("a/../b").is_err());
    }

    #[test]
    fn test_fs_path_parent_of_top_level() {
        let path = FsPath::new("/packages").unwrap();
        assert_eq!(path.parent().unwrap(), FsPath::root());
    }

    #[test]
    fn test_fs_path_segments() {
        let path = FsPath::new("/modules/java.base/java").unwrap();
        let segments: Vec<_> = path.segments().collect();
        assert_eq!(segments, vec!["modules", "java.base", "java"]);
        assert_eq!(FsPath::root().segments().count(), 0);
    }

    #[test]
    fn test_module_image_address() {
        let address = FsAddress::module_image();
        assert_eq!(address.scheme(), "jrt");
        assert_eq!(address.location(), "/");
        assert_eq!(address.archive_path(), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_archive_address_round_trips_special_chars() {
        let path = Path::new("/tmp/jdk 9#1/lib/ct.sym");
        let address = FsAddress::archive(path).unwrap();
        assert_eq!(address.to_string(), "jar:file:/tmp/jdk%209%231/lib/ct.sym");
        assert_eq!(address.archive_path().unwrap(), path);
    }

    #[test]
    fn test_archive_address_is_absolute() {
        let address = FsAddress::archive(Path::new("lib/ct.sym")).unwrap();
        let path = address.archive_path().unwrap();
        assert!(path.is_absolute());
        assert!(path.ends_with("lib/ct.sym"));
    }

    #[cfg(unix)]
    #[test]
    fn test_address_identity() {
        let a = FsAddress::archive(Path::new("/jdk/lib/ct.sym")).unwrap();
        let b = FsAddress::new("jar", "file:/jdk/lib/ct.sym");
        assert_eq!(a, b);
    }

    #[cfg(unix)]
    #[test]
    fn test_archive_address_encodes_reserved_chars() {
        let path = Path::new("/opt/a+b/c:d/ct.sym");
        let address = FsAddress::archive(path).unwrap();
        assert_eq!(address.location(), "file:/opt/a%2Bb/c%3Ad/ct.sym");
        assert_eq!(address.archive_path().unwrap(), path);
    }

    #[test]
    fn test_archive_path_rejects_invalid_utf8() {
        let address = FsAddress::new("jar", "file:/opt/%FF/ct.sym");
        assert_eq!(address.archive_path(), None);
    }

    #[test]
    fn test_root_id_from_path() {
        let id = RootId::from_path(Path::new("/opt/jdk"));
        assert_eq!(id.as_str(), "/opt/jdk");
        assert_eq!(id.to_string(), "/opt/jdk");
        assert_eq!(id.into_inner(), "/opt/jdk");
    }
}
