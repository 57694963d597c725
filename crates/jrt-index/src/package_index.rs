//! Package to module index built from the `packages/<package>/<module>`
//! layout of an open filesystem.
//!
//! The builder walks two directory levels in listing order and never
//! sorts. A package whose modules cannot be listed is skipped and reported
//! in [`PackageIndex::skipped`]; only a failure to list the packages
//! directory itself fails the build.
//!
//! # Examples
//!
//! ```
//! use jrt_fs::MemoryFsBuilder;
//! use jrt_index::build_package_to_module_map;
//!
//! let fs = MemoryFsBuilder::new()
//!     .package("java.sql", "java.sql")
//!     .package("java.lang", "java.base")
//!     .empty_package("sun.misc")
//!     .build()?;
//!
//! let index = build_package_to_module_map(&fs, "packages")?;
//! let entries: Vec<_> = index.packages.iter().collect();
//! assert_eq!(entries, vec![("java.sql", "java.sql"), ("java.lang", "java.base")]);
//! assert!(index.skipped.is_empty());
//! # Ok::<(), jrt_core::Error>(())
//! ```

use indexmap::IndexMap;
use jrt_core::{Error, FsPath, Result, VirtualFileSystem};
use serde::Serialize;

/// Insertion-ordered map from package name to module name.
///
/// Inserting an existing key replaces its value and keeps its position.
/// Serializes as a JSON object in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PackageMap(IndexMap<String, String>);

impl PackageMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `package -> module`, returning the previous module if any.
    pub fn insert(&mut self, package: impl Into<String>, module: impl Into<String>) -> Option<String> {
        self.0.insert(package.into(), module.into())
    }

    /// Returns the module recorded for `package`.
    #[must_use]
    pub fn get(&self, package: &str) -> Option<&str> {
        self.0.get(package).map(String::as_str)
    }

    /// Iterates over `(package, module)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(p, m)| (p.as_str(), m.as_str()))
    }

    /// Iterates over package names in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Number of packages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no package was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A package left out of the index because its modules could not be listed.
#[derive(Debug)]
pub struct SkippedPackage {
    /// Package name
    pub package: String,
    /// Listing failure
    pub error: Error,
}

/// Result of indexing one filesystem.
#[derive(Debug, Default)]
pub struct PackageIndex {
    /// Package to first module, in listing order
    pub packages: PackageMap,
    /// Packages that were skipped, in listing order
    pub skipped: Vec<SkippedPackage>,
}

impl PackageIndex {
    /// Returns `true` if no package was skipped.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Builds the package to module map of `fs`.
///
/// `packages_dir` is resolved below the filesystem root. Each child of it
/// is a package; its first child, in listing order, names the module.
/// Packages without children are left out silently.
///
/// # Errors
///
/// Returns an error if `packages_dir` is not a valid relative path or
/// cannot be listed.
pub fn build_package_to_module_map(
    fs: &dyn VirtualFileSystem,
    packages_dir: &str,
) -> Result<PackageIndex> {
    let packages_root = FsPath::root().join(packages_dir)?;
    let packages = fs.list(&packages_root)?;

    let mut index = PackageIndex::default();
    for package_dir in packages {
        let package = package_dir.display_name().to_string();
        match fs.list(&package_dir) {
            Ok(modules) => {
                let Some(module) = modules.first() else {
                    tracing::debug!("Package {} has no modules", package);
                    continue;
                };
                index.packages.insert(package, module.display_name());
            }
            Err(error) => {
                tracing::warn!("Skipping package {}: {}", package, error);
                index.skipped.push(SkippedPackage { package, error });
            }
        }
    }

    tracing::debug!(
        "Indexed {} packages of {} ({} skipped)",
        index.packages.len(),
        fs.address(),
        index.skipped.len()
    );
    Ok(index)
}
