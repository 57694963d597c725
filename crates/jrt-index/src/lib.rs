//! Package to module index over runtime module images.
//!
//! This crate ties the filesystems of `jrt-fs` to the index the rest of a
//! toolchain consumes:
//!
//! - [`HandleRegistry`]: installation root to open filesystem handle
//! - [`FileSystemOpener`]: opens the module image or the symbol archive of an
//!   installation and registers the handle
//! - [`build_package_to_module_map`]: walks `packages/<package>/<module>`
//! - [`dispose_all`]: closes every registered handle, isolating failures
//! - [`JrtSession`]: owns a registry and releases its handles on drop
//!
//! # Examples
//!
//! ```no_run
//! use jrt_index::{FileSystemOpener, HandleRegistry, build_package_to_module_map, dispose_all};
//! use std::path::Path;
//!
//! let registry = HandleRegistry::new();
//! let opener = FileSystemOpener::new();
//!
//! let fs = opener.open_module_filesystem(&registry, Path::new("/opt/jdk-21"))?;
//! let index = build_package_to_module_map(fs.as_ref(), "packages")?;
//! println!("{} packages", index.packages.len());
//!
//! let report = dispose_all(&registry);
//! assert!(report.is_clean());
//! # Ok::<(), jrt_core::Error>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

mod lifecycle;
mod opener;
mod package_index;
mod registry;
mod session;

pub use lifecycle::{CloseFailure, DisposeReport, dispose_all};
pub use opener::FileSystemOpener;
pub use package_index::{PackageIndex, PackageMap, SkippedPackage, build_package_to_module_map};
pub use registry::HandleRegistry;
pub use session::{IndexSource, JrtSession};
