//! Read-only virtual filesystems for runtime module images and symbol archives.
//!
//! This crate provides the concrete [`VirtualFileSystem`](jrt_core::VirtualFileSystem)
//! implementations used by the package index:
//!
//! - [`MemoryFileSystem`] and [`MemoryFsBuilder`] for assembled hierarchies
//! - [`ArchiveFileSystem`] and [`ArchiveProvider`] for the `jar` scheme
//!   (`lib/ct.sym` on early-generation installations)
//! - [`JmodImageLoader`] and [`JmodImageProvider`] for the `jrt` scheme
//!   (module images of modern installations)
//! - [`FileSystems`], the table of providers and open filesystems
//!
//! # Examples
//!
//! ```
//! use jrt_core::{FsPath, VirtualFileSystem};
//! use jrt_fs::MemoryFsBuilder;
//!
//! let fs = MemoryFsBuilder::new()
//!     .package("java.lang", "java.base")
//!     .build()?;
//!
//! let modules = fs.list(&FsPath::new("/packages/java.lang")?)?;
//! assert_eq!(modules[0].display_name(), "java.base");
//! # Ok::<(), jrt_core::Error>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

mod archive;
mod builder;
mod jmod;
mod memory;
mod table;
mod tree;

pub use archive::{ArchiveFileSystem, ArchiveProvider};
pub use builder::MemoryFsBuilder;
pub use jmod::{DEFAULT_JMODS_DIR, JAVA_HOME_OPTION, JmodImageLoader, JmodImageProvider};
pub use memory::MemoryFileSystem;
pub use table::FileSystems;
pub use tree::{EntryKind, EntryTree};
