//! Core types, traits, and errors for runtime image indexing.
//!
//! This crate provides the foundational types and abstractions used across
//! all other crates in the workspace.
//!
//! # Architecture
//!
//! The core consists of:
//! - Strong domain types (`RootId`, `FsPath`, `FsAddress`)
//! - Error hierarchy separating "not an installation", I/O and fatal failures
//! - Traits for filesystems, providers and provider loading
//! - Installation layout configuration

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

mod config;
mod error;
mod types;

pub mod cli;
pub mod traits;

pub use config::{Generation, InstallLayout};
pub use error::{Error, Result};
pub use traits::{FileSystemProvider, FsHandle, ProviderLoader, ProviderOptions, ProviderSource, VirtualFileSystem};
pub use types::{FsAddress, FsPath, ROOT_NAME, RootId};
