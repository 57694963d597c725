//! Core traits for runtime image access.
//!
//! - `filesystem` - read-only hierarchical filesystem handles
//! - `provider` - filesystem providers and the loader that produces them
//!
//! Both seams exist so the opener and the index builder depend only on
//! interfaces: concrete filesystems live in `jrt-fs`, and tests substitute
//! their own doubles.

mod filesystem;
mod provider;

pub use filesystem::{FsHandle, VirtualFileSystem};
pub use provider::{FileSystemProvider, ProviderLoader, ProviderOptions, ProviderSource};
