//! Bulk release of registered filesystem handles.

use crate::registry::HandleRegistry;
use jrt_core::{Error, FsHandle, RootId};
use std::sync::Arc;

/// A handle that failed to close.
#[derive(Debug)]
pub struct CloseFailure {
    /// Installation root the handle was registered under
    pub id: RootId,
    /// Close failure
    pub error: Error,
}

/// Outcome of [`dispose_all`].
#[derive(Debug, Default)]
pub struct DisposeReport {
    /// Number of distinct handles closed successfully
    pub closed: usize,
    /// Handles whose close failed
    pub failures: Vec<CloseFailure>,
}

impl DisposeReport {
    /// Returns `true` if every handle closed.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Closes every handle tracked by `registry`.
///
/// A failure closing one handle is logged and recorded, and closing
/// continues with the rest. A handle registered under several roots is
/// closed once. Handles stay registered, so disposing again reports each
/// of them as already closed.
///
/// # Examples
///
/// ```
/// use jrt_core::{FsAddress, RootId};
/// use jrt_fs::MemoryFileSystem;
/// use jrt_index::{HandleRegistry, dispose_all};
///
/// let registry = HandleRegistry::new();
/// let handle = MemoryFileSystem::new(FsAddress::module_image()).into_handle();
/// registry.register(RootId::new("/opt/jdk"), handle.clone());
///
/// let report = dispose_all(&registry);
/// assert_eq!(report.closed, 1);
/// assert!(!handle.is_open());
///
/// let again = dispose_all(&registry);
/// assert_eq!(again.failures.len(), 1);
/// ```
pub fn dispose_all(registry: &HandleRegistry) -> DisposeReport {
    let mut report = DisposeReport::default();
    let mut visited: Vec<FsHandle> = Vec::new();
    for (id, handle) in registry.all_handles() {
        if visited.iter().any(|seen| Arc::ptr_eq(seen, &handle)) {
            tracing::debug!("Filesystem for {} already released in this pass", id);
            continue;
        }
        visited.push(Arc::clone(&handle));
        match handle.close() {
            Ok(()) => report.closed += 1,
            Err(error) => {
                tracing::error!("Failed to close filesystem for {}: {}", id, error);
                report.failures.push(CloseFailure { id, error });
            }
        }
    }
    tracing::debug!(
        "Disposed {} handles ({} failures)",
        report.closed,
        report.failures.len()
    );
    report
}
