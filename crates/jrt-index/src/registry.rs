//! Registry of open filesystem handles keyed by installation root.

use jrt_core::{FsHandle, RootId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

/// Map from installation root to the filesystem handle opened for it.
///
/// Registering an id that is already present replaces the previous handle
/// and hands it back to the caller, who decides whether to close it.
///
/// # Thread Safety
///
/// The map is guarded by a mutex so the registry may be shared. Closing a
/// handle while another caller is traversing it is still the caller's
/// responsibility to avoid.
///
/// # Examples
///
/// ```
/// use jrt_core::{FsAddress, RootId};
/// use jrt_fs::MemoryFileSystem;
/// use jrt_index::HandleRegistry;
///
/// let registry = HandleRegistry::new();
/// let id = RootId::new("/opt/jdk-21");
/// let handle = MemoryFileSystem::new(FsAddress::module_image()).into_handle();
///
/// assert!(registry.register(id.clone(), handle).is_none());
/// assert!(registry.get(&id).is_some());
/// assert_eq!(registry.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct HandleRegistry {
    handles: Mutex<HashMap<RootId, FsHandle>>,
}

impl HandleRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `handle` under `id`, returning the handle it displaced.
    ///
    /// A displaced handle is left open; closing it is up to the caller.
    pub fn register(&self, id: RootId, handle: FsHandle) -> Option<FsHandle> {
        tracing::debug!("Registering {} for {}", handle.address(), id);
        let displaced = self
            .handles
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id.clone(), Arc::clone(&handle));
        if let Some(old) = &displaced
            && !Arc::ptr_eq(old, &handle)
        {
            tracing::warn!("Replaced handle {} registered for {}", old.address(), id);
        }
        displaced
    }

    /// Returns the handle registered under `id`.
    #[must_use]
    pub fn get(&self, id: &RootId) -> Option<FsHandle> {
        self.handles
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .map(Arc::clone)
    }

    /// Returns every tracked handle with its id.
    #[must_use]
    pub fn all_handles(&self) -> Vec<(RootId, FsHandle)> {
        self.handles
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(id, handle)| (id.clone(), Arc::clone(handle)))
            .collect()
    }

    /// Number of tracked handles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handles
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns `true` if nothing is tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
