use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// A shared value behind an `Arc<RwLock<T>>`.
///
/// The editing session takes the write guard while a command changes the world;
/// mesh workers take read guards, so every mesh sees one consistent world.
///
/// ```
/// # use std::thread;
/// use voxel_editor_engine::core::MtResource;
///
/// let edits = MtResource::new(Vec::new());
/// let worker_handle = edits.clone();
///
/// thread::spawn(move || worker_handle.get_mut().push("fill"))
///     .join()
///     .unwrap();
/// assert_eq!(edits.get().as_slice(), ["fill"]);
/// ```
///
/// # Poisoning
/// A worker that panics while holding a guard poisons the lock. The data behind it
/// is still structurally valid (edits are applied chunk by chunk under the write
/// lock), so both accessors recover the guard instead of propagating the panic.
pub struct MtResource<T: Send + Sync> {
    resource: Arc<RwLock<T>>,
}

impl<T: Send + Sync + 'static> MtResource<T> {
    /// Wraps `resource` for sharing.
    pub fn new(resource: T) -> Self {
        Self {
            resource: Arc::new(RwLock::new(resource)),
        }
    }

    /// Shared read access. Blocks while a writer holds the lock.
    pub fn get(&self) -> RwLockReadGuard<'_, T> {
        self.resource.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Exclusive write access. Blocks until every reader is done.
    pub fn get_mut(&self) -> RwLockWriteGuard<'_, T> {
        self.resource.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Whether `self` and `other` share the same underlying value.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.resource, &other.resource)
    }
}

impl<T: Send + Sync> Clone for MtResource<T> {
    fn clone(&self) -> Self {
        Self {
            resource: self.resource.clone(),
        }
    }
}
