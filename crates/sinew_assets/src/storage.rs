use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use slotmap::{Key, SlotMap};
use std::sync::Arc;

// Internal data structure, protected by a lock.
struct StorageInner<H: Key, T> {
    map: SlotMap<H, Arc<T>>,
    lookup: FxHashMap<String, H>,
}

impl<H: Key, T> Default for StorageInner<H, T> {
    fn default() -> Self {
        Self {
            map: SlotMap::default(),
            lookup: FxHashMap::default(),
        }
    }
}

/// Name-addressed, thread-safe store of immutable shared assets.
///
/// Assets are handed out as `Arc<T>`; nothing stored here is ever mutated in
/// place. Replacing an asset means inserting under a new name or removing the
/// old one first, and instances holding the old `Arc` keep it alive.
pub struct AssetStorage<H: Key, T> {
    inner: RwLock<StorageInner<H, T>>,
}

impl<H: Key, T> Default for AssetStorage<H, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: Key, T> AssetStorage<H, T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: RwLock::default(),
        }
    }

    /// [Write] Adds an asset under `name`. A name that is already present
    /// keeps its existing asset and returns its handle.
    pub fn add_named(&self, name: &str, asset: impl Into<T>) -> H {
        let mut guard = self.inner.write();
        if let Some(&handle) = guard.lookup.get(name) {
            log::debug!("Asset '{name}' already cached, keeping the existing entry");
            return handle;
        }
        let handle = guard.map.insert(Arc::new(asset.into()));
        guard.lookup.insert(name.to_string(), handle);
        handle
    }

    /// [Read] Gets a single asset.
    pub fn get(&self, handle: H) -> Option<Arc<T>> {
        let guard = self.inner.read();
        guard.map.get(handle).cloned()
    }

    pub fn get_by_name(&self, name: &str) -> Option<Arc<T>> {
        let guard = self.inner.read();
        let handle = guard.lookup.get(name)?;
        guard.map.get(*handle).cloned()
    }

    /// [Write] Drops the cache's reference to an asset.
    pub fn remove_named(&self, name: &str) -> Option<Arc<T>> {
        let mut guard = self.inner.write();
        let handle = guard.lookup.remove(name)?;
        guard.map.remove(handle)
    }

    pub fn names(&self) -> Vec<String> {
        let guard = self.inner.read();
        let mut names: Vec<String> = guard.lookup.keys().cloned().collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.inner.read().map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().map.is_empty()
    }

    /// [Write] Drops every cached reference.
    pub fn clear(&self) {
        let mut guard = self.inner.write();
        guard.lookup.clear();
        guard.map.clear();
    }
}
