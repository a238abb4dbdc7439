//! Resource cache fronting the loading strategy
//!
//! The cache is the sole owner of a loaded resource until it is
//! released: at most one live entry per path, repeated loads return the
//! same handle, and the backend is consulted at most once per cached
//! path.

use super::{AssetKind, ResourceHandler, ResourceRef};
use std::collections::HashMap;

/// Reference-tracked cache over a [`ResourceHandler`]
///
/// Single-item loads populate the cache; bulk loads deliberately bypass
/// it (the original tooling makes the same trade and callers rely on
/// bulk results being fresh handles they own outright).
pub struct ResourceCache {
    handler: Box<dyn ResourceHandler>,
    cache: HashMap<String, ResourceRef>,
}

impl ResourceCache {
    /// Create a cache over the chosen backend strategy
    #[must_use]
    pub fn new(handler: Box<dyn ResourceHandler>) -> Self {
        Self {
            handler,
            cache: HashMap::new(),
        }
    }

    /// Load a single resource, deduplicated by path
    ///
    /// Returns the cached handle on a hit without touching the backend.
    /// On a miss the backend is consulted and a successful result is
    /// inserted before returning. A failed load returns `None` with an
    /// error logged; callers must null-check.
    pub async fn load(&mut self, path: &str, kind: AssetKind) -> Option<ResourceRef> {
        if let Some(resource) = self.cache.get(path) {
            return Some(resource.clone());
        }

        match self.handler.load(path, kind).await {
            Some(resource) => {
                self.cache.insert(path.to_string(), resource.clone());
                Some(resource)
            }
            None => {
                log::error!("[ResourceCache] no resource at {path}");
                None
            }
        }
    }

    /// Load every resource under a directory path or label
    ///
    /// Bulk results are not individually cached by this layer.
    pub async fn load_all(&mut self, path: &str, kind: AssetKind) -> Vec<ResourceRef> {
        let resources = self.handler.load_all(path, kind).await;
        if resources.is_empty() {
            log::error!("[ResourceCache] no resources at {path}");
        }
        resources
    }

    /// Release a resource and drop its cache entry
    ///
    /// The entry is found by value identity, not by path, so a handle
    /// obtained from the cache is enough. Releasing a resource the
    /// cache does not own is a logged no-op.
    pub fn release(&mut self, resource: &ResourceRef) {
        let key = self
            .cache
            .iter()
            .find(|(_, cached)| cached.id() == resource.id())
            .map(|(path, _)| path.clone());

        let Some(key) = key else {
            log::warn!(
                "[ResourceCache] release of uncached resource {}",
                resource.path()
            );
            return;
        };

        self.cache.remove(&key);
        self.handler.release(resource);
    }

    /// Release every cached entry
    ///
    /// Called exactly once at shutdown by the runtime teardown sequence.
    pub fn release_all(&mut self) {
        log::info!("[ResourceCache] releasing {} cached resources", self.cache.len());
        for resource in self.cache.values() {
            self.handler.release(resource);
        }
        self.cache.clear();
    }

    /// Number of live cache entries
    #[must_use]
    pub fn cached_count(&self) -> usize {
        self.cache.len()
    }
}
