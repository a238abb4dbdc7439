//! Packaged-asset backend (concrete strategy)
//!
//! Loads assets bundled into the build. One engine restriction shapes
//! its release path: structural object types (prefabs, canvases) back
//! live instantiated hierarchies and cannot be unloaded piecemeal, so
//! releasing one is a benign no-op rather than an error.

use super::{AssetCatalog, AssetKind, Resource, ResourceHandler, ResourceRef};
use async_trait::async_trait;
use tokio::task::yield_now;

/// Backend over the asset pack compiled into the build
pub struct PackagedHandler {
    catalog: AssetCatalog,
}

impl PackagedHandler {
    /// Create a packaged backend over the given catalog
    #[must_use]
    pub const fn new(catalog: AssetCatalog) -> Self {
        Self { catalog }
    }
}

#[async_trait]
impl ResourceHandler for PackagedHandler {
    async fn load(&self, path: &str, kind: AssetKind) -> Option<ResourceRef> {
        // Packaged reads still suspend: parsing/upload happens over
        // following frames, not inside the caller's stack.
        yield_now().await;

        match self.catalog.kind_of(path) {
            Some(found) if found == kind => Some(Resource::new(path, kind)),
            Some(found) => {
                log::debug!("[PackagedHandler] {path} is {found:?}, requested {kind:?}");
                None
            }
            None => None,
        }
    }

    async fn load_all(&self, path: &str, kind: AssetKind) -> Vec<ResourceRef> {
        yield_now().await;

        self.catalog
            .entries_under(path)
            .into_iter()
            .filter(|(_, found)| *found == kind)
            .map(|(entry, _)| Resource::new(entry, kind))
            .collect()
    }

    fn release(&self, resource: &ResourceRef) {
        if resource.kind().is_structural() {
            // Live object hierarchies cannot be unloaded from the pack.
            log::debug!(
                "[PackagedHandler] skipping unload of structural asset {}",
                resource.path()
            );
            return;
        }

        log::debug!("[PackagedHandler] unloaded {}", resource.path());
    }
}
