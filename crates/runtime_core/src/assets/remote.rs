//! Remote-addressable backend (concrete strategy)
//!
//! Loads assets by address from remotely hosted content. Bulk loads
//! resolve a label to its group of addresses. Unlike the packaged
//! backend, every kind can be released back to the hosting layer.

use super::{AssetCatalog, AssetKind, Resource, ResourceHandler, ResourceRef};
use async_trait::async_trait;
use tokio::task::yield_now;

/// Backend over remote-addressable content
///
/// The transport itself is out of scope; the handler models the
/// address/label resolution and release semantics at the interface
/// boundary.
pub struct RemoteHandler {
    catalog: AssetCatalog,
}

impl RemoteHandler {
    /// Create a remote backend over the given address catalog
    #[must_use]
    pub const fn new(catalog: AssetCatalog) -> Self {
        Self { catalog }
    }
}

#[async_trait]
impl ResourceHandler for RemoteHandler {
    async fn load(&self, path: &str, kind: AssetKind) -> Option<ResourceRef> {
        yield_now().await;

        match self.catalog.kind_of(path) {
            Some(found) if found == kind => Some(Resource::new(path, kind)),
            Some(found) => {
                log::debug!("[RemoteHandler] {path} is {found:?}, requested {kind:?}");
                None
            }
            None => None,
        }
    }

    async fn load_all(&self, label: &str, kind: AssetKind) -> Vec<ResourceRef> {
        yield_now().await;

        let Some(paths) = self.catalog.label_paths(label) else {
            return Vec::new();
        };

        paths
            .iter()
            .filter(|path| self.catalog.kind_of(path) == Some(kind))
            .map(|path| Resource::new(path.clone(), kind))
            .collect()
    }

    fn release(&self, resource: &ResourceRef) {
        log::debug!("[RemoteHandler] released {}", resource.path());
    }
}
