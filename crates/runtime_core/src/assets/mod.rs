//! Asset loading and caching
//!
//! The resource layer is split the way the original tooling splits it:
//!
//! - [`ResourceHandler`] is the strategy seam: the actual async
//!   load/unload of a named resource, with two interchangeable
//!   backends ([`PackagedHandler`] for assets bundled into the build,
//!   [`RemoteHandler`] for remote-addressable content)
//! - [`ResourceCache`] fronts the handler, deduplicates repeated loads
//!   by path, and tracks path→resource associations for release
//!
//! Backend selection is a construction-time choice, invisible to cache
//! callers. A failed load is not a fault: it surfaces as `None` (or an
//! empty vec for bulk loads) with an error logged, and callers
//! null-check.

mod cache;
mod packaged;
mod remote;

pub use cache::ResourceCache;
pub use packaged::PackagedHandler;
pub use remote::RemoteHandler;

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Unique identity of a loaded resource
///
/// Two loads of the same path through the cache return the same id;
/// two loads through a bare backend do not (backends never deduplicate).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResourceId(u64);

static NEXT_RESOURCE_ID: AtomicU64 = AtomicU64::new(1);

impl ResourceId {
    fn next() -> Self {
        Self(NEXT_RESOURCE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// What kind of asset a path resolves to
///
/// Stands in for the type parameter the loading APIs are generic over
/// in engine land; the cache and backends only care about it for unload
/// rules and mismatch checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    /// Instantiable object template (pool prototypes, UI windows)
    Prefab,
    /// UI display surface
    Canvas,
    /// Image data
    Texture,
    /// Audio data
    AudioClip,
    /// Plain text / data blob
    Text,
}

impl AssetKind {
    /// Structural kinds describe live object hierarchies; the packaged
    /// backend cannot unload those (engine restriction, benign no-op).
    #[must_use]
    pub const fn is_structural(self) -> bool {
        matches!(self, Self::Prefab | Self::Canvas)
    }
}

/// A loaded resource: an opaque handle with identity
///
/// The payload itself (mesh data, texture bits, serialized prefab) lives
/// with the engine substrate; this core tracks identity, path, and kind.
#[derive(Debug)]
pub struct Resource {
    id: ResourceId,
    path: String,
    kind: AssetKind,
}

/// Shared handle to a loaded resource
pub type ResourceRef = Arc<Resource>;

impl Resource {
    /// Create a fresh resource handle for a successfully loaded path
    #[must_use]
    pub fn new(path: impl Into<String>, kind: AssetKind) -> ResourceRef {
        Arc::new(Self {
            id: ResourceId::next(),
            path: path.into(),
            kind,
        })
    }

    /// Unique id of this resource
    #[must_use]
    pub const fn id(&self) -> ResourceId {
        self.id
    }

    /// Path the resource was loaded from
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Asset kind
    #[must_use]
    pub const fn kind(&self) -> AssetKind {
        self.kind
    }
}

/// Build-time catalog of loadable assets
///
/// Both backends resolve paths against a catalog: the packaged backend
/// treats it as the set of assets bundled into the build, the remote
/// backend as its address table plus label groups for bulk loads.
#[derive(Debug, Clone, Default)]
pub struct AssetCatalog {
    entries: HashMap<String, AssetKind>,
    labels: HashMap<String, Vec<String>>,
}

impl AssetCatalog {
    /// Create an empty catalog
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a single loadable entry
    #[must_use]
    pub fn with_entry(mut self, path: impl Into<String>, kind: AssetKind) -> Self {
        self.entries.insert(path.into(), kind);
        self
    }

    /// Add a label grouping several already-registered paths
    ///
    /// Labels are the remote backend's bulk-load unit; the packaged
    /// backend bulk-loads by path prefix instead and ignores labels.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>, paths: &[&str]) -> Self {
        self.labels
            .insert(label.into(), paths.iter().map(|p| (*p).to_string()).collect());
        self
    }

    /// Look up the kind registered for a path
    #[must_use]
    pub fn kind_of(&self, path: &str) -> Option<AssetKind> {
        self.entries.get(path).copied()
    }

    /// All entries under a directory-style prefix (`"{prefix}/..."`)
    #[must_use]
    pub fn entries_under(&self, prefix: &str) -> Vec<(&str, AssetKind)> {
        let needle = format!("{prefix}/");
        let mut found: Vec<(&str, AssetKind)> = self
            .entries
            .iter()
            .filter(|(path, _)| path.starts_with(&needle))
            .map(|(path, kind)| (path.as_str(), *kind))
            .collect();
        found.sort_by_key(|(path, _)| *path);
        found
    }

    /// Paths grouped under a label
    #[must_use]
    pub fn label_paths(&self, label: &str) -> Option<&[String]> {
        self.labels.get(label).map(Vec::as_slice)
    }
}

/// Loading strategy consumed by [`ResourceCache`]
///
/// Implementations perform the actual asynchronous load/unload; they
/// keep no state beyond the in-flight operation. A miss is `None` /
/// empty, never an error value - the cache layer decides how loudly to
/// report it.
#[async_trait]
pub trait ResourceHandler: Send + Sync {
    /// Load a single resource by path
    async fn load(&self, path: &str, kind: AssetKind) -> Option<ResourceRef>;

    /// Load every resource under a directory path or label
    async fn load_all(&self, path: &str, kind: AssetKind) -> Vec<ResourceRef>;

    /// Unload a previously loaded resource
    fn release(&self, resource: &ResourceRef);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_identity_is_unique() {
        let a = Resource::new("Prefabs/Bullet", AssetKind::Prefab);
        let b = Resource::new("Prefabs/Bullet", AssetKind::Prefab);
        assert_ne!(a.id(), b.id());
        assert_eq!(a.path(), b.path());
    }

    #[test]
    fn test_structural_kinds() {
        assert!(AssetKind::Prefab.is_structural());
        assert!(AssetKind::Canvas.is_structural());
        assert!(!AssetKind::Texture.is_structural());
        assert!(!AssetKind::AudioClip.is_structural());
    }

    #[test]
    fn test_catalog_prefix_scan() {
        let catalog = AssetCatalog::new()
            .with_entry("Sfx/Jump", AssetKind::AudioClip)
            .with_entry("Sfx/Land", AssetKind::AudioClip)
            .with_entry("SfxOther/Nope", AssetKind::AudioClip);

        let under = catalog.entries_under("Sfx");
        assert_eq!(under.len(), 2);
        assert_eq!(under[0].0, "Sfx/Jump");
        assert_eq!(under[1].0, "Sfx/Land");
    }

    #[test]
    fn test_catalog_labels() {
        let catalog = AssetCatalog::new()
            .with_entry("Enemies/Slime", AssetKind::Prefab)
            .with_entry("Enemies/Bat", AssetKind::Prefab)
            .with_label("enemies", &["Enemies/Slime", "Enemies/Bat"]);

        assert_eq!(catalog.label_paths("enemies").map(<[String]>::len), Some(2));
        assert!(catalog.label_paths("bosses").is_none());
    }
}
