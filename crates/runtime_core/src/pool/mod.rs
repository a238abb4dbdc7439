//! Object pooling
//!
//! A pool per prototype: instances are cloned from a prefab, tagged
//! with their prototype id for O(1) release routing, and recycled
//! through a bounded free list instead of being destroyed. Lifecycle
//! hooks fire on every acquire/release so gameplay code can reset
//! state without subclassing the pool.
//!
//! The engine-side instantiate/destroy primitives sit behind the
//! [`Instantiator`] seam; [`BasicInstantiator`] is the plain
//! implementation used when no gameplay behaviour needs attaching.

mod object_pool;
mod registry;

pub use object_pool::{ObjectPool, ReleaseOutcome};
pub use registry::ObjectPoolRegistry;

use crate::assets::{ResourceId, ResourceRef};
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

/// Unique identity of an instantiated object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InstanceId(u64);

static NEXT_INSTANCE_ID: AtomicU64 = AtomicU64::new(1);

impl InstanceId {
    fn next() -> Self {
        Self(NEXT_INSTANCE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Lifecycle hooks a pooled instance may declare
///
/// Absence is not an error; instances without hooks are simply
/// activated/deactivated.
pub trait Poolable: Send + Sync {
    /// Called when the instance leaves the pool, after activation
    fn on_get(&self);

    /// Called when the instance returns to the pool, before deactivation
    fn on_release(&self);
}

/// A live instantiated object
///
/// Carries its prototype tag for release routing and an active flag the
/// pool toggles around loans. The transform/render side of the object
/// lives with the engine substrate.
pub struct Instance {
    id: InstanceId,
    name: String,
    prototype: ResourceId,
    active: AtomicBool,
    poolable: Option<Box<dyn Poolable>>,
}

/// Shared handle to a live instance
pub type InstanceRef = Arc<Instance>;

impl Instance {
    /// Create an instance cloned from the given prototype
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        prototype: ResourceId,
        poolable: Option<Box<dyn Poolable>>,
    ) -> InstanceRef {
        Arc::new(Self {
            id: InstanceId::next(),
            name: name.into(),
            prototype,
            active: AtomicBool::new(false),
            poolable,
        })
    }

    /// Unique id of this instance
    #[must_use]
    pub const fn id(&self) -> InstanceId {
        self.id
    }

    /// Display name (usually the prototype path)
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Prototype this instance was cloned from
    #[must_use]
    pub const fn prototype(&self) -> ResourceId {
        self.prototype
    }

    /// Whether the instance is currently active (on loan)
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    pub(crate) fn set_active(&self, active: bool) {
        self.active.store(active, Ordering::Release);
    }

    pub(crate) fn poolable(&self) -> Option<&dyn Poolable> {
        self.poolable.as_deref()
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("active", &self.is_active())
            .finish_non_exhaustive()
    }
}

/// Engine substrate seam for creating and destroying instances
pub trait Instantiator: Send {
    /// Clone a new instance from the prefab
    fn instantiate(&mut self, prefab: &ResourceRef) -> InstanceRef;

    /// Destroy an instance outright
    fn destroy(&mut self, instance: &InstanceRef);
}

/// Plain instantiator: bare instances, no attached behaviour
#[derive(Debug, Default)]
pub struct BasicInstantiator {
    created: usize,
    destroyed: usize,
}

impl BasicInstantiator {
    /// Create a fresh instantiator
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Instances created so far
    #[must_use]
    pub const fn created_count(&self) -> usize {
        self.created
    }

    /// Instances destroyed so far
    #[must_use]
    pub const fn destroyed_count(&self) -> usize {
        self.destroyed
    }
}

impl Instantiator for BasicInstantiator {
    fn instantiate(&mut self, prefab: &ResourceRef) -> InstanceRef {
        self.created += 1;
        Instance::new(prefab.path(), prefab.id(), None)
    }

    fn destroy(&mut self, instance: &InstanceRef) {
        self.destroyed += 1;
        log::trace!("[BasicInstantiator] destroyed {}", instance.name());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{AssetKind, Resource};

    #[test]
    fn test_instance_starts_inactive() {
        let prefab = Resource::new("Prefabs/Bullet", AssetKind::Prefab);
        let instance = Instance::new("Bullet", prefab.id(), None);
        assert!(!instance.is_active());
        assert_eq!(instance.prototype(), prefab.id());
    }

    #[test]
    fn test_basic_instantiator_counts() {
        let prefab = Resource::new("Prefabs/Bullet", AssetKind::Prefab);
        let mut spawner = BasicInstantiator::new();

        let instance = spawner.instantiate(&prefab);
        spawner.destroy(&instance);

        assert_eq!(spawner.created_count(), 1);
        assert_eq!(spawner.destroyed_count(), 1);
    }
}
