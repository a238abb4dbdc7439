//! Single-prototype bounded pool

use super::{Instantiator, InstanceId, InstanceRef};
use crate::assets::{ResourceId, ResourceRef};
use std::sync::Arc;

/// What happened to an instance handed to [`ObjectPool::release`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// Returned to the free list for reuse
    Pooled,
    /// Free list was at capacity; the instance was destroyed
    Destroyed,
    /// The instance was already in the free list (double release)
    AlreadyPooled,
}

/// Bounded pool of instances cloned from one prototype
///
/// The pool owns its free-list instances; instances on loan belong to
/// the caller until released. Beyond `max_size` the pool still hands
/// out fresh instances but stops retaining them on release.
pub struct ObjectPool {
    prototype: ResourceRef,
    free: Vec<InstanceRef>,
    max_size: usize,
    outstanding: usize,
    total_created: usize,
}

impl ObjectPool {
    /// Create a pool for the prototype with the given retention bound
    #[must_use]
    pub fn new(prototype: ResourceRef, default_capacity: usize, max_size: usize) -> Self {
        Self {
            prototype,
            free: Vec::with_capacity(default_capacity.min(max_size)),
            max_size,
            outstanding: 0,
            total_created: 0,
        }
    }

    /// Take an instance from the pool, constructing one if none is free
    ///
    /// The instance is activated and its `on_get` hook fires before it
    /// is returned.
    pub fn get(&mut self, spawner: &mut dyn Instantiator) -> InstanceRef {
        let instance = match self.free.pop() {
            Some(recycled) => recycled,
            None => {
                self.total_created += 1;
                spawner.instantiate(&self.prototype)
            }
        };

        self.outstanding += 1;
        instance.set_active(true);
        if let Some(poolable) = instance.poolable() {
            poolable.on_get();
        }
        instance
    }

    /// Return an instance to the pool
    ///
    /// Fires `on_release`, deactivates, then either retains the
    /// instance or destroys it when the free list is at `max_size`.
    /// A double release is detected against the free list and rejected
    /// without firing hooks or touching the accounting.
    pub fn release(&mut self, instance: &InstanceRef, spawner: &mut dyn Instantiator) -> ReleaseOutcome {
        if self.free.iter().any(|held| Arc::ptr_eq(held, instance)) {
            return ReleaseOutcome::AlreadyPooled;
        }

        if let Some(poolable) = instance.poolable() {
            poolable.on_release();
        }
        instance.set_active(false);
        self.outstanding = self.outstanding.saturating_sub(1);

        if self.free.len() < self.max_size {
            self.free.push(instance.clone());
            ReleaseOutcome::Pooled
        } else {
            spawner.destroy(instance);
            ReleaseOutcome::Destroyed
        }
    }

    /// Destroy every free instance, returning their ids
    ///
    /// Instances on loan are untouched; they degrade to the
    /// unknown-instance path when later released.
    pub fn clear(&mut self, spawner: &mut dyn Instantiator) -> Vec<InstanceId> {
        let mut cleared = Vec::with_capacity(self.free.len());
        for instance in self.free.drain(..) {
            cleared.push(instance.id());
            spawner.destroy(&instance);
        }
        cleared
    }

    /// Prototype this pool serves
    #[must_use]
    pub fn prototype_id(&self) -> ResourceId {
        self.prototype.id()
    }

    /// Instances currently available for reuse
    #[must_use]
    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    /// Instances currently on loan
    #[must_use]
    pub const fn outstanding_count(&self) -> usize {
        self.outstanding
    }

    /// Instances constructed over the pool's lifetime
    #[must_use]
    pub const fn total_created(&self) -> usize {
        self.total_created
    }

    /// Retention bound of the free list
    #[must_use]
    pub const fn max_size(&self) -> usize {
        self.max_size
    }
}
