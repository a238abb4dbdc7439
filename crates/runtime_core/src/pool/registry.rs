//! Pool registry - one pool per prototype, lazily created
//!
//! The registry owns the per-prototype pools plus the reverse
//! instance→prototype index that makes release routing O(1). Releasing
//! an instance no pool knows about is never silent: it is warned and
//! the instance is destroyed directly.

use super::{InstanceId, InstanceRef, Instantiator, ObjectPool, ReleaseOutcome};
use crate::assets::{ResourceId, ResourceRef};
use crate::config::PoolConfig;
use std::collections::HashMap;

/// Registry of object pools keyed by prototype
pub struct ObjectPoolRegistry {
    pools: HashMap<ResourceId, ObjectPool>,
    owner_lookup: HashMap<InstanceId, ResourceId>,
    spawner: Box<dyn Instantiator>,
    defaults: PoolConfig,
}

impl ObjectPoolRegistry {
    /// Create a registry over the given instantiator
    #[must_use]
    pub fn new(spawner: Box<dyn Instantiator>, defaults: PoolConfig) -> Self {
        Self {
            pools: HashMap::new(),
            owner_lookup: HashMap::new(),
            spawner,
            defaults,
        }
    }

    /// Take an instance of the prototype from its pool
    ///
    /// The pool is created on first use with the configured defaults.
    pub fn get(&mut self, prefab: &ResourceRef) -> InstanceRef {
        let defaults = self.defaults;
        let pool = self
            .pools
            .entry(prefab.id())
            .or_insert_with(|| ObjectPool::new(prefab.clone(), defaults.default_capacity, defaults.max_size));

        let instance = pool.get(self.spawner.as_mut());
        self.owner_lookup.insert(instance.id(), prefab.id());
        instance
    }

    /// Return an instance to its owning pool
    ///
    /// Unknown instances (never pooled, or their pool was cleared while
    /// they were on loan) are destroyed directly with a warning.
    pub fn release(&mut self, instance: &InstanceRef) {
        let Some(prototype) = self.owner_lookup.get(&instance.id()).copied() else {
            log::warn!(
                "[ObjectPoolRegistry] {} is not a pooled instance; destroying it",
                instance.name()
            );
            self.spawner.destroy(instance);
            return;
        };

        let Some(pool) = self.pools.get_mut(&prototype) else {
            // Pool cleared while this instance was out on loan.
            log::warn!(
                "[ObjectPoolRegistry] pool for {} is gone; destroying instance",
                instance.name()
            );
            self.owner_lookup.remove(&instance.id());
            self.spawner.destroy(instance);
            return;
        };

        match pool.release(instance, self.spawner.as_mut()) {
            ReleaseOutcome::Pooled => {}
            ReleaseOutcome::Destroyed => {
                self.owner_lookup.remove(&instance.id());
            }
            ReleaseOutcome::AlreadyPooled => {
                log::warn!(
                    "[ObjectPoolRegistry] double release of {}; ignoring",
                    instance.name()
                );
            }
        }
    }

    /// Eagerly create `count` instances and return them to the pool
    ///
    /// Establishes working capacity up front; the pool is created with
    /// a retention bound of at least `count`.
    pub fn preload(&mut self, prefab: &ResourceRef, count: usize, max_size: usize) {
        let defaults = self.defaults;
        let bound = max_size.max(count);
        self.pools
            .entry(prefab.id())
            .or_insert_with(|| ObjectPool::new(prefab.clone(), defaults.default_capacity.max(count), bound));

        let loaned: Vec<InstanceRef> = (0..count).map(|_| self.get(prefab)).collect();
        for instance in &loaned {
            self.release(instance);
        }

        log::debug!(
            "[ObjectPoolRegistry] preloaded {count} x {} (max {bound})",
            prefab.path()
        );
    }

    /// Destroy every pooled instance of one prototype and forget the pool
    pub fn clear(&mut self, prefab: &ResourceRef) {
        if let Some(mut pool) = self.pools.remove(&prefab.id()) {
            for id in pool.clear(self.spawner.as_mut()) {
                self.owner_lookup.remove(&id);
            }
        }
    }

    /// Destroy every pooled instance of every prototype
    pub fn clear_all(&mut self) {
        log::info!("[ObjectPoolRegistry] clearing {} pools", self.pools.len());
        for (_, mut pool) in self.pools.drain() {
            for id in pool.clear(self.spawner.as_mut()) {
                self.owner_lookup.remove(&id);
            }
        }
    }

    /// Number of live pools
    #[must_use]
    pub fn pool_count(&self) -> usize {
        self.pools.len()
    }

    /// Free / outstanding counts for one prototype's pool
    #[must_use]
    pub fn pool_stats(&self, prefab: &ResourceRef) -> Option<(usize, usize)> {
        self.pools
            .get(&prefab.id())
            .map(|pool| (pool.free_count(), pool.outstanding_count()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{AssetKind, Resource};
    use crate::pool::{Instance, Poolable};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Instantiator that attaches counting hooks and tracks destroys
    struct TestInstantiator {
        hooks: Arc<HookCounts>,
        destroyed: Arc<AtomicUsize>,
    }

    #[derive(Default)]
    struct HookCounts {
        gets: AtomicUsize,
        releases: AtomicUsize,
    }

    struct CountingPoolable(Arc<HookCounts>);

    impl Poolable for CountingPoolable {
        fn on_get(&self) {
            self.0.gets.fetch_add(1, Ordering::Relaxed);
        }

        fn on_release(&self) {
            self.0.releases.fetch_add(1, Ordering::Relaxed);
        }
    }

    impl TestInstantiator {
        fn new() -> (Self, Arc<HookCounts>, Arc<AtomicUsize>) {
            let hooks = Arc::new(HookCounts::default());
            let destroyed = Arc::new(AtomicUsize::new(0));
            (
                Self {
                    hooks: hooks.clone(),
                    destroyed: destroyed.clone(),
                },
                hooks,
                destroyed,
            )
        }
    }

    impl Instantiator for TestInstantiator {
        fn instantiate(&mut self, prefab: &ResourceRef) -> InstanceRef {
            Instance::new(
                prefab.path(),
                prefab.id(),
                Some(Box::new(CountingPoolable(self.hooks.clone()))),
            )
        }

        fn destroy(&mut self, _instance: &InstanceRef) {
            self.destroyed.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn registry() -> (ObjectPoolRegistry, Arc<HookCounts>, Arc<AtomicUsize>) {
        let (spawner, hooks, destroyed) = TestInstantiator::new();
        (
            ObjectPoolRegistry::new(Box::new(spawner), PoolConfig::default()),
            hooks,
            destroyed,
        )
    }

    #[test]
    fn test_preload_scenario() {
        let (mut pools, _, _) = registry();
        let bullet = Resource::new("Prefabs/Bullet", AssetKind::Prefab);

        pools.preload(&bullet, 10, 50);
        assert_eq!(pools.pool_stats(&bullet), Some((10, 0)));

        let loaned: Vec<_> = (0..3).map(|_| pools.get(&bullet)).collect();
        assert_eq!(pools.pool_stats(&bullet), Some((7, 3)));

        for instance in &loaned {
            pools.release(instance);
        }
        assert_eq!(pools.pool_stats(&bullet), Some((10, 0)));
    }

    #[test]
    fn test_capacity_bound() {
        let (mut pools, _, destroyed) = registry();
        let bullet = Resource::new("Prefabs/Bullet", AssetKind::Prefab);

        pools.preload(&bullet, 5, 5);
        let loaned: Vec<_> = (0..6).map(|_| pools.get(&bullet)).collect();
        for instance in &loaned {
            pools.release(instance);
        }

        // Exactly 5 retained; the 6th was destroyed, not kept.
        assert_eq!(pools.pool_stats(&bullet), Some((5, 0)));
        assert_eq!(destroyed.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_lifecycle_hooks_fire() {
        let (mut pools, hooks, _) = registry();
        let bullet = Resource::new("Prefabs/Bullet", AssetKind::Prefab);

        let instance = pools.get(&bullet);
        assert_eq!(hooks.gets.load(Ordering::Relaxed), 1);
        assert_eq!(hooks.releases.load(Ordering::Relaxed), 0);

        pools.release(&instance);
        assert_eq!(hooks.releases.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_unknown_instance_is_destroyed() {
        let (mut pools, _, destroyed) = registry();
        let bullet = Resource::new("Prefabs/Bullet", AssetKind::Prefab);

        let foreign = Instance::new("Stray", bullet.id(), None);
        pools.release(&foreign);

        assert_eq!(destroyed.load(Ordering::Relaxed), 1);
        assert_eq!(pools.pool_count(), 0);
    }

    #[test]
    fn test_double_release_does_not_duplicate() {
        let (mut pools, hooks, _) = registry();
        let bullet = Resource::new("Prefabs/Bullet", AssetKind::Prefab);

        let instance = pools.get(&bullet);
        pools.release(&instance);
        pools.release(&instance);

        assert_eq!(pools.pool_stats(&bullet), Some((1, 0)));
        // The second release fired no hook.
        assert_eq!(hooks.releases.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_release_after_clear_warns_and_destroys() {
        let (mut pools, _, destroyed) = registry();
        let bullet = Resource::new("Prefabs/Bullet", AssetKind::Prefab);

        let loaned = pools.get(&bullet);
        pools.clear(&bullet);
        assert_eq!(pools.pool_count(), 0);

        // On-loan instance survives the clear, then degrades to the
        // unknown-instance path on release.
        assert!(loaned.is_active());
        pools.release(&loaned);
        assert_eq!(destroyed.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_clear_all_forgets_everything() {
        let (mut pools, _, destroyed) = registry();
        let bullet = Resource::new("Prefabs/Bullet", AssetKind::Prefab);
        let rocket = Resource::new("Prefabs/Rocket", AssetKind::Prefab);

        pools.preload(&bullet, 2, 10);
        pools.preload(&rocket, 3, 10);
        assert_eq!(pools.pool_count(), 2);

        pools.clear_all();
        assert_eq!(pools.pool_count(), 0);
        assert_eq!(destroyed.load(Ordering::Relaxed), 5);
    }
}
