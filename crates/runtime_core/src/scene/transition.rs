//! Single-flight scene-transition state machine
//!
//! One transition at a time: cleanup of the previous scene always
//! completes before the engine load begins, the load is not activated
//! until the payload is materially ready, and the next scene's
//! initialization runs only after activation finishes. A request while
//! a transition is in flight is rejected up front and never queued.

use super::{SceneDescriptor, SceneHost, SceneId, SceneLifecycle};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex as StdMutex;
use thiserror::Error;
use tokio::sync::Mutex;
use tokio::task::yield_now;

/// Engine progress threshold below which activation is unsafe
///
/// The engine parks load progress here until the activation gate opens;
/// the controller polls up to this value before activating.
pub const ACTIVATION_READY_PROGRESS: f32 = 0.9;

/// Scene transition failures
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SceneError {
    /// A transition is already in flight; the request was dropped
    #[error("a scene transition is already in progress")]
    AlreadyTransitioning,

    /// No descriptor registered for the target id
    #[error("no scene registered for {0:?}")]
    UnknownScene(SceneId),

    /// The engine refused to start loading the target
    #[error("engine refused to load {0:?}")]
    LoadFailed(SceneId),
}

/// Serializes scene teardown, engine load, activation, and init
///
/// Owns the engine collaborator and the registered lifecycles. All
/// methods take `&self`: internal state is guarded for the cooperative
/// model (the in-flight flag is checked and set before any suspension
/// point, so overlapping writers cannot interleave).
pub struct SceneTransitionController {
    host: Mutex<Box<dyn SceneHost>>,
    lifecycles: Mutex<HashMap<SceneId, Box<dyn SceneLifecycle>>>,
    current: StdMutex<Option<SceneId>>,
    in_flight: AtomicBool,
}

/// Clears the in-flight flag on every exit path, error or not
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl SceneTransitionController {
    /// Create a controller over the engine host and scene registrations
    ///
    /// Duplicate registrations for an id are rejected with a warning;
    /// the first one wins.
    #[must_use]
    pub fn new(host: Box<dyn SceneHost>, descriptors: Vec<SceneDescriptor>) -> Self {
        let mut lifecycles: HashMap<SceneId, Box<dyn SceneLifecycle>> = HashMap::new();
        for descriptor in descriptors {
            if lifecycles.contains_key(&descriptor.id) {
                log::warn!(
                    "[SceneTransitionController] duplicate registration for {:?}; keeping the first",
                    descriptor.id
                );
                continue;
            }
            lifecycles.insert(descriptor.id, descriptor.lifecycle);
        }

        Self {
            host: Mutex::new(host),
            lifecycles: Mutex::new(lifecycles),
            current: StdMutex::new(None),
            in_flight: AtomicBool::new(false),
        }
    }

    /// Bind whichever scene the engine already has active at startup
    ///
    /// There is no predecessor on first process start, so only the
    /// scene's `initialize` runs - never `cleanup`.
    pub async fn bind_startup_scene(&self) {
        let active = self.host.lock().await.active_scene();

        {
            let mut current = self.current.lock().expect("current scene slot poisoned");
            if current.is_some() {
                log::warn!("[SceneTransitionController] startup scene already bound");
                return;
            }
            *current = Some(active);
        }

        log::info!("[SceneTransitionController] startup scene is {active:?}");
        let mut lifecycles = self.lifecycles.lock().await;
        if let Some(lifecycle) = lifecycles.get_mut(&active) {
            lifecycle.initialize().await;
        } else {
            log::warn!("[SceneTransitionController] startup scene {active:?} has no descriptor");
        }
    }

    /// Transition to the target scene
    ///
    /// Phases, each a suspension point, strictly in order: cleanup of
    /// the current scene, engine load with progress polling, activation,
    /// then initialization of the target. On any outcome - including a
    /// refused engine load - the in-flight flag is released, so a later
    /// request is never locked out.
    pub async fn request_transition(&self, target: SceneId) -> Result<(), SceneError> {
        // Check-then-set before the first suspension point; under the
        // cooperative model no other writer can interleave here.
        if self.in_flight.swap(true, Ordering::AcqRel) {
            log::warn!("[SceneTransitionController] already transitioning; dropped {target:?}");
            return Err(SceneError::AlreadyTransitioning);
        }
        let _guard = InFlightGuard(&self.in_flight);

        let mut lifecycles = self.lifecycles.lock().await;
        if !lifecycles.contains_key(&target) {
            log::warn!("[SceneTransitionController] no scene registered for {target:?}");
            return Err(SceneError::UnknownScene(target));
        }

        // 1. Tear down the scene being left.
        let previous = *self.current.lock().expect("current scene slot poisoned");
        if let Some(previous) = previous {
            if let Some(lifecycle) = lifecycles.get_mut(&previous) {
                lifecycle.cleanup().await;
            }
        }

        // 2. Ask the engine to load the target's content.
        let operation = self.host.lock().await.begin_load(target);
        let Some(operation) = operation else {
            log::error!("[SceneTransitionController] engine refused to load {target:?}");
            return Err(SceneError::LoadFailed(target));
        };

        // 3. Poll until the payload is ready for activation.
        loop {
            let progress = operation.progress();
            if progress >= ACTIVATION_READY_PROGRESS {
                break;
            }
            log::trace!(
                "[SceneTransitionController] loading {target:?}: {:.0}%",
                progress * 100.0
            );
            yield_now().await;
        }

        // 4. Activate and wait for the engine to finish.
        operation.allow_activation();
        operation.wait_done().await;

        // 5. Hand over and initialize the new scene.
        *self.current.lock().expect("current scene slot poisoned") = Some(target);
        if let Some(lifecycle) = lifecycles.get_mut(&target) {
            lifecycle.initialize().await;
        }

        log::info!("[SceneTransitionController] now on {target:?}");
        Ok(())
    }

    /// The scene currently owned by the controller
    #[must_use]
    pub fn current_scene(&self) -> Option<SceneId> {
        *self.current.lock().expect("current scene slot poisoned")
    }

    /// Whether a transition is in flight
    #[must_use]
    pub fn is_transitioning(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }
}
