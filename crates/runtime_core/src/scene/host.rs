//! Engine scene-load collaborator
//!
//! The substrate that owns scene content exposes exactly three things
//! per load: a progress value, an activation gate settable
//! independently of progress, and an awaitable completion signal.
//! [`SimulatedSceneHost`] is the in-crate implementation used by tests
//! and the sandbox; an engine integration implements [`SceneHost`]
//! against the real thing.

use super::{SceneId, ACTIVATION_READY_PROGRESS};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::task::yield_now;

/// Handle to one in-flight engine scene load
#[async_trait]
pub trait SceneLoadOperation: Send + Sync {
    /// Current load progress in `0..=1`
    ///
    /// Progress parks just below completion until the activation gate
    /// opens; activating earlier is unsafe.
    fn progress(&self) -> f32;

    /// Open the activation gate
    fn allow_activation(&self);

    /// Await full activation; only meaningful after
    /// [`allow_activation`](Self::allow_activation)
    async fn wait_done(&self);
}

/// Engine substrate that loads scene content
pub trait SceneHost: Send {
    /// Begin loading the target scene's content
    ///
    /// `None` means the target is unknown to the engine or
    /// misconfigured; no load was started.
    fn begin_load(&mut self, scene: SceneId) -> Option<Box<dyn SceneLoadOperation>>;

    /// The scene the engine currently has active
    fn active_scene(&self) -> SceneId;
}

/// Simulated engine host
///
/// Each [`progress`](SceneLoadOperation::progress) query advances the
/// simulated load by a fixed step, so the controller's cooperative
/// polling loop terminates without an external ticker.
pub struct SimulatedSceneHost {
    active: Arc<Mutex<SceneId>>,
    step: f32,
    unavailable: HashSet<SceneId>,
}

impl SimulatedSceneHost {
    /// Create a host with the given scene already active
    #[must_use]
    pub fn new(active: SceneId) -> Self {
        Self {
            active: Arc::new(Mutex::new(active)),
            step: 0.25,
            unavailable: HashSet::new(),
        }
    }

    /// Override the per-poll progress step
    #[must_use]
    pub fn with_progress_step(mut self, step: f32) -> Self {
        self.step = step;
        self
    }

    /// Mark a scene as missing from the build (load will refuse)
    #[must_use]
    pub fn with_unavailable(mut self, scene: SceneId) -> Self {
        self.unavailable.insert(scene);
        self
    }
}

impl SceneHost for SimulatedSceneHost {
    fn begin_load(&mut self, scene: SceneId) -> Option<Box<dyn SceneLoadOperation>> {
        if self.unavailable.contains(&scene) {
            return None;
        }

        Some(Box::new(SimulatedLoadOperation {
            target: scene,
            step: self.step,
            progress: Mutex::new(0.0),
            activation_allowed: AtomicBool::new(false),
            active_slot: self.active.clone(),
        }))
    }

    fn active_scene(&self) -> SceneId {
        *self.active.lock().expect("active scene slot poisoned")
    }
}

struct SimulatedLoadOperation {
    target: SceneId,
    step: f32,
    progress: Mutex<f32>,
    activation_allowed: AtomicBool,
    active_slot: Arc<Mutex<SceneId>>,
}

#[async_trait]
impl SceneLoadOperation for SimulatedLoadOperation {
    fn progress(&self) -> f32 {
        let cap = if self.activation_allowed.load(Ordering::Acquire) {
            1.0
        } else {
            ACTIVATION_READY_PROGRESS
        };

        let mut progress = self.progress.lock().expect("progress slot poisoned");
        *progress = (*progress + self.step).min(cap);
        *progress
    }

    fn allow_activation(&self) {
        self.activation_allowed.store(true, Ordering::Release);
    }

    async fn wait_done(&self) {
        while self.progress() < 1.0 {
            yield_now().await;
        }
        *self.active_slot.lock().expect("active scene slot poisoned") = self.target;
    }
}
