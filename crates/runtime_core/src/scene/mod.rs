//! Scene lifecycle and transitions
//!
//! A scene is a declared id plus a lifecycle object (initialize /
//! cleanup). The engine substrate that actually loads scene content
//! sits behind [`SceneHost`]; [`SceneTransitionController`] is the
//! single-flight state machine that sequences teardown, engine load,
//! activation, and initialization around it.

mod host;
mod transition;

pub use host::{SceneHost, SceneLoadOperation, SimulatedSceneHost};
pub use transition::{SceneError, SceneTransitionController, ACTIVATION_READY_PROGRESS};

use async_trait::async_trait;

/// Declared scenes
///
/// Ids are for routing; the engine maps them to actual scene content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneId {
    /// Title screen
    Title,
    /// Lobby / menu hub
    Lobby,
    /// Main gameplay
    Game,
    /// Scratch scene for experiments
    Sample,
}

/// Per-scene lifecycle, awaited by the transition controller
///
/// `initialize` runs after the scene's content is fully activated;
/// `cleanup` runs before the scene is unloaded. Both are suspension
/// points: implementations may load resources, open windows, fade, etc.
#[async_trait]
pub trait SceneLifecycle: Send {
    /// Prepare the scene after activation
    async fn initialize(&mut self);

    /// Tear the scene down before it is replaced
    async fn cleanup(&mut self);
}

/// A scene registration: id plus lifecycle
///
/// Exactly one descriptor per declared id, registered once at startup
/// and immutable thereafter.
pub struct SceneDescriptor {
    /// Declared scene id
    pub id: SceneId,
    /// Lifecycle driven by the transition controller
    pub lifecycle: Box<dyn SceneLifecycle>,
}

impl SceneDescriptor {
    /// Register a scene
    #[must_use]
    pub fn new(id: SceneId, lifecycle: Box<dyn SceneLifecycle>) -> Self {
        Self { id, lifecycle }
    }
}
