//! Runtime assembly and lifecycle
//!
//! One explicit startup sequence wires every subsystem together and one
//! shutdown sequence tears them down in reverse. Subsystems never reach
//! for each other through globals; everything they need is handed to
//! them here.

use crate::assets::{AssetCatalog, PackagedHandler, RemoteHandler, ResourceCache, ResourceHandler};
use crate::config::{ResourceBackendKind, RuntimeConfig};
use crate::events::{EventBus, GameEvent};
use crate::pool::{BasicInstantiator, ObjectPoolRegistry};
use crate::scene::{SceneDescriptor, SceneHost, SceneTransitionController};
use crate::ui::{UiError, UiWindowStack, WindowArg, WindowDef, WindowRef};

/// Owner of every runtime subsystem
///
/// Holds the event bus, resource cache, pool registry, scene controller,
/// and window stack for the life of the process. Callers reach
/// subsystems through the accessors; compound operations that need two
/// subsystems at once (opening a window resolves its prefab through the
/// cache) live here.
pub struct Runtime {
    config: RuntimeConfig,
    bus: EventBus,
    cache: ResourceCache,
    pools: ObjectPoolRegistry,
    scenes: SceneTransitionController,
    windows: UiWindowStack,
    shut_down: bool,
}

impl Runtime {
    /// Bring every subsystem up in one pass
    ///
    /// Order: resource cache over the configured backend, pool registry,
    /// scene controller with the startup scene bound (initialize only,
    /// no predecessor to clean up), UI display surfaces, then an
    /// `ApplicationStart` dispatch on the fresh bus.
    pub async fn start(
        config: RuntimeConfig,
        catalog: AssetCatalog,
        host: Box<dyn SceneHost>,
        descriptors: Vec<SceneDescriptor>,
        window_defs: Vec<WindowDef>,
    ) -> Self {
        log::info!("[Runtime] starting with {:?} resource backend", config.resource_backend);

        let handler: Box<dyn ResourceHandler> = match config.resource_backend {
            ResourceBackendKind::Packaged => Box::new(PackagedHandler::new(catalog)),
            ResourceBackendKind::Remote => Box::new(RemoteHandler::new(catalog)),
        };
        let mut cache = ResourceCache::new(handler);

        let pools = ObjectPoolRegistry::new(Box::new(BasicInstantiator::new()), config.pool);

        let scenes = SceneTransitionController::new(host, descriptors);
        scenes.bind_startup_scene().await;

        let mut windows = UiWindowStack::new(window_defs);
        windows.initialize(&mut cache).await;

        let bus = EventBus::new();
        bus.dispatch(GameEvent::ApplicationStart);

        Self {
            config,
            bus,
            cache,
            pools,
            scenes,
            windows,
            shut_down: false,
        }
    }

    /// Tear every subsystem down, exactly once
    ///
    /// Order: `ApplicationQuit` dispatch while subscribers still exist,
    /// window stack, pools, cache, then the bus itself. A second call
    /// warns and does nothing.
    pub fn shutdown(&mut self) {
        if self.shut_down {
            log::warn!("[Runtime] shutdown called twice");
            return;
        }
        self.shut_down = true;

        log::info!("[Runtime] shutting down");
        self.bus.dispatch(GameEvent::ApplicationQuit);
        self.windows.shutdown();
        self.pools.clear_all();
        self.cache.release_all();
        self.bus.clear();
    }

    /// Open a window, resolving its prefab through the resource cache
    pub async fn open_window(&mut self, name: &str, args: &[WindowArg]) -> Result<WindowRef, UiError> {
        self.windows.open(name, args, &mut self.cache).await
    }

    /// Close an open window
    pub fn close_window(&mut self, window: &WindowRef, args: &[WindowArg]) {
        self.windows.close(window, args);
    }

    /// The configuration the runtime was started with
    #[must_use]
    pub const fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// The application event bus
    pub fn events(&mut self) -> &mut EventBus {
        &mut self.bus
    }

    /// The resource cache
    pub fn resources(&mut self) -> &mut ResourceCache {
        &mut self.cache
    }

    /// The object pool registry
    pub fn pools(&mut self) -> &mut ObjectPoolRegistry {
        &mut self.pools
    }

    /// The scene transition controller
    #[must_use]
    pub const fn scenes(&self) -> &SceneTransitionController {
        &self.scenes
    }

    /// The UI window stack
    #[must_use]
    pub const fn windows(&self) -> &UiWindowStack {
        &self.windows
    }
}

impl Drop for Runtime {
    fn drop(&mut self) {
        if !self.shut_down {
            log::warn!("[Runtime] dropped without shutdown; tearing down now");
            self.shutdown();
        }
    }
}
