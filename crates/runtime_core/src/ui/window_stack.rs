//! Open/closed window multiplexing over the display layers

use super::{WindowArg, WindowDef, WindowLayer, WindowRef};
use crate::assets::{AssetKind, ResourceCache, ResourceRef};
use std::collections::HashMap;
use thiserror::Error;

/// UI window stack failures
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UiError {
    /// The display surfaces have not finished loading yet
    #[error("UI window stack is not initialized")]
    NotInitialized,

    /// No definition-table entry for the requested type
    #[error("no window definition for {0}")]
    UnknownWindow(String),

    /// The window's prefab could not be resolved
    #[error("window prefab missing at {0}")]
    ResourceMissing(String),
}

/// One loaded display surface
struct Surface {
    canvas: ResourceRef,
    sort_order: i32,
}

/// Per-type window multiplexer across open/closed sets
///
/// Invariant: a window type is in at most one of the open set and the
/// closed cache - never both, never duplicated.
pub struct UiWindowStack {
    defs: HashMap<&'static str, WindowDef>,
    open: HashMap<&'static str, WindowRef>,
    closed: HashMap<&'static str, WindowRef>,
    surfaces: HashMap<WindowLayer, Surface>,
    initialized: bool,
}

impl UiWindowStack {
    /// Create a stack over the given window definition table
    #[must_use]
    pub fn new(defs: Vec<WindowDef>) -> Self {
        let defs = defs.into_iter().map(|def| (def.name, def)).collect();
        Self {
            defs,
            open: HashMap::new(),
            closed: HashMap::new(),
            surfaces: HashMap::new(),
            initialized: false,
        }
    }

    /// Load the six display surfaces
    ///
    /// Must complete before any [`open`](Self::open) call is serviced.
    /// The surfaces persist across scene transitions; only
    /// [`shutdown`](Self::shutdown) destroys them. A missing surface
    /// prefab leaves the stack uninitialized with an error logged.
    pub async fn initialize(&mut self, cache: &mut ResourceCache) {
        if self.initialized {
            log::warn!("[UiWindowStack] already initialized");
            return;
        }

        for layer in WindowLayer::ALL {
            let path = layer.surface_path();
            let Some(canvas) = cache.load(path, AssetKind::Canvas).await else {
                log::error!("[UiWindowStack] surface canvas missing at {path}");
                return;
            };
            self.surfaces.insert(
                layer,
                Surface {
                    canvas,
                    sort_order: layer.sort_order(),
                },
            );
        }

        self.initialized = true;
        log::info!("[UiWindowStack] initialized {} display surfaces", self.surfaces.len());
    }

    /// Open a window, instantiating it on first use
    ///
    /// Idempotent for an already-open type: the live instance is
    /// returned and open side effects do not re-fire. A cached-closed
    /// instance is promoted to the front of its layer instead of being
    /// re-instantiated. A cold open resolves the prefab through the
    /// resource cache and suspends; warm paths complete synchronously.
    pub async fn open(
        &mut self,
        name: &str,
        args: &[WindowArg],
        cache: &mut ResourceCache,
    ) -> Result<WindowRef, UiError> {
        if !self.initialized {
            log::warn!("[UiWindowStack] open({name}) before surfaces finished loading");
            return Err(UiError::NotInitialized);
        }

        if let Some(window) = self.open.get(name) {
            return Ok(window.clone());
        }

        let Some(def) = self.defs.get(name) else {
            log::warn!("[UiWindowStack] no window definition for {name}");
            return Err(UiError::UnknownWindow(name.to_string()));
        };
        let key = def.name;

        if let Some(window) = self.closed.remove(key) {
            log::debug!("[UiWindowStack] reopening cached {key} at the front of {:?}", window.layer());
            self.open.insert(key, window.clone());
            window.open(args);
            return Ok(window);
        }

        let path = format!("UI/{key}");
        let Some(prefab) = cache.load(&path, AssetKind::Prefab).await else {
            return Err(UiError::ResourceMissing(path));
        };

        let window = self.defs[key].instantiate(&prefab);
        if window.opens_on_load() {
            self.open.insert(key, window.clone());
            window.open(args);
        } else {
            self.closed.insert(key, window.clone());
        }
        Ok(window)
    }

    /// Close an open window
    ///
    /// Requires the type to be open; otherwise a warning is logged and
    /// nothing happens. Destroy-on-close windows are dropped outright,
    /// everything else moves to the closed cache for reuse.
    pub fn close(&mut self, window: &WindowRef, args: &[WindowArg]) {
        let Some(held) = self.open.remove(window.name()) else {
            log::warn!("[UiWindowStack] close of {} but it is not open", window.name());
            return;
        };

        held.close(args);
        if held.destroys_on_close() {
            log::debug!("[UiWindowStack] destroyed {}", held.name());
        } else {
            self.closed.insert(held.name(), held);
        }
    }

    /// Look up the live instance of an open window type
    #[must_use]
    pub fn get_open(&self, name: &str) -> Option<WindowRef> {
        self.open.get(name).cloned()
    }

    /// Sort order of a loaded display surface
    #[must_use]
    pub fn surface_sort_order(&self, layer: WindowLayer) -> Option<i32> {
        self.surfaces.get(&layer).map(|surface| surface.sort_order)
    }

    /// Path of the canvas backing a loaded display surface
    #[must_use]
    pub fn surface_canvas(&self, layer: WindowLayer) -> Option<&ResourceRef> {
        self.surfaces.get(&layer).map(|surface| &surface.canvas)
    }

    /// Whether the display surfaces have finished loading
    #[must_use]
    pub const fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Number of open windows
    #[must_use]
    pub fn open_count(&self) -> usize {
        self.open.len()
    }

    /// Number of cached-closed windows
    #[must_use]
    pub fn closed_count(&self) -> usize {
        self.closed.len()
    }

    /// Destroy every open and cached window and the display surfaces
    pub fn shutdown(&mut self) {
        log::info!(
            "[UiWindowStack] shutting down ({} open, {} cached)",
            self.open.len(),
            self.closed.len()
        );
        self.open.clear();
        self.closed.clear();
        self.surfaces.clear();
        self.initialized = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{AssetCatalog, PackagedHandler};
    use crate::ui::WindowBehaviour;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Default)]
    struct HookCounts {
        opened: AtomicUsize,
        closed: AtomicUsize,
    }

    struct CountingBehaviour(Arc<HookCounts>);

    impl WindowBehaviour for CountingBehaviour {
        fn on_opened(&self, _args: &[WindowArg]) {
            self.0.opened.fetch_add(1, Ordering::Relaxed);
        }

        fn on_closed(&self, _args: &[WindowArg]) {
            self.0.closed.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn ui_catalog() -> AssetCatalog {
        let mut catalog = AssetCatalog::new()
            .with_entry("UI/Inventory", AssetKind::Prefab)
            .with_entry("UI/Toast", AssetKind::Prefab)
            .with_entry("UI/Minimap", AssetKind::Prefab);
        for layer in WindowLayer::ALL {
            catalog = catalog.with_entry(layer.surface_path(), AssetKind::Canvas);
        }
        catalog
    }

    fn cache() -> ResourceCache {
        ResourceCache::new(Box::new(PackagedHandler::new(ui_catalog())))
    }

    fn defs(hooks: &Arc<HookCounts>) -> Vec<WindowDef> {
        let inventory_hooks = hooks.clone();
        let toast_hooks = hooks.clone();
        vec![
            WindowDef::new("Inventory", WindowLayer::Ui).with_behaviour(Box::new(move || {
                Box::new(CountingBehaviour(inventory_hooks.clone()))
            })),
            WindowDef::new("Toast", WindowLayer::System)
                .destroy_on_close()
                .with_behaviour(Box::new(move || {
                    Box::new(CountingBehaviour(toast_hooks.clone()))
                })),
            WindowDef::new("Minimap", WindowLayer::Hud).inactive_on_load(),
        ]
    }

    async fn initialized_stack() -> (UiWindowStack, ResourceCache, Arc<HookCounts>) {
        let hooks = Arc::new(HookCounts::default());
        let mut stack = UiWindowStack::new(defs(&hooks));
        let mut cache = cache();
        stack.initialize(&mut cache).await;
        assert!(stack.is_initialized());
        (stack, cache, hooks)
    }

    #[tokio::test]
    async fn test_open_before_initialize_fails() {
        let hooks = Arc::new(HookCounts::default());
        let mut stack = UiWindowStack::new(defs(&hooks));
        let mut cache = cache();

        let result = stack.open("Inventory", &[], &mut cache).await;
        assert_eq!(result.unwrap_err(), UiError::NotInitialized);
    }

    #[tokio::test]
    async fn test_initialize_loads_ordered_surfaces() {
        let (stack, _, _) = initialized_stack().await;

        for layer in WindowLayer::ALL {
            assert_eq!(stack.surface_sort_order(layer), Some(layer.sort_order()));
        }
    }

    #[tokio::test]
    async fn test_missing_surface_leaves_uninitialized() {
        let mut stack = UiWindowStack::new(Vec::new());
        // Empty catalog: no surface canvases exist.
        let mut cache = ResourceCache::new(Box::new(PackagedHandler::new(AssetCatalog::new())));

        stack.initialize(&mut cache).await;
        assert!(!stack.is_initialized());
    }

    #[tokio::test]
    async fn test_open_is_idempotent() {
        let (mut stack, mut cache, hooks) = initialized_stack().await;

        let first = stack.open("Inventory", &[], &mut cache).await.unwrap();
        let second = stack.open("Inventory", &[], &mut cache).await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        // The open hook fired exactly once.
        assert_eq!(hooks.opened.load(Ordering::Relaxed), 1);
        assert_eq!(stack.open_count(), 1);
    }

    #[tokio::test]
    async fn test_close_caches_and_reopen_reuses() {
        let (mut stack, mut cache, hooks) = initialized_stack().await;

        let opened = stack.open("Inventory", &[], &mut cache).await.unwrap();
        stack.close(&opened, &[]);
        assert!(!opened.is_active());
        assert_eq!(stack.open_count(), 0);
        assert_eq!(stack.closed_count(), 1);

        let reopened = stack.open("Inventory", &[], &mut cache).await.unwrap();
        assert!(Arc::ptr_eq(&opened, &reopened));
        assert!(reopened.is_active());
        assert_eq!(hooks.opened.load(Ordering::Relaxed), 2);
        assert_eq!(stack.closed_count(), 0);
    }

    #[tokio::test]
    async fn test_destroy_on_close_is_not_cached() {
        let (mut stack, mut cache, _) = initialized_stack().await;

        let toast = stack.open("Toast", &[], &mut cache).await.unwrap();
        stack.close(&toast, &[]);
        assert_eq!(stack.closed_count(), 0);

        let fresh = stack.open("Toast", &[], &mut cache).await.unwrap();
        assert!(!Arc::ptr_eq(&toast, &fresh));
    }

    #[tokio::test]
    async fn test_inactive_on_load_parks_in_closed_cache() {
        let (mut stack, mut cache, _) = initialized_stack().await;

        let minimap = stack.open("Minimap", &[], &mut cache).await.unwrap();
        assert!(!minimap.is_active());
        assert_eq!(stack.open_count(), 0);
        assert_eq!(stack.closed_count(), 1);
        assert!(stack.get_open("Minimap").is_none());

        // A later open promotes the parked instance.
        let promoted = stack.open("Minimap", &[], &mut cache).await.unwrap();
        assert!(Arc::ptr_eq(&minimap, &promoted));
        assert!(promoted.is_active());
    }

    #[tokio::test]
    async fn test_close_of_unopened_is_noop() {
        let (mut stack, mut cache, hooks) = initialized_stack().await;

        let opened = stack.open("Inventory", &[], &mut cache).await.unwrap();
        stack.close(&opened, &[]);
        // Second close: type no longer open, warn and do nothing.
        stack.close(&opened, &[]);
        assert_eq!(hooks.closed.load(Ordering::Relaxed), 1);
        assert_eq!(stack.closed_count(), 1);
    }

    #[tokio::test]
    async fn test_unknown_window_rejected() {
        let (mut stack, mut cache, _) = initialized_stack().await;

        let result = stack.open("Codex", &[], &mut cache).await;
        assert_eq!(result.unwrap_err(), UiError::UnknownWindow("Codex".into()));
    }

    #[tokio::test]
    async fn test_open_args_reach_the_hook() {
        struct ExpectArgs;

        impl WindowBehaviour for ExpectArgs {
            fn on_opened(&self, args: &[WindowArg]) {
                assert_eq!(args, &[WindowArg::Int(3), WindowArg::Text("gold".into())]);
            }

            fn on_closed(&self, args: &[WindowArg]) {
                assert!(args.is_empty());
            }
        }

        let defs = vec![WindowDef::new("Inventory", WindowLayer::Ui)
            .with_behaviour(Box::new(|| Box::new(ExpectArgs)))];
        let mut stack = UiWindowStack::new(defs);
        let mut cache = cache();
        stack.initialize(&mut cache).await;

        let args = [WindowArg::Int(3), WindowArg::Text("gold".into())];
        let window = stack.open("Inventory", &args, &mut cache).await.unwrap();
        stack.close(&window, &[]);
    }

    #[tokio::test]
    async fn test_shutdown_empties_both_sets() {
        let (mut stack, mut cache, _) = initialized_stack().await;

        let inventory = stack.open("Inventory", &[], &mut cache).await.unwrap();
        stack.open("Minimap", &[], &mut cache).await.unwrap();
        drop(inventory);

        stack.shutdown();
        assert_eq!(stack.open_count(), 0);
        assert_eq!(stack.closed_count(), 0);
        assert!(!stack.is_initialized());
    }
}
