//! UI window stack
//!
//! Windows are one-per-type: a type is either open, parked in the
//! closed cache for reuse, or not instantiated at all. Every window is
//! mounted on one of six fixed display layers whose sort order equals
//! the layer's numeric priority; the layer surfaces are bulk-loaded at
//! startup and persist across scene transitions.
//!
//! Window types are declared in an explicit definition table
//! ([`WindowDef`]) rather than discovered reflectively: the table binds
//! a type name to its layer, open/close flags, and behaviour factory,
//! and the prefab path is derived from the name (`"UI/{name}"`).

mod window_stack;

pub use window_stack::{UiError, UiWindowStack};

use crate::assets::ResourceRef;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Fixed display layers, lowest priority renders beneath highest
///
/// Each variant's value is the sort order of its display surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowLayer {
    /// HP, score, minimap
    Hud = 0,
    /// Main menus, inventory, settings
    Ui = 100,
    /// Confirmations, rewards, notifications
    Popup = 200,
    /// Item descriptions, tooltips
    Tooltip = 300,
    /// Loading screens and fades
    Loading = 400,
    /// System alerts, errors, toasts
    System = 500,
}

impl WindowLayer {
    /// Every layer, in render order
    pub const ALL: [Self; 6] = [
        Self::Hud,
        Self::Ui,
        Self::Popup,
        Self::Tooltip,
        Self::Loading,
        Self::System,
    ];

    /// Sort order of this layer's display surface
    #[must_use]
    pub const fn sort_order(self) -> i32 {
        self as i32
    }

    /// Path of the surface canvas prefab for this layer
    #[must_use]
    pub const fn surface_path(self) -> &'static str {
        match self {
            Self::Hud => "UI/@HUD",
            Self::Ui => "UI/@UI",
            Self::Popup => "UI/@Popup",
            Self::Tooltip => "UI/@Tooltip",
            Self::Loading => "UI/@Loading",
            Self::System => "UI/@System",
        }
    }
}

/// Key-value argument passed through open/close hooks
#[derive(Debug, Clone, PartialEq)]
pub enum WindowArg {
    /// Integer payload
    Int(i64),
    /// Floating-point payload
    Float(f64),
    /// Text payload
    Text(String),
    /// Boolean payload
    Flag(bool),
}

/// Hooks a window may declare; absence is not an error
pub trait WindowBehaviour: Send + Sync {
    /// Called after the window is activated on open
    fn on_opened(&self, args: &[WindowArg]);

    /// Called before the window is deactivated on close
    fn on_closed(&self, args: &[WindowArg]);
}

/// Factory producing the behaviour attached to a window instance
pub type BehaviourFactory = Box<dyn Fn() -> Box<dyn WindowBehaviour> + Send + Sync>;

/// Definition-table entry for one window type
pub struct WindowDef {
    /// Window type name; prefab resolves at `"UI/{name}"`
    pub name: &'static str,
    /// Display layer the window mounts on
    pub layer: WindowLayer,
    /// Open immediately when instantiated, or park in the closed cache
    pub active_on_load: bool,
    /// Destroy on close instead of caching for reuse
    pub destroy_on_close: bool,
    behaviour: Option<BehaviourFactory>,
}

impl WindowDef {
    /// Define a window type on the given layer
    #[must_use]
    pub const fn new(name: &'static str, layer: WindowLayer) -> Self {
        Self {
            name,
            layer,
            active_on_load: true,
            destroy_on_close: false,
            behaviour: None,
        }
    }

    /// Park the window in the closed cache when first instantiated
    #[must_use]
    pub const fn inactive_on_load(mut self) -> Self {
        self.active_on_load = false;
        self
    }

    /// Destroy the window on close instead of caching it
    #[must_use]
    pub const fn destroy_on_close(mut self) -> Self {
        self.destroy_on_close = true;
        self
    }

    /// Attach a behaviour factory
    #[must_use]
    pub fn with_behaviour(mut self, factory: BehaviourFactory) -> Self {
        self.behaviour = Some(factory);
        self
    }

    /// Instantiate a window from this definition and its prefab
    #[must_use]
    pub(crate) fn instantiate(&self, prefab: &ResourceRef) -> WindowRef {
        log::debug!(
            "[UiWindowStack] instantiating {} under the {:?} surface",
            self.name,
            self.layer
        );
        Arc::new(Window {
            name: self.name,
            layer: self.layer,
            prefab: prefab.clone(),
            active_on_load: self.active_on_load,
            destroy_on_close: self.destroy_on_close,
            active: AtomicBool::new(false),
            behaviour: self.behaviour.as_ref().map(|factory| factory()),
        })
    }
}

/// A live window instance
pub struct Window {
    name: &'static str,
    layer: WindowLayer,
    prefab: ResourceRef,
    active_on_load: bool,
    destroy_on_close: bool,
    active: AtomicBool,
    behaviour: Option<Box<dyn WindowBehaviour>>,
}

/// Shared handle to a live window
pub type WindowRef = Arc<Window>;

impl Window {
    /// Window type name
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Display layer the window is mounted on
    #[must_use]
    pub const fn layer(&self) -> WindowLayer {
        self.layer
    }

    /// Prefab the window was instantiated from
    #[must_use]
    pub const fn prefab(&self) -> &ResourceRef {
        &self.prefab
    }

    /// Whether the window is currently open
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Whether the window is destroyed rather than cached on close
    #[must_use]
    pub const fn destroys_on_close(&self) -> bool {
        self.destroy_on_close
    }

    pub(crate) const fn opens_on_load(&self) -> bool {
        self.active_on_load
    }

    pub(crate) fn open(&self, args: &[WindowArg]) {
        self.active.store(true, Ordering::Release);
        if let Some(behaviour) = &self.behaviour {
            behaviour.on_opened(args);
        }
    }

    pub(crate) fn close(&self, args: &[WindowArg]) {
        if let Some(behaviour) = &self.behaviour {
            behaviour.on_closed(args);
        }
        self.active.store(false, Ordering::Release);
    }
}

impl fmt::Debug for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Window")
            .field("name", &self.name)
            .field("layer", &self.layer)
            .field("active", &self.is_active())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{AssetKind, Resource};

    #[test]
    fn test_layer_sort_orders() {
        assert_eq!(WindowLayer::Hud.sort_order(), 0);
        assert_eq!(WindowLayer::Ui.sort_order(), 100);
        assert_eq!(WindowLayer::System.sort_order(), 500);

        // Render order is strictly ascending.
        let orders: Vec<i32> = WindowLayer::ALL.iter().map(|l| l.sort_order()).collect();
        assert!(orders.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn test_window_instantiation_defaults() {
        let prefab = Resource::new("UI/Inventory", AssetKind::Prefab);
        let window = WindowDef::new("Inventory", WindowLayer::Ui).instantiate(&prefab);

        assert_eq!(window.name(), "Inventory");
        assert!(!window.is_active());
        assert!(window.opens_on_load());
        assert!(!window.destroys_on_close());
    }

    #[test]
    fn test_def_flags() {
        let prefab = Resource::new("UI/Toast", AssetKind::Prefab);
        let window = WindowDef::new("Toast", WindowLayer::System)
            .inactive_on_load()
            .destroy_on_close()
            .instantiate(&prefab);

        assert!(!window.opens_on_load());
        assert!(window.destroys_on_close());
    }
}
