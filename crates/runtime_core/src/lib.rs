//! # Runtime Core
//!
//! The runtime lifecycle core of an interactive application: loading,
//! caching, reuse, and teardown of heavyweight runtime resources under a
//! cooperative single-threaded concurrency model.
//!
//! ## Subsystems
//!
//! - **Resource cache**: deduplicating cache over a pluggable async
//!   loading strategy (packaged or remote backend)
//! - **Object pools**: bounded per-prototype pools with lifecycle hooks
//! - **Scene transitions**: single-flight state machine sequencing
//!   cleanup, engine load, activation, and initialization
//! - **UI window stack**: one live instance per window type, multiplexed
//!   across open/closed sets on priority-ordered display layers
//!
//! "Asynchronous" here means suspension points within one logical thread
//! of control: every `async fn` in this crate is written to run on a
//! current-thread executor, and mutual exclusion is a matter of boolean
//! reentrancy flags checked before any suspension point, not locks held
//! across threads.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use runtime_core::prelude::*;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     runtime_core::foundation::logging::init();
//!
//!     let catalog = AssetCatalog::new()
//!         .with_entry("UI/@HUD", AssetKind::Canvas)
//!         .with_entry("UI/@UI", AssetKind::Canvas)
//!         .with_entry("UI/@Popup", AssetKind::Canvas)
//!         .with_entry("UI/@Tooltip", AssetKind::Canvas)
//!         .with_entry("UI/@Loading", AssetKind::Canvas)
//!         .with_entry("UI/@System", AssetKind::Canvas);
//!
//!     let mut runtime = Runtime::start(
//!         RuntimeConfig::default(),
//!         catalog,
//!         Box::new(SimulatedSceneHost::new(SceneId::Title)),
//!         Vec::new(),
//!         Vec::new(),
//!     )
//!     .await;
//!
//!     runtime.scenes().request_transition(SceneId::Game).await.ok();
//!     runtime.shutdown();
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod assets;
pub mod config;
pub mod events;
pub mod foundation;
pub mod pool;
pub mod scene;
pub mod ui;

mod runtime;

pub use runtime::Runtime;

/// Common imports for runtime users
pub mod prelude {
    pub use crate::{
        assets::{AssetCatalog, AssetKind, ResourceCache, ResourceRef},
        config::{Config, ConfigError, PoolConfig, ResourceBackendKind, RuntimeConfig},
        events::{EventBus, GameEvent},
        pool::{InstanceRef, ObjectPoolRegistry, Poolable},
        scene::{
            SceneDescriptor, SceneError, SceneId, SceneLifecycle, SceneTransitionController,
            SimulatedSceneHost,
        },
        ui::{UiError, UiWindowStack, WindowArg, WindowDef, WindowLayer, WindowRef},
        Runtime,
    };
}
