//! Lifecycle demo application
//!
//! Drives every runtime subsystem through one session: startup on the
//! title scene, a transition into the game scene, pooled projectile
//! churn, a pause window round trip, and a clean shutdown.

use async_trait::async_trait;
use runtime_core::prelude::*;
use runtime_core::scene::SceneHost;
use runtime_core::ui::WindowBehaviour;

/// Title scene: owns nothing, just marks the menu being up
struct TitleScene;

#[async_trait]
impl SceneLifecycle for TitleScene {
    async fn initialize(&mut self) {
        log::info!("[TitleScene] menu is up");
    }

    async fn cleanup(&mut self) {
        log::info!("[TitleScene] menu torn down");
    }
}

/// Game scene: the play session proper
struct GameScene;

#[async_trait]
impl SceneLifecycle for GameScene {
    async fn initialize(&mut self) {
        log::info!("[GameScene] session started");
    }

    async fn cleanup(&mut self) {
        log::info!("[GameScene] session ended");
    }
}

/// Pause menu hook
struct PauseBehaviour;

impl WindowBehaviour for PauseBehaviour {
    fn on_opened(&self, _args: &[WindowArg]) {
        log::info!("[PauseBehaviour] game paused");
    }

    fn on_closed(&self, _args: &[WindowArg]) {
        log::info!("[PauseBehaviour] game resumed");
    }
}

fn catalog() -> AssetCatalog {
    let mut catalog = AssetCatalog::new()
        .with_entry("Actors/Bullet", AssetKind::Prefab)
        .with_entry("UI/Pause", AssetKind::Prefab)
        .with_entry("UI/Toast", AssetKind::Prefab);
    for layer in WindowLayer::ALL {
        catalog = catalog.with_entry(layer.surface_path(), AssetKind::Canvas);
    }
    catalog
}

fn scene_descriptors() -> Vec<SceneDescriptor> {
    vec![
        SceneDescriptor::new(SceneId::Title, Box::new(TitleScene)),
        SceneDescriptor::new(SceneId::Game, Box::new(GameScene)),
    ]
}

fn window_defs() -> Vec<WindowDef> {
    vec![
        WindowDef::new("Pause", WindowLayer::Popup)
            .with_behaviour(Box::new(|| Box::new(PauseBehaviour))),
        WindowDef::new("Toast", WindowLayer::System).destroy_on_close(),
    ]
}

fn host() -> Box<dyn SceneHost> {
    Box::new(SimulatedSceneHost::new(SceneId::Title))
}

async fn run() {
    let config = RuntimeConfig::default();
    let mut runtime =
        Runtime::start(config, catalog(), host(), scene_descriptors(), window_defs()).await;

    runtime.events().subscribe(
        GameEvent::GameStart,
        "demo",
        Box::new(|| log::info!("[demo] GameStart observed")),
    );

    if let Err(e) = runtime.scenes().request_transition(SceneId::Game).await {
        log::error!("[demo] transition failed: {e}");
        return;
    }
    runtime.events().dispatch(GameEvent::GameStart);

    // Pooled projectile churn: warm the pool, loan a few, hand them back.
    if let Some(bullet) = runtime.resources().load("Actors/Bullet", AssetKind::Prefab).await {
        runtime.pools().preload(&bullet, 8, 32);
        let volley: Vec<_> = (0..3).map(|_| runtime.pools().get(&bullet)).collect();
        for shot in &volley {
            runtime.pools().release(shot);
        }
        if let Some((free, outstanding)) = runtime.pools().pool_stats(&bullet) {
            log::info!("[demo] bullet pool: {free} free, {outstanding} on loan");
        }
    }

    // Pause round trip keeps the instance cached for the next open.
    match runtime.open_window("Pause", &[WindowArg::Text("from-demo".into())]).await {
        Ok(pause) => runtime.close_window(&pause, &[]),
        Err(e) => log::error!("[demo] pause window failed: {e}"),
    }

    runtime.events().dispatch(GameEvent::GameOver);
    runtime.shutdown();
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    run().await;
}
