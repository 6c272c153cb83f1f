use anyhow::{Context, Result};
use axum::{response::Redirect, routing::get, Router};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, services::ServeDir};
use tracing::info;
use worldsync::api::{
    create_entity_router, create_world_router, create_ws_router, EntityAppState, WorldAppState,
    WsAppState,
};
use worldsync::broadcast::BroadcastHub;
use worldsync::config::{self, WorldsyncConfig};
use worldsync::world::WorldStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "worldsync=info".into()),
        )
        .init();

    info!("Worldsync starting...");

    // Optional config path as first argument; defaults otherwise
    let config = match std::env::args().nth(1) {
        Some(path) => config::load_config(&path)?,
        None => WorldsyncConfig::default(),
    };

    let app = build_app(&config);

    let listener = tokio::net::TcpListener::bind(&config.server.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.bind_addr))?;
    info!(addr = %config.server.bind_addr, "Listening");

    axum::serve(listener, app)
        .await
        .context("Server terminated")?;

    Ok(())
}

/// Wire the core (store + hub) and assemble the full router.
fn build_app(config: &WorldsyncConfig) -> Router {
    let store = Arc::new(WorldStore::new());
    let hub = Arc::new(BroadcastHub::new());

    // The hub is the sole production mutation listener
    store.add_listener(hub.clone());

    Router::new()
        .route("/", get(|| async { Redirect::to("/static/index.html") }))
        .nest_service("/static", ServeDir::new(&config.server.static_dir))
        .merge(create_entity_router(Arc::new(EntityAppState {
            store: Arc::clone(&store),
        })))
        .merge(create_world_router(Arc::new(WorldAppState {
            store: Arc::clone(&store),
        })))
        .merge(create_ws_router(Arc::new(WsAppState { store, hub })))
        .layer(CorsLayer::permissive())
}
