use crate::broadcast::BroadcastHub;
use crate::subscription::SubscriberSession;
use crate::world::WorldStore;
use axum::{
    extract::{ws::WebSocketUpgrade, State},
    response::Response,
    routing::get,
    Router,
};
use std::sync::Arc;
use tracing::info;

/// Shared application state for the WebSocket handler
#[derive(Clone)]
pub struct WsAppState {
    pub store: Arc<WorldStore>,
    pub hub: Arc<BroadcastHub>,
}

/// GET /subscribe - WebSocket upgrade handler
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<WsAppState>>) -> Response {
    info!("WebSocket upgrade request received");
    ws.on_upgrade(move |socket| {
        SubscriberSession::new(Arc::clone(&state.store), Arc::clone(&state.hub)).run(socket)
    })
}

/// Create WebSocket router
pub fn create_ws_router(state: Arc<WsAppState>) -> Router {
    Router::new()
        .route("/subscribe", get(ws_handler))
        .with_state(state)
}
