// HTTP and WebSocket APIs

pub mod entity;
pub mod websocket;
pub mod world;

pub use entity::{create_entity_router, EntityAppState};
pub use websocket::{create_ws_router, ws_handler, WsAppState};
pub use world::{create_world_router, WorldAppState};
