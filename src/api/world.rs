use crate::world::WorldStore;
use axum::{
    extract::State,
    response::Json,
    routing::{get, post},
    Router,
};
use serde_json::Value;
use std::sync::Arc;

/// Shared state for the whole-world API
pub struct WorldAppState {
    pub store: Arc<WorldStore>,
}

/// Create world API router
pub fn create_world_router(state: Arc<WorldAppState>) -> Router {
    Router::new()
        .route("/world", get(get_world).post(get_world))
        .route("/clear", post(clear_world).get(clear_world))
        .with_state(state)
}

/// GET|POST /world - The whole world as one entity-id → attributes mapping
async fn get_world(State(state): State<Arc<WorldAppState>>) -> Json<Value> {
    let mut world = serde_json::Map::new();
    for (entity_id, attributes) in state.store.snapshot() {
        world.insert(
            entity_id,
            serde_json::to_value(attributes).unwrap_or(Value::Object(Default::default())),
        );
    }
    Json(Value::Object(world))
}

/// POST|GET /clear - Discard every entity
async fn clear_world(State(state): State<Arc<WorldAppState>>) -> Json<Value> {
    state.store.clear();
    Json(Value::Object(Default::default()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn create_test_state() -> Arc<WorldAppState> {
        Arc::new(WorldAppState {
            store: Arc::new(WorldStore::new()),
        })
    }

    #[tokio::test]
    async fn test_get_world_empty() {
        let state = create_test_state();
        let result = get_world(State(state)).await;
        assert_eq!(result.0, json!({}));
    }

    #[tokio::test]
    async fn test_get_world_includes_all_entities() {
        let state = create_test_state();
        state.store.set("a", "v", json!(1));
        state.store.set("b", "v", json!(2));

        let result = get_world(State(state)).await;
        assert_eq!(result.0, json!({"a": {"v": 1}, "b": {"v": 2}}));
    }

    #[tokio::test]
    async fn test_clear_empties_store() {
        let state = create_test_state();
        state.store.set("x", "score", json!(2));

        let result = clear_world(State(Arc::clone(&state))).await;

        assert_eq!(result.0, json!({}));
        assert_eq!(state.store.entity_count(), 0);
    }
}
