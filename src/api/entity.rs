use crate::world::WorldStore;
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

/// Shared state for the entity API
pub struct EntityAppState {
    pub store: Arc<WorldStore>,
}

/// Error response
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

/// Create entity API router
pub fn create_entity_router(state: Arc<EntityAppState>) -> Router {
    Router::new()
        .route(
            "/entity/:id",
            get(get_entity).post(upsert_entity).put(upsert_entity),
        )
        .with_state(state)
}

/// GET /entity/:id - One entity's attributes. An absent entity reads as an
/// empty object, never as 404.
async fn get_entity(
    State(state): State<Arc<EntityAppState>>,
    Path(id): Path<String>,
) -> Json<Value> {
    let attributes = state.store.get(&id);
    Json(serde_json::to_value(attributes).unwrap_or(Value::Object(Default::default())))
}

/// POST|PUT /entity/:id - Set each field from the body on the entity.
///
/// Body is a JSON object of field → value; each field is applied as its own
/// `set` call (one mutation event per field). Responds with the entity's full
/// resulting attribute map.
async fn upsert_entity(
    State(state): State<Arc<EntityAppState>>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<Value>, EntityError> {
    let fields: Value =
        serde_json::from_slice(&body).map_err(|e| EntityError::InvalidBody(e.to_string()))?;

    let Value::Object(fields) = fields else {
        return Err(EntityError::BodyNotObject);
    };

    info!(entity_id = %id, fields = fields.len(), "Updating entity");

    for (key, value) in fields {
        state.store.set(&id, &key, value);
    }

    let attributes = state.store.get(&id);
    Ok(Json(
        serde_json::to_value(attributes).unwrap_or(Value::Object(Default::default())),
    ))
}

/// Entity write error types
#[derive(Debug)]
enum EntityError {
    InvalidBody(String),
    BodyNotObject,
}

impl IntoResponse for EntityError {
    fn into_response(self) -> Response {
        let message = match self {
            EntityError::InvalidBody(msg) => format!("invalid JSON body: {}", msg),
            EntityError::BodyNotObject => "body must be a JSON object of field to value".to_string(),
        };

        let body = Json(ErrorResponse { error: message });
        (StatusCode::BAD_REQUEST, body).into_response()
    }
}
