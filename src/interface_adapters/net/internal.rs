use crate::interface_adapters::http::error_response;
use crate::interface_adapters::net::client::spawn_session_serializer;
use crate::interface_adapters::state::AppState;
use crate::interface_adapters::utils::rng;
use crate::use_cases::RegistryError;

use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;

#[derive(Debug, Default, serde::Deserialize)]
pub struct SessionInitRequest {
    // Caller-chosen id; generated when omitted.
    #[serde(default)]
    session_id: Option<String>,
    // Pins procedural generation for reproducible worlds.
    #[serde(default)]
    seed: Option<u64>,
}

#[derive(Debug, serde::Serialize)]
struct SessionInitResponse {
    session_id: String,
    seed: u64,
}

pub async fn create_session_handler(
    State(state): State<Arc<AppState>>,
    payload: Option<Json<SessionInitRequest>>,
) -> impl IntoResponse {
    let payload = payload.map(|Json(p)| p).unwrap_or_default();

    let session_id = match payload.session_id {
        Some(id) => id.trim().to_string(),
        None => rng::session_id(),
    };
    if session_id.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "session_id must not be blank");
    }
    let seed = payload.seed.unwrap_or_else(rng::world_seed);

    match state
        .session_registry
        .create_session(session_id.clone(), seed)
        .await
    {
        Ok(session) => {
            // Create serializers so clients can subscribe immediately.
            spawn_session_serializer(&session);
            (
                StatusCode::CREATED,
                Json(SessionInitResponse { session_id, seed }),
            )
                .into_response()
        }
        Err(RegistryError::AlreadyExists) => {
            error_response(StatusCode::CONFLICT, "session already exists")
        }
    }
}
