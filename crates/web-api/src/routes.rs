use axum::{
    extract::{ws::WebSocketUpgrade, State},
    http::{HeaderValue, Method},
    response::Response,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use application::ApplicationError;

use crate::{error::ApiError, state::AppState, ws_connection::WebSocketConnection};

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

pub fn router(state: AppState) -> Router {
    let cors = cors_layer(&state.server.cors_origins);
    Router::new()
        .route("/health", get(health))
        .route("/ws", get(websocket_upgrade))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::warn!(origin = %origin, error = %err, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

async fn websocket_upgrade(
    State(state): State<AppState>,
    ws: WebSocketUpgrade,
) -> Result<Response, ApiError> {
    if state.hub.is_closed() {
        return Err(ApplicationError::HubUnavailable.into());
    }
    Ok(ws.on_upgrade(move |socket| async move {
        match WebSocketConnection::new(socket, state.hub).await {
            Ok(connection) => connection.run().await,
            Err(err) => tracing::error!(error = ?err, "Failed to open websocket session"),
        }
    }))
}
