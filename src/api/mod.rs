pub mod auth;
pub mod chat;
pub mod cookie;
pub mod middleware;
pub mod state;
pub mod users;

pub use state::AppState;

use axum::{
    http::{header, HeaderValue, Method},
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use serde::Serialize;
use std::time::Duration;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::error::AppError;

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

pub fn create_router(state: AppState) -> Result<Router, AppError> {
    let origin = state
        .config
        .cors_origin
        .parse::<HeaderValue>()
        .map_err(|e| AppError::Config(format!("Invalid CORS_ORIGIN: {}", e)))?;

    // The session cookie rules out a wildcard origin: one configured frontend
    // origin, credentials allowed.
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true);

    let protected = Router::new()
        .route("/api/auth/me", get(auth::me))
        .route("/api/users/search", get(users::search))
        .route("/api/chat/send", post(chat::send_message))
        .route("/api/chat/messages", get(chat::get_messages))
        .route("/api/chat/conversations", get(chat::conversations))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::require_auth,
        ));

    let router = Router::new()
        // Health check
        .route("/api/health", get(health))
        // Authentication endpoints (no session required)
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .merge(protected)
        // Add request timeout
        .layer(TimeoutLayer::new(Duration::from_secs(
            state.config.request_timeout_secs,
        )))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(router)
}

async fn health() -> axum::Json<HealthResponse> {
    axum::Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
