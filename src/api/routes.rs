use crate::AppState;
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};

/// Largest accepted request body.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// Build the application router with its middleware stack.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(crate::api::handlers::ui::index))
        .route("/chat", post(crate::api::handlers::chat::chat))
        .route("/health", get(health_check))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
