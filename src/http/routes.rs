use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::trace::TraceLayer;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Session control
        .route("/interpreter/record/:side", post(handlers::press_record))
        .route("/interpreter/stop", post(handlers::stop_recording))
        .route("/interpreter/status", get(handlers::get_status))
        .route("/interpreter/language/:side", put(handlers::set_language))
        // Preferences
        .route(
            "/preferences/theme",
            get(handlers::get_theme).put(handlers::set_theme),
        )
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
