//! HTTP control surface
//!
//! Maps each request to one UI input event and answers with the resulting
//! session snapshot. Feedback leaves through the `/events` stream.

pub mod handlers;
pub mod responses;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/status", get(status_handler))
        .route("/events", get(events_handler))
        .route("/moods", get(moods_handler))
        .route("/mood/:label", post(select_mood_handler))
        .route("/breathe/start", post(breathe_start_handler))
        .route("/breathe/stop", post(breathe_stop_handler))
        .route("/breathe/toggle", post(breathe_toggle_handler))
        .route("/overlay/close", post(overlay_close_handler))
        .route("/overlay/content", get(overlay_content_handler))
        .route("/overlay/:kind", post(overlay_open_handler))
        .route("/doodle/stroke/begin", post(stroke_begin_handler))
        .route("/doodle/stroke/extend", post(stroke_extend_handler))
        .route("/doodle/stroke/end", post(stroke_end_handler))
        .route("/doodle/clear", post(doodle_clear_handler))
        .route("/doodle.png", get(doodle_png_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
