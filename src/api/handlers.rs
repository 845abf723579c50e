//! HTTP endpoint handlers

use std::{convert::Infallible, sync::Arc};

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Json,
    },
};
use futures::stream::{self, Stream};
use tokio::sync::broadcast::error::RecvError;
use tracing::{error, info, warn};

use super::responses::{ApiResponse, HealthResponse, StatusResponse, StrokeInput};
use crate::{
    canvas::StrokeStart,
    state::{AppState, MoodPreset, Overlay, OverlayContent, StateError, MOODS},
};

/// Log a state failure and turn it into a 500
fn internal_error(action: &str, e: StateError) -> StatusCode {
    error!("Failed to {}: {}", action, e);
    StatusCode::INTERNAL_SERVER_ERROR
}

fn respond(
    state: &AppState,
    applied: bool,
    message: impl Into<String>,
) -> Result<Json<ApiResponse>, StatusCode> {
    let session = state
        .snapshot()
        .map_err(|e| internal_error("snapshot session", e))?;
    Ok(Json(if applied {
        ApiResponse::applied(message, session)
    } else {
        ApiResponse::ignored(message, session)
    }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

/// Handle GET /status - Return the whole session
pub async fn status_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StatusResponse>, StatusCode> {
    let session = state
        .snapshot()
        .map_err(|e| internal_error("snapshot session", e))?;

    Ok(Json(StatusResponse {
        session,
        uptime: state.get_uptime(),
        started_at: state.started_at,
    }))
}

/// Handle GET /events - Stream session events as server-sent events
pub async fn events_handler(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let events = state.subscribe();

    let stream = stream::unfold(events, |mut events| async move {
        loop {
            match events.recv().await {
                Ok(event) => match Event::default().json_data(&event) {
                    Ok(sse_event) => return Some((Ok(sse_event), events)),
                    Err(e) => warn!("Dropping unserializable event {:?}: {}", event, e),
                },
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Event subscriber lagged, {} events skipped", skipped);
                }
                Err(RecvError::Closed) => return None,
            }
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}

/// Handle GET /moods - The preset table
pub async fn moods_handler() -> Json<Vec<MoodPreset>> {
    Json(MOODS.to_vec())
}

/// Handle POST /mood/:label - Select a mood
pub async fn select_mood_handler(
    State(state): State<Arc<AppState>>,
    Path(label): Path<String>,
) -> Result<Json<ApiResponse>, StatusCode> {
    let active = state
        .select_mood(&label)
        .map_err(|e| internal_error("select mood", e))?;

    if active.label == label {
        respond(&state, true, format!("Mood set to {}", active.label))
    } else {
        respond(&state, false, format!("Unknown mood {}, keeping {}", label, active.label))
    }
}

/// Handle POST /breathe/start - Start the breathing cycle
pub async fn breathe_start_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse>, StatusCode> {
    let started = state
        .start_breathing()
        .map_err(|e| internal_error("start breathing", e))?;
    if started {
        respond(&state, true, "Breathing started")
    } else {
        respond(&state, false, "Breathing already running")
    }
}

/// Handle POST /breathe/stop - Stop the breathing cycle
pub async fn breathe_stop_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse>, StatusCode> {
    let stopped = state
        .stop_breathing()
        .map_err(|e| internal_error("stop breathing", e))?;
    if stopped {
        respond(&state, true, "Breathing stopped")
    } else {
        respond(&state, false, "Breathing was not running")
    }
}

/// Handle POST /breathe/toggle - The start/stop button
pub async fn breathe_toggle_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse>, StatusCode> {
    let status = state
        .toggle_breathing()
        .map_err(|e| internal_error("toggle breathing", e))?;
    info!("Breathing toggled, active={}", status.active);
    let message = if status.active { "Breathing started" } else { "Breathing stopped" };
    respond(&state, true, message)
}

/// Handle POST /overlay/:kind - Open an overlay
pub async fn overlay_open_handler(
    State(state): State<Arc<AppState>>,
    Path(kind): Path<String>,
) -> Result<Json<ApiResponse>, StatusCode> {
    let overlay: Overlay = kind.parse().map_err(|e| {
        warn!("{}", e);
        StatusCode::NOT_FOUND
    })?;

    state
        .open_overlay(overlay)
        .map_err(|e| internal_error("open overlay", e))?;
    respond(&state, true, format!("Overlay {} open", overlay))
}

/// Handle POST /overlay/close - Back to the main screen
pub async fn overlay_close_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse>, StatusCode> {
    state
        .close_overlay()
        .map_err(|e| internal_error("close overlay", e))?;
    respond(&state, true, "Overlay closed")
}

/// Handle GET /overlay/content - Static content of the open overlay
pub async fn overlay_content_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<OverlayContent>, StatusCode> {
    let overlay = state
        .current_overlay()
        .map_err(|e| internal_error("read overlay", e))?;
    Ok(Json(overlay.content()))
}

/// Handle POST /doodle/stroke/begin - Pen down
pub async fn stroke_begin_handler(
    State(state): State<Arc<AppState>>,
    Json(input): Json<StrokeInput>,
) -> Result<Json<ApiResponse>, StatusCode> {
    let start = state
        .begin_stroke(input.point(), input.source)
        .map_err(|e| internal_error("begin stroke", e))?;

    match start {
        StrokeStart::Ignored => respond(&state, false, "Doodle time is up"),
        StrokeStart::Drawing => respond(&state, true, "Stroke started"),
        StrokeStart::Started { .. } => respond(&state, true, "Stroke started, countdown running"),
    }
}

/// Handle POST /doodle/stroke/extend - Pen drag
pub async fn stroke_extend_handler(
    State(state): State<Arc<AppState>>,
    Json(input): Json<StrokeInput>,
) -> Result<Json<ApiResponse>, StatusCode> {
    let painted = state
        .extend_stroke(input.point(), input.source)
        .map_err(|e| internal_error("extend stroke", e))?;
    respond(&state, painted, if painted { "Stroke extended" } else { "Pen is up" })
}

/// Handle POST /doodle/stroke/end - Pen up
pub async fn stroke_end_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse>, StatusCode> {
    let lifted = state
        .end_stroke()
        .map_err(|e| internal_error("end stroke", e))?;
    respond(&state, lifted, "Stroke ended")
}

/// Handle POST /doodle/clear - Wipe the canvas and reset the countdown
pub async fn doodle_clear_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse>, StatusCode> {
    state
        .clear_doodle()
        .map_err(|e| internal_error("clear doodle", e))?;
    respond(&state, true, "Doodle cleared")
}

/// Handle GET /doodle.png - The canvas as an image
///
/// The ETag follows the pixel checksum, so it changes exactly when the
/// canvas does.
pub async fn doodle_png_handler(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, StatusCode> {
    let (png, checksum) = state
        .doodle_png()
        .map_err(|e| internal_error("encode doodle", e))?;
    let headers = [
        (header::CONTENT_TYPE, "image/png".to_string()),
        (header::ETAG, format!("\"{:016x}\"", checksum)),
    ];
    Ok((headers, png))
}
