//! Exhale - a headless host for a relaxation session
//!
//! This is the main entry point for the exhale application.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use exhale::{api::create_router, config::Config, state::AppState, utils::shutdown_signal};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("exhale={},tower_http=info", config.log_level()))
        .init();

    info!("Starting exhale v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration: host={}, port={}, canvas={}x{}@{}x",
        config.host, config.port, config.canvas_width, config.canvas_height, config.pixel_ratio
    );

    // Create the session and mount the doodle canvas
    let state = Arc::new(AppState::new(&config.session_settings())?);
    state.start_background_tasks()?;

    let app = create_router(Arc::clone(&state));

    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Session running on http://{}", addr);
    info!("Endpoints:");
    info!("  GET  /status                 - Whole session snapshot");
    info!("  GET  /events                 - Feedback event stream (SSE)");
    info!("  POST /mood/:label            - Select a mood");
    info!("  POST /breathe/toggle         - Start or stop breathing");
    info!("  POST /overlay/:kind          - Open sounds, kindness or doodle");
    info!("  POST /doodle/stroke/begin    - Pen down {{x, y, source}}");
    info!("  POST /doodle/clear           - Wipe the canvas");
    info!("  GET  /doodle.png             - Canvas snapshot");

    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        signal = shutdown_signal() => {
            if let Err(e) = signal {
                tracing::error!("Signal handling failed: {}", e);
            }
            info!("Shutdown signal received");
        }
    }

    state.teardown()?;
    info!("Session closed");
    Ok(())
}
