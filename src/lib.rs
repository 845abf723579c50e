//! Exhale - a headless host for a relaxation session
//!
//! Holds the ephemeral state of one session (mood, guided breathing, a
//! countdown-gated doodle canvas, overlays and a cosmetic presence counter)
//! and exposes it to a front end over a local HTTP control surface.

pub mod api;
pub mod canvas;
pub mod config;
pub mod state;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use config::{Config, SessionSettings};
pub use state::AppState;
pub use utils::signals::shutdown_signal;
