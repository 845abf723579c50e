//! API response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    canvas::{InputSource, Point},
    state::SessionSnapshot,
};

/// Response to every input event: what happened plus the resulting session
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub session: SessionSnapshot,
}

impl ApiResponse {
    /// Create a new API response
    pub fn new(status: &str, message: impl Into<String>, session: SessionSnapshot) -> Self {
        Self {
            status: status.to_string(),
            message: message.into(),
            timestamp: Utc::now(),
            session,
        }
    }

    /// The event changed the session
    pub fn applied(message: impl Into<String>, session: SessionSnapshot) -> Self {
        Self::new("applied", message, session)
    }

    /// The event was valid but a guard turned it into a no-op
    pub fn ignored(message: impl Into<String>, session: SessionSnapshot) -> Self {
        Self::new("ignored", message, session)
    }
}

/// Status response with session metadata
#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    pub session: SessionSnapshot,
    pub uptime: String,
    pub started_at: DateTime<Utc>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Body of stroke begin/extend requests
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct StrokeInput {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub source: InputSource,
}

impl StrokeInput {
    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}
