//! State management module
//!
//! Every component of a session lives here. Each one sits behind its own
//! mutex inside [`AppState`]; input events and timer callbacks perform their
//! whole update inside a single lock section.

pub mod app_state;
pub mod breathing;
pub mod countdown;
pub mod events;
pub mod mood;
pub mod overlay;
pub mod presence;

use std::sync::{Mutex, MutexGuard};

use crate::canvas::SurfaceError;

// Re-export main types
pub use app_state::{AppState, SessionSnapshot};
pub use breathing::{BreathPhase, BreathingSession, BreathingStatus};
pub use countdown::{Countdown, TickOutcome};
pub use events::{AppEvent, HapticCue};
pub use mood::{MoodPreset, MoodSelector, MOODS};
pub use overlay::{Overlay, OverlayContent, OverlaySlot};
pub use presence::Presence;

/// Errors surfaced by state operations
///
/// Domain guards never fail; only infrastructure problems end up here.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("failed to lock {0} state")]
    LockPoisoned(&'static str),

    #[error(transparent)]
    Surface(#[from] SurfaceError),
}

/// Lock a component, naming it in the error if the mutex is poisoned
pub(crate) fn lock<'a, T>(
    cell: &'a Mutex<T>,
    component: &'static str,
) -> Result<MutexGuard<'a, T>, StateError> {
    cell.lock().map_err(|_| StateError::LockPoisoned(component))
}
