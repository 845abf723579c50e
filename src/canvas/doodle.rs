//! Countdown-gated doodle session

use serde::Serialize;
use tiny_skia::Color;
use tracing::{debug, info};

use super::surface::{DrawingSurface, Point};
use crate::state::countdown::{Countdown, TickOutcome};
use crate::tasks::TimerHandle;

/// Shown once the countdown runs out
pub const EXPIRY_NOTICE: &str = "Energy released. Let it be.";

/// What [`DoodleZone::begin_stroke`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrokeStart {
    /// The countdown has expired; nothing was painted
    Ignored,
    /// Pen down on an already running session
    Drawing,
    /// Pen down, and this stroke started the countdown run `epoch`
    Started { epoch: u64 },
}

/// Doodle state as seen by a renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DoodleStatus {
    pub remaining_seconds: u32,
    pub running: bool,
    pub expired: bool,
    pub pen_down: bool,
    /// Nothing painted since mount or the last clear
    pub blank: bool,
    pub notice: Option<&'static str>,
    pub width: u32,
    pub height: u32,
}

/// A drawing surface together with the countdown that gates it
///
/// Owned by the app state for the lifetime of the process so that closing
/// the doodle overlay does not lose the session. The running countdown's
/// tick task is held in `ticker`; `epoch` changes on every clear so a tick
/// scheduled for an abandoned session is recognised as stale.
#[derive(Debug)]
pub struct DoodleZone {
    surface: DrawingSurface,
    countdown: Countdown,
    epoch: u64,
    ticker: Option<TimerHandle>,
}

impl DoodleZone {
    pub fn new(surface: DrawingSurface) -> Self {
        Self {
            surface,
            countdown: Countdown::new(),
            epoch: 0,
            ticker: None,
        }
    }

    pub fn surface(&self) -> &DrawingSurface {
        &self.surface
    }

    pub fn status(&self) -> DoodleStatus {
        let (width, height) = self.surface.dimensions();
        let expired = self.countdown.is_expired();
        DoodleStatus {
            remaining_seconds: self.countdown.remaining_seconds(),
            running: self.countdown.is_running(),
            expired,
            pen_down: self.surface.is_pen_down(),
            blank: self.surface.is_blank(),
            notice: expired.then_some(EXPIRY_NOTICE),
            width,
            height,
        }
    }

    /// Ink for strokes begun from now on
    pub fn set_ink(&mut self, ink: Color) {
        self.surface.set_ink(ink);
    }

    /// Pen down at `point`
    ///
    /// Ignored once the countdown has expired. The first stroke of a session
    /// starts the countdown; the caller is expected to schedule its ticks for
    /// the returned epoch.
    pub fn begin_stroke(&mut self, point: Point) -> StrokeStart {
        if self.countdown.is_expired() {
            debug!("Countdown expired, ignoring stroke at ({}, {})", point.x, point.y);
            return StrokeStart::Ignored;
        }

        let started = self.countdown.start();
        self.surface.pen_down(point);

        if started {
            info!("First stroke, doodle countdown started");
            StrokeStart::Started { epoch: self.epoch }
        } else {
            StrokeStart::Drawing
        }
    }

    /// Drag to `point`; ignored while the pen is up or after expiry
    pub fn extend_stroke(&mut self, point: Point) -> bool {
        if self.countdown.is_expired() {
            return false;
        }
        self.surface.pen_move(point)
    }

    /// Pen up
    pub fn end_stroke(&mut self) -> bool {
        self.surface.pen_up()
    }

    /// Erase everything and abandon the current countdown
    pub fn clear(&mut self) {
        self.surface.erase();
        self.countdown.reset();
        self.epoch = self.epoch.wrapping_add(1);
        self.ticker = None;
        info!("Doodle cleared, countdown reset");
    }

    /// Keep the task ticking the current countdown
    pub fn attach_ticker(&mut self, handle: TimerHandle) {
        self.ticker = Some(handle);
    }

    /// Cancel the pending tick without touching the canvas
    pub fn cancel_ticker(&mut self) {
        self.ticker = None;
    }

    /// Advance the countdown of session `epoch` by one second
    ///
    /// Returns `None` when `epoch` belongs to an abandoned session.
    pub fn tick(&mut self, epoch: u64) -> Option<TickOutcome> {
        if epoch != self.epoch {
            return None;
        }
        let outcome = self.countdown.tick();
        if outcome == TickOutcome::Expired {
            self.surface.pen_up();
            info!("Doodle countdown expired");
        }
        Some(outcome)
    }
}
