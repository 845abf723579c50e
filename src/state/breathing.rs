//! Guided breathing phase cycle

use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info};

use crate::tasks::TimerHandle;

/// Phases of the breathing cycle; `Ready` while the session is off
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BreathPhase {
    Ready,
    Inhale,
    Hold,
    Exhale,
    Rest,
}

impl BreathPhase {
    /// Whether the mascot is drawn expanded in this phase
    pub fn is_expanded(self) -> bool {
        matches!(self, BreathPhase::Inhale | BreathPhase::Hold)
    }

    /// Mascot scale factor for this phase
    pub fn mascot_scale(self) -> f32 {
        if self.is_expanded() {
            1.4
        } else {
            1.0
        }
    }
}

/// Phase order and per-phase durations while a session is active
pub const PHASE_TABLE: [(BreathPhase, Duration); 4] = [
    (BreathPhase::Inhale, Duration::from_secs(4)),
    (BreathPhase::Hold, Duration::from_secs(4)),
    (BreathPhase::Exhale, Duration::from_secs(4)),
    (BreathPhase::Rest, Duration::from_secs(4)),
];

/// What a renderer needs to draw the mascot and the start/stop button
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BreathingStatus {
    pub active: bool,
    pub phase: BreathPhase,
    pub expanded: bool,
    pub mascot_scale: f32,
}

/// Breathing session state machine
///
/// `phase() == Ready` exactly when the session is inactive. While active the
/// phase cycles through [`PHASE_TABLE`] forever. The pending advance is owned
/// through `advancer`; every stop bumps `epoch` so an advance scheduled for an
/// earlier run is recognised as stale.
#[derive(Debug, Default)]
pub struct BreathingSession {
    active: bool,
    cursor: usize,
    epoch: u64,
    advancer: Option<TimerHandle>,
}

impl BreathingSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> BreathPhase {
        if self.active {
            PHASE_TABLE[self.cursor].0
        } else {
            BreathPhase::Ready
        }
    }

    pub fn status(&self) -> BreathingStatus {
        let phase = self.phase();
        BreathingStatus {
            active: self.active,
            phase,
            expanded: phase.is_expanded(),
            mascot_scale: phase.mascot_scale(),
        }
    }

    /// Begin a session at `Inhale`
    ///
    /// Returns the epoch of the new run, or `None` if a session was already
    /// active.
    pub fn activate(&mut self) -> Option<u64> {
        if self.active {
            debug!("Breathing already active, ignoring activate");
            return None;
        }
        self.active = true;
        self.cursor = 0;
        info!("Breathing session started at {:?}", self.phase());
        Some(self.epoch)
    }

    /// Stop immediately, back to `Ready`
    ///
    /// Cancels the pending phase advance. Returns whether a session was
    /// running.
    pub fn deactivate(&mut self) -> bool {
        let was_active = self.active;
        self.active = false;
        self.cursor = 0;
        self.epoch = self.epoch.wrapping_add(1);
        self.advancer = None;
        if was_active {
            info!("Breathing session stopped");
        }
        was_active
    }

    /// The start/stop button
    ///
    /// Returns the epoch of the new run when this started one, `None` when it
    /// stopped the running session.
    pub fn toggle(&mut self) -> Option<u64> {
        if self.active {
            self.deactivate();
            None
        } else {
            self.activate()
        }
    }

    /// Keep the task advancing the current run
    pub fn attach_advancer(&mut self, handle: TimerHandle) {
        self.advancer = Some(handle);
    }

    /// Duration of the current phase, if `epoch` is still the live run
    pub fn phase_duration(&self, epoch: u64) -> Option<Duration> {
        (self.active && epoch == self.epoch).then(|| PHASE_TABLE[self.cursor].1)
    }

    /// Move to the next phase of the run identified by `epoch`
    ///
    /// Returns the new phase, or `None` when that run is no longer live.
    pub fn advance(&mut self, epoch: u64) -> Option<BreathPhase> {
        if !self.active || epoch != self.epoch {
            return None;
        }
        self.cursor = (self.cursor + 1) % PHASE_TABLE.len();
        let phase = self.phase();
        debug!("Breathing phase -> {:?}", phase);
        Some(phase)
    }
}
