//! Cosmetic "souls breathing together" counter

use std::time::Duration;

use rand::Rng;

use crate::tasks::TimerHandle;

/// Count shown before the first drift
pub const DEFAULT_ONLINE_COUNT: u32 = 124;

/// How often the count drifts
pub const PRESENCE_DRIFT_PERIOD: Duration = Duration::from_secs(5);

/// Random-walk head count, alive for as long as the app state is
#[derive(Debug)]
pub struct Presence {
    online_count: u32,
    drifter: Option<TimerHandle>,
}

impl Presence {
    pub fn new(online_count: u32) -> Self {
        Self {
            online_count,
            drifter: None,
        }
    }

    pub fn online_count(&self) -> u32 {
        self.online_count
    }

    /// Step the count up or down by one with equal odds
    pub fn drift<R: Rng>(&mut self, rng: &mut R) -> u32 {
        self.online_count = if rng.gen_bool(0.5) {
            self.online_count.saturating_add(1)
        } else {
            self.online_count.saturating_sub(1)
        };
        self.online_count
    }

    pub fn attach_drifter(&mut self, handle: TimerHandle) {
        self.drifter = Some(handle);
    }

    pub fn is_drifting(&self) -> bool {
        self.drifter.is_some()
    }

    /// Cancel the drift task
    pub fn stop_drift(&mut self) {
        self.drifter = None;
    }
}

impl Default for Presence {
    fn default() -> Self {
        Self::new(DEFAULT_ONLINE_COUNT)
    }
}
