//! Doodle countdown state

use std::time::Duration;

use serde::Serialize;

/// Length of one doodle session in seconds
pub const DOODLE_SECONDS: u32 = 60;

/// Interval between countdown ticks
pub const COUNTDOWN_TICK: Duration = Duration::from_secs(1);

/// One-shot countdown gating the doodle canvas
///
/// Starts idle at [`DOODLE_SECONDS`]. It can only be started from that idle
/// state; once it reaches zero it stays expired until [`Countdown::reset`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Countdown {
    remaining_seconds: u32,
    running: bool,
}

/// Result of a single [`Countdown::tick`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The countdown was not running; nothing changed
    Idle,
    /// One second elapsed, this many remain
    Ticked(u32),
    /// This tick reached zero
    Expired,
}

impl Countdown {
    /// Create an idle countdown at full duration
    pub fn new() -> Self {
        Self {
            remaining_seconds: DOODLE_SECONDS,
            running: false,
        }
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Never started since creation or the last reset
    pub fn is_idle(&self) -> bool {
        !self.running && self.remaining_seconds == DOODLE_SECONDS
    }

    pub fn is_expired(&self) -> bool {
        self.remaining_seconds == 0
    }

    /// Start counting down
    ///
    /// Only an idle countdown starts; returns whether it did.
    pub fn start(&mut self) -> bool {
        if !self.is_idle() {
            return false;
        }
        self.running = true;
        true
    }

    /// Advance by one second
    pub fn tick(&mut self) -> TickOutcome {
        if !self.running {
            return TickOutcome::Idle;
        }

        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        if self.remaining_seconds == 0 {
            self.running = false;
            TickOutcome::Expired
        } else {
            TickOutcome::Ticked(self.remaining_seconds)
        }
    }

    /// Back to idle at full duration, whatever the current state
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_countdown_is_idle() {
        let countdown = Countdown::new();
        assert_eq!(countdown.remaining_seconds(), 60);
        assert!(!countdown.is_running());
        assert!(countdown.is_idle());
        assert!(!countdown.is_expired());
    }

    #[test]
    fn tick_before_start_does_nothing() {
        let mut countdown = Countdown::new();
        assert_eq!(countdown.tick(), TickOutcome::Idle);
        assert_eq!(countdown.remaining_seconds(), 60);
    }

    #[test]
    fn start_only_from_idle() {
        let mut countdown = Countdown::new();
        assert!(countdown.start());
        assert!(!countdown.start(), "already running");

        countdown.tick();
        assert!(!countdown.start(), "mid-session");
    }

    #[test]
    fn ticks_decrease_by_one_and_expire_once() {
        let mut countdown = Countdown::new();
        countdown.start();

        let mut expiries = 0;
        let mut previous = countdown.remaining_seconds();
        for _ in 0..75 {
            match countdown.tick() {
                TickOutcome::Ticked(remaining) => {
                    assert_eq!(remaining, previous - 1);
                    previous = remaining;
                }
                TickOutcome::Expired => {
                    assert_eq!(previous, 1, "expiry fires on the 1 -> 0 transition");
                    expiries += 1;
                    previous = 0;
                }
                TickOutcome::Idle => assert_eq!(countdown.remaining_seconds(), 0),
            }
        }

        assert_eq!(expiries, 1);
        assert_eq!(countdown.remaining_seconds(), 0);
        assert!(!countdown.is_running());
        assert!(countdown.is_expired());
    }

    #[test]
    fn expired_countdown_cannot_restart() {
        let mut countdown = Countdown::new();
        countdown.start();
        for _ in 0..DOODLE_SECONDS {
            countdown.tick();
        }
        assert!(countdown.is_expired());
        assert!(!countdown.start());
    }

    #[test]
    fn reset_is_idempotent_from_any_state() {
        let mut idle = Countdown::new();
        idle.reset();
        idle.reset();
        assert_eq!(idle, Countdown::new());

        let mut running = Countdown::new();
        running.start();
        running.tick();
        running.reset();
        assert_eq!((running.remaining_seconds(), running.is_running()), (60, false));

        let mut expired = Countdown::new();
        expired.start();
        for _ in 0..DOODLE_SECONDS {
            expired.tick();
        }
        expired.reset();
        assert_eq!(expired, Countdown::new());
        assert!(expired.start(), "a reset session can start again");
    }
}
