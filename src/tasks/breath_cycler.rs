//! Breathing phase advance task

use std::sync::{Mutex, Weak};

use tokio::{
    sync::broadcast,
    time::{sleep_until, Instant},
};
use tracing::{debug, error};

use super::TimerHandle;
use crate::state::{
    events::{publish, AppEvent},
    lock, BreathingSession,
};

/// Start advancing breathing run `epoch` through its phases
pub fn spawn_breath_cycler(
    session: Weak<Mutex<BreathingSession>>,
    epoch: u64,
    events: broadcast::Sender<AppEvent>,
) -> TimerHandle {
    TimerHandle::spawn("breath cycler", breath_cycler_task(session, epoch, events))
}

/// Advance phases on schedule until the run is stopped
///
/// Deadlines are accumulated from the run's start so phase boundaries do not
/// drift with scheduling latency.
pub async fn breath_cycler_task(
    session: Weak<Mutex<BreathingSession>>,
    epoch: u64,
    events: broadcast::Sender<AppEvent>,
) {
    let mut deadline = Instant::now();

    loop {
        let wait = {
            let Some(session) = session.upgrade() else {
                return;
            };
            let duration = match lock(&session, "breathing") {
                Ok(session) => session.phase_duration(epoch),
                Err(e) => {
                    error!("Breathing cycle failed: {}", e);
                    return;
                }
            };
            match duration {
                Some(duration) => duration,
                None => {
                    debug!("Breathing run {} ended", epoch);
                    return;
                }
            }
        };

        deadline += wait;
        sleep_until(deadline).await;

        let Some(session) = session.upgrade() else {
            return;
        };
        let advanced = match lock(&session, "breathing") {
            Ok(mut session) => session.advance(epoch),
            Err(e) => {
                error!("Breathing cycle failed: {}", e);
                return;
            }
        };

        match advanced {
            Some(phase) => publish(
                &events,
                AppEvent::PhaseChanged {
                    phase,
                    expanded: phase.is_expanded(),
                },
            ),
            None => {
                debug!("Breathing run {} ended", epoch);
                return;
            }
        }
    }
}
