//! Presence counter drift task

use std::sync::{Mutex, Weak};

use rand::{rngs::StdRng, SeedableRng};
use tokio::{
    sync::broadcast,
    time::{interval_at, Instant},
};
use tracing::{debug, warn};

use super::TimerHandle;
use crate::state::{
    events::{publish, AppEvent},
    lock,
    presence::PRESENCE_DRIFT_PERIOD,
    Presence,
};

/// Start the presence random walk
pub fn spawn_presence_drift(
    presence: Weak<Mutex<Presence>>,
    events: broadcast::Sender<AppEvent>,
) -> TimerHandle {
    TimerHandle::spawn("presence drift", presence_drift_task(presence, events))
}

/// Nudge the online count every few seconds for as long as it exists
pub async fn presence_drift_task(
    presence: Weak<Mutex<Presence>>,
    events: broadcast::Sender<AppEvent>,
) {
    let mut rng = StdRng::from_entropy();
    let mut interval = interval_at(
        Instant::now() + PRESENCE_DRIFT_PERIOD,
        PRESENCE_DRIFT_PERIOD,
    );

    loop {
        interval.tick().await;

        let Some(presence) = presence.upgrade() else {
            debug!("Presence dropped, stopping drift");
            return;
        };

        let online_count = match lock(&presence, "presence") {
            Ok(mut presence) => presence.drift(&mut rng),
            Err(e) => {
                warn!("Presence drift skipped: {}", e);
                continue;
            }
        };

        publish(&events, AppEvent::PresenceChanged { online_count });
    }
}
