//! Doodle countdown tick task

use std::sync::{Mutex, Weak};

use tokio::{
    sync::broadcast,
    time::{interval_at, Instant},
};
use tracing::{debug, error, info};

use super::TimerHandle;
use crate::{
    canvas::{DoodleZone, EXPIRY_NOTICE},
    state::{
        countdown::COUNTDOWN_TICK,
        events::{publish, AppEvent, HapticCue},
        lock, TickOutcome,
    },
};

/// Start ticking countdown run `epoch` of `zone` once per second
pub fn spawn_countdown_ticker(
    zone: Weak<Mutex<DoodleZone>>,
    epoch: u64,
    events: broadcast::Sender<AppEvent>,
) -> TimerHandle {
    TimerHandle::spawn("doodle countdown", countdown_ticker_task(zone, epoch, events))
}

/// Tick until the countdown expires or its session is abandoned
pub async fn countdown_ticker_task(
    zone: Weak<Mutex<DoodleZone>>,
    epoch: u64,
    events: broadcast::Sender<AppEvent>,
) {
    // First tick one full second after the stroke that started the run
    let mut interval = interval_at(Instant::now() + COUNTDOWN_TICK, COUNTDOWN_TICK);

    loop {
        interval.tick().await;

        let Some(zone) = zone.upgrade() else {
            debug!("Doodle zone dropped, stopping countdown");
            return;
        };

        let outcome = match lock(&zone, "doodle") {
            Ok(mut zone) => zone.tick(epoch),
            Err(e) => {
                error!("Countdown tick failed: {}", e);
                return;
            }
        };

        match outcome {
            Some(TickOutcome::Ticked(remaining_seconds)) => {
                debug!("Doodle countdown: {}s left", remaining_seconds);
                publish(&events, AppEvent::CountdownTick { remaining_seconds });
            }
            Some(TickOutcome::Expired) => {
                info!("Doodle time is up");
                publish(
                    &events,
                    AppEvent::CountdownTick {
                        remaining_seconds: 0,
                    },
                );
                publish(
                    &events,
                    AppEvent::DoodleExpired {
                        notice: EXPIRY_NOTICE,
                    },
                );
                publish(&events, AppEvent::haptic(HapticCue::DoodleExpired));
                return;
            }
            Some(TickOutcome::Idle) => {
                debug!("Countdown no longer running, stopping ticks");
                return;
            }
            None => {
                debug!("Countdown run {} was abandoned, stopping ticks", epoch);
                return;
            }
        }
    }
}
