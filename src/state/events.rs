//! Session events fanned out to subscribers

use serde::Serialize;
use tokio::sync::broadcast;
use tracing::debug;

use super::{BreathPhase, Overlay};

/// Capacity of the session event channel
pub const EVENT_CHANNEL_CAPACITY: usize = 100;

/// What asked for a haptic pulse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HapticCue {
    MoodChanged,
    BreathingToggled,
    DoodleCleared,
    DoodleExpired,
    OverlayOpened,
}

/// Everything a front end may react to
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AppEvent {
    /// Best-effort physical feedback
    Haptic { cue: HapticCue },
    DoodleExpired { notice: &'static str },
    CountdownTick { remaining_seconds: u32 },
    PhaseChanged { phase: BreathPhase, expanded: bool },
    PresenceChanged { online_count: u32 },
    MoodChanged { label: &'static str },
    OverlayChanged { overlay: Overlay },
}

impl AppEvent {
    pub fn haptic(cue: HapticCue) -> Self {
        AppEvent::Haptic { cue }
    }
}

/// Send an event to whoever is listening
///
/// Having no subscribers is the normal case for a device without haptics or
/// an idle front end, so a failed send is only logged at debug level.
pub fn publish(tx: &broadcast::Sender<AppEvent>, event: AppEvent) {
    if let Err(e) = tx.send(event) {
        debug!("No subscribers for {:?}", e.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_serialize_with_type_tag() {
        let json = serde_json::to_value(AppEvent::haptic(HapticCue::DoodleCleared)).unwrap();
        assert_eq!(json["type"], "haptic");
        assert_eq!(json["cue"], "doodle_cleared");

        let json = serde_json::to_value(AppEvent::PhaseChanged {
            phase: BreathPhase::Hold,
            expanded: true,
        })
        .unwrap();
        assert_eq!(json["type"], "phase_changed");
        assert_eq!(json["phase"], "Hold");
    }

    #[test]
    fn publishing_without_subscribers_is_fine() {
        let (tx, rx) = broadcast::channel(4);
        drop(rx);
        publish(
            &tx,
            AppEvent::CountdownTick {
                remaining_seconds: 3,
            },
        );
    }
}
