//! Main application state management

use std::{
    sync::{Arc, Mutex},
    time::Instant,
};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use super::{
    events::{publish, AppEvent, HapticCue, EVENT_CHANNEL_CAPACITY},
    lock,
    mood::ColorError,
    BreathingSession, BreathingStatus, MoodPreset, MoodSelector, Overlay, OverlaySlot, Presence,
    StateError,
};
use crate::{
    canvas::{DoodleStatus, DoodleZone, DrawingSurface, InputSource, Point, StrokeStart},
    config::SessionSettings,
    tasks::{spawn_breath_cycler, spawn_countdown_ticker, spawn_presence_drift},
};

/// Everything a renderer needs to draw the session at one instant
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub mood: MoodPreset,
    pub breathing: BreathingStatus,
    pub overlay: Overlay,
    pub doodle: DoodleStatus,
    pub online_count: u32,
}

/// Top-level owner of every session component
///
/// Each component sits behind its own mutex. The only nested locking is
/// mood -> doodle when a new mood re-inks the canvas.
#[derive(Debug)]
pub struct AppState {
    pub mood: Arc<Mutex<MoodSelector>>,
    pub breathing: Arc<Mutex<BreathingSession>>,
    pub overlay: Arc<Mutex<OverlaySlot>>,
    /// Owned here rather than by the overlay so the session survives the
    /// doodle overlay being closed
    pub doodle: Arc<Mutex<DoodleZone>>,
    pub presence: Arc<Mutex<Presence>>,
    pub start_time: Instant,
    pub started_at: DateTime<Utc>,
    /// Feedback and change notifications
    pub events_tx: broadcast::Sender<AppEvent>,
}

impl AppState {
    /// Create a fresh session and mount the doodle surface
    ///
    /// No timers run yet; see [`AppState::start_background_tasks`].
    pub fn new(settings: &SessionSettings) -> Result<Self, StateError> {
        let mood = MoodSelector::new();
        let surface = DrawingSurface::mount(
            settings.canvas_width,
            settings.canvas_height,
            settings.pixel_ratio,
            ink_for(mood.active()),
        )?;
        let (events_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        Ok(Self {
            mood: Arc::new(Mutex::new(mood)),
            breathing: Arc::new(Mutex::new(BreathingSession::new())),
            overlay: Arc::new(Mutex::new(OverlaySlot::new())),
            doodle: Arc::new(Mutex::new(DoodleZone::new(surface))),
            presence: Arc::new(Mutex::new(Presence::new(settings.online_start))),
            start_time: Instant::now(),
            started_at: Utc::now(),
            events_tx,
        })
    }

    /// Start timers that live as long as the state itself
    pub fn start_background_tasks(&self) -> Result<(), StateError> {
        let mut presence = lock(&self.presence, "presence")?;
        if !presence.is_drifting() {
            presence.attach_drifter(spawn_presence_drift(
                Arc::downgrade(&self.presence),
                self.events_tx.clone(),
            ));
        }
        Ok(())
    }

    /// Subscribe to session events
    pub fn subscribe(&self) -> broadcast::Receiver<AppEvent> {
        self.events_tx.subscribe()
    }

    /// Select a mood by label; unknown labels keep the current mood
    pub fn select_mood(&self, label: &str) -> Result<MoodPreset, StateError> {
        let mut mood = lock(&self.mood, "mood")?;
        let Some(picked) = mood.select(label) else {
            return Ok(*mood.active());
        };

        lock(&self.doodle, "doodle")?.set_ink(ink_for(picked));
        drop(mood);

        publish(&self.events_tx, AppEvent::haptic(HapticCue::MoodChanged));
        publish(
            &self.events_tx,
            AppEvent::MoodChanged {
                label: picked.label,
            },
        );
        Ok(*picked)
    }

    pub fn active_mood(&self) -> Result<MoodPreset, StateError> {
        Ok(*lock(&self.mood, "mood")?.active())
    }

    /// Start a breathing session; returns false if one was already running
    pub fn start_breathing(&self) -> Result<bool, StateError> {
        let mut breathing = lock(&self.breathing, "breathing")?;
        let Some(epoch) = breathing.activate() else {
            return Ok(false);
        };
        self.attach_breath_cycler(&mut breathing, epoch);
        let status = breathing.status();
        drop(breathing);

        self.publish_toggle(status);
        Ok(true)
    }

    /// Stop breathing immediately, back to `Ready`
    ///
    /// Returns false if no session was running.
    pub fn stop_breathing(&self) -> Result<bool, StateError> {
        let mut breathing = lock(&self.breathing, "breathing")?;
        let was_active = breathing.deactivate();
        let status = breathing.status();
        drop(breathing);

        if was_active {
            self.publish_toggle(status);
        }
        Ok(was_active)
    }

    /// The start/stop button
    pub fn toggle_breathing(&self) -> Result<BreathingStatus, StateError> {
        let mut breathing = lock(&self.breathing, "breathing")?;
        if let Some(epoch) = breathing.toggle() {
            self.attach_breath_cycler(&mut breathing, epoch);
        }
        let status = breathing.status();
        drop(breathing);

        self.publish_toggle(status);
        Ok(status)
    }

    fn attach_breath_cycler(&self, breathing: &mut BreathingSession, epoch: u64) {
        breathing.attach_advancer(spawn_breath_cycler(
            Arc::downgrade(&self.breathing),
            epoch,
            self.events_tx.clone(),
        ));
    }

    fn publish_toggle(&self, status: BreathingStatus) {
        publish(&self.events_tx, AppEvent::haptic(HapticCue::BreathingToggled));
        publish(
            &self.events_tx,
            AppEvent::PhaseChanged {
                phase: status.phase,
                expanded: status.expanded,
            },
        );
    }

    /// Show an overlay, replacing whichever is open
    pub fn open_overlay(&self, overlay: Overlay) -> Result<Overlay, StateError> {
        if overlay == Overlay::None {
            return self.close_overlay();
        }

        let previous = lock(&self.overlay, "overlay")?.open(overlay);
        if previous == Overlay::Doodle && overlay != Overlay::Doodle {
            self.lift_pen()?;
        }

        publish(&self.events_tx, AppEvent::haptic(HapticCue::OverlayOpened));
        publish(&self.events_tx, AppEvent::OverlayChanged { overlay });
        Ok(overlay)
    }

    /// Back to the main screen
    ///
    /// Leaving the doodle overlay lifts the pen but keeps canvas and
    /// countdown as they are.
    pub fn close_overlay(&self) -> Result<Overlay, StateError> {
        let previous = lock(&self.overlay, "overlay")?.close();
        if previous == Overlay::Doodle {
            self.lift_pen()?;
        }
        if previous != Overlay::None {
            publish(
                &self.events_tx,
                AppEvent::OverlayChanged {
                    overlay: Overlay::None,
                },
            );
        }
        Ok(Overlay::None)
    }

    pub fn current_overlay(&self) -> Result<Overlay, StateError> {
        Ok(lock(&self.overlay, "overlay")?.current())
    }

    fn lift_pen(&self) -> Result<(), StateError> {
        if lock(&self.doodle, "doodle")?.end_stroke() {
            debug!("Doodle overlay left mid-stroke, pen lifted");
        }
        Ok(())
    }

    /// Pen down on the doodle canvas
    pub fn begin_stroke(
        &self,
        point: Point,
        source: InputSource,
    ) -> Result<StrokeStart, StateError> {
        let mut doodle = lock(&self.doodle, "doodle")?;
        let start = doodle.begin_stroke(point);
        debug!("{:?} stroke begins at ({}, {}): {:?}", source, point.x, point.y, start);

        if let StrokeStart::Started { epoch } = start {
            doodle.attach_ticker(spawn_countdown_ticker(
                Arc::downgrade(&self.doodle),
                epoch,
                self.events_tx.clone(),
            ));
        }
        Ok(start)
    }

    /// Drag on the doodle canvas; returns whether anything was painted
    pub fn extend_stroke(&self, point: Point, source: InputSource) -> Result<bool, StateError> {
        let painted = lock(&self.doodle, "doodle")?.extend_stroke(point);
        if !painted {
            debug!("{:?} move to ({}, {}) ignored", source, point.x, point.y);
        }
        Ok(painted)
    }

    /// Pen up
    pub fn end_stroke(&self) -> Result<bool, StateError> {
        Ok(lock(&self.doodle, "doodle")?.end_stroke())
    }

    /// Wipe the canvas and reset its countdown
    pub fn clear_doodle(&self) -> Result<DoodleStatus, StateError> {
        let status = {
            let mut doodle = lock(&self.doodle, "doodle")?;
            doodle.clear();
            doodle.status()
        };
        publish(&self.events_tx, AppEvent::haptic(HapticCue::DoodleCleared));
        publish(
            &self.events_tx,
            AppEvent::CountdownTick {
                remaining_seconds: status.remaining_seconds,
            },
        );
        Ok(status)
    }

    pub fn doodle_status(&self) -> Result<DoodleStatus, StateError> {
        Ok(lock(&self.doodle, "doodle")?.status())
    }

    /// The canvas as PNG bytes, with the checksum of the pixels encoded
    pub fn doodle_png(&self) -> Result<(Vec<u8>, u64), StateError> {
        let doodle = lock(&self.doodle, "doodle")?;
        let surface = doodle.surface();
        Ok((surface.encode_png()?, surface.checksum()))
    }

    pub fn online_count(&self) -> Result<u32, StateError> {
        Ok(lock(&self.presence, "presence")?.online_count())
    }

    /// Capture every component for rendering
    pub fn snapshot(&self) -> Result<SessionSnapshot, StateError> {
        Ok(SessionSnapshot {
            mood: self.active_mood()?,
            breathing: lock(&self.breathing, "breathing")?.status(),
            overlay: self.current_overlay()?,
            doodle: self.doodle_status()?,
            online_count: self.online_count()?,
        })
    }

    /// Cancel every pending timer
    ///
    /// Breathing returns to `Ready`; the canvas and countdown value are kept
    /// but no further ticks happen.
    pub fn teardown(&self) -> Result<(), StateError> {
        lock(&self.breathing, "breathing")?.deactivate();
        lock(&self.doodle, "doodle")?.cancel_ticker();
        lock(&self.presence, "presence")?.stop_drift();
        info!("Session timers cancelled");
        Ok(())
    }

    /// Calculate uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }
}

/// Doodle ink for a mood, falling back to opaque black for a bad table entry
fn ink_for(mood: &MoodPreset) -> tiny_skia::Color {
    mood.theme_color().unwrap_or_else(|e: ColorError| {
        warn!("Mood {} has an unusable theme color: {}", mood.label, e);
        tiny_skia::Color::BLACK
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::BreathPhase;

    fn state() -> AppState {
        AppState::new(&SessionSettings::default()).unwrap()
    }

    #[test]
    fn fresh_session_snapshot() {
        let snapshot = state().snapshot().unwrap();
        assert_eq!(snapshot.mood.label, "Cloudy");
        assert_eq!(snapshot.overlay, Overlay::None);
        assert!(!snapshot.breathing.active);
        assert_eq!(snapshot.doodle.remaining_seconds, 60);
        assert!(snapshot.doodle.blank);
        assert_eq!(snapshot.online_count, 124);
    }

    #[test]
    fn unknown_mood_keeps_previous() {
        let state = state();
        state.select_mood("Breezy").unwrap();
        let kept = state.select_mood("Volcanic").unwrap();
        assert_eq!(kept.label, "Breezy");
    }

    #[test]
    fn selecting_mood_emits_haptic() {
        let state = state();
        let mut events = state.subscribe();
        state.select_mood("Zen").unwrap();
        assert_eq!(events.try_recv().unwrap(), AppEvent::haptic(HapticCue::MoodChanged));
        assert_eq!(events.try_recv().unwrap(), AppEvent::MoodChanged { label: "Zen" });
    }

    #[tokio::test(start_paused = true)]
    async fn breathing_toggle_emits_haptic_both_ways() {
        let state = state();
        let mut events = state.subscribe();

        assert!(state.toggle_breathing().unwrap().active);
        assert_eq!(events.try_recv().unwrap(), AppEvent::haptic(HapticCue::BreathingToggled));
        assert_eq!(
            events.try_recv().unwrap(),
            AppEvent::PhaseChanged {
                phase: BreathPhase::Inhale,
                expanded: true,
            }
        );

        assert!(!state.toggle_breathing().unwrap().active);
        assert_eq!(events.try_recv().unwrap(), AppEvent::haptic(HapticCue::BreathingToggled));
        assert_eq!(
            events.try_recv().unwrap(),
            AppEvent::PhaseChanged {
                phase: BreathPhase::Ready,
                expanded: false,
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn redundant_start_and_stop_stay_silent() {
        let state = state();
        assert!(state.start_breathing().unwrap());
        let mut events = state.subscribe();

        assert!(!state.start_breathing().unwrap());
        assert!(events.try_recv().is_err());

        assert!(state.stop_breathing().unwrap());
        assert!(!state.stop_breathing().unwrap());
        assert_eq!(events.try_recv().unwrap(), AppEvent::haptic(HapticCue::BreathingToggled));
        assert!(matches!(events.try_recv(), Ok(AppEvent::PhaseChanged { .. })));
        assert!(events.try_recv().is_err());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn concurrent_toggles_pair_up() {
        let state = Arc::new(state());

        let workers: Vec<_> = (0..2)
            .map(|_| {
                let state = Arc::clone(&state);
                tokio::task::spawn_blocking(move || {
                    for _ in 0..100 {
                        state.toggle_breathing().unwrap();
                    }
                })
            })
            .collect();
        for worker in workers {
            worker.await.unwrap();
        }

        let breathing = state.snapshot().unwrap().breathing;
        assert!(!breathing.active, "an even number of presses ends stopped");
        assert_eq!(breathing.phase, BreathPhase::Ready);
    }

    #[test]
    fn opening_overlay_emits_haptic_but_closing_does_not() {
        let state = state();
        let mut events = state.subscribe();

        state.open_overlay(Overlay::Kindness).unwrap();
        assert_eq!(events.try_recv().unwrap(), AppEvent::haptic(HapticCue::OverlayOpened));
        assert_eq!(
            events.try_recv().unwrap(),
            AppEvent::OverlayChanged {
                overlay: Overlay::Kindness,
            }
        );

        state.close_overlay().unwrap();
        assert_eq!(
            events.try_recv().unwrap(),
            AppEvent::OverlayChanged {
                overlay: Overlay::None,
            }
        );
        assert!(events.try_recv().is_err(), "closing has no haptic");
    }

    #[test]
    fn overlays_replace_each_other() {
        let state = state();
        state.open_overlay(Overlay::Sounds).unwrap();
        state.open_overlay(Overlay::Kindness).unwrap();
        assert_eq!(state.current_overlay().unwrap(), Overlay::Kindness);
        state.close_overlay().unwrap();
        assert_eq!(state.current_overlay().unwrap(), Overlay::None);
    }

    #[test]
    fn uptime_is_formatted() {
        assert!(state().get_uptime().ends_with('s'));
    }

    #[test]
    fn zero_sized_canvas_is_rejected() {
        let settings = SessionSettings {
            canvas_width: 0.0,
            ..SessionSettings::default()
        };
        assert!(matches!(AppState::new(&settings), Err(StateError::Surface(_))));
    }
}
