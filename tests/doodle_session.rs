use std::time::Duration;

use exhale::{
    canvas::{InputSource, Point, StrokeStart, EXPIRY_NOTICE},
    state::{AppEvent, AppState, HapticCue, Overlay},
    SessionSettings,
};
use tokio::{sync::broadcast, time::sleep};

fn session() -> AppState {
    AppState::new(&SessionSettings::default()).expect("default canvas mounts")
}

fn drain(events: &mut broadcast::Receiver<AppEvent>) -> Vec<AppEvent> {
    let mut seen = Vec::new();
    while let Ok(event) = events.try_recv() {
        seen.push(event);
    }
    seen
}

fn checksum(state: &AppState) -> u64 {
    state.doodle.lock().unwrap().surface().checksum()
}

#[tokio::test(start_paused = true)]
async fn erupting_doodle_runs_out_then_clears() {
    let state = session();
    let mut events = state.subscribe();

    let mood = state.select_mood("Erupting").unwrap();
    assert_eq!(mood.theme, "#E07A5F");

    let start = state
        .begin_stroke(Point::new(10.0, 10.0), InputSource::Pointer)
        .unwrap();
    assert!(matches!(start, StrokeStart::Started { .. }));

    let status = state.doodle_status().unwrap();
    assert!(status.running);
    assert_eq!(status.remaining_seconds, 60);

    sleep(Duration::from_millis(500)).await;
    assert_eq!(state.doodle_status().unwrap().remaining_seconds, 60, "no tick before one second");

    sleep(Duration::from_secs(60)).await;
    let status = state.doodle_status().unwrap();
    assert_eq!(status.remaining_seconds, 0);
    assert!(!status.running);
    assert!(status.expired);
    assert_eq!(status.notice, Some(EXPIRY_NOTICE));

    let seen = drain(&mut events);
    let expiries = seen
        .iter()
        .filter(|event| matches!(event, AppEvent::DoodleExpired { .. }))
        .count();
    assert_eq!(expiries, 1);
    assert!(seen.contains(&AppEvent::haptic(HapticCue::DoodleExpired)));

    let ticks: Vec<u32> = seen
        .iter()
        .filter_map(|event| match event {
            AppEvent::CountdownTick { remaining_seconds } => Some(*remaining_seconds),
            _ => None,
        })
        .collect();
    assert_eq!(ticks, (0..60).rev().collect::<Vec<_>>());

    // Time keeps passing, nothing else happens
    sleep(Duration::from_secs(10)).await;
    assert!(drain(&mut events).is_empty());

    let status = state.clear_doodle().unwrap();
    assert_eq!(status.remaining_seconds, 60);
    assert!(!status.running);
    assert!(state.doodle.lock().unwrap().surface().is_blank());
    assert!(drain(&mut events).contains(&AppEvent::haptic(HapticCue::DoodleCleared)));
}

#[tokio::test(start_paused = true)]
async fn drawing_after_expiry_changes_nothing() {
    let state = session();
    state.begin_stroke(Point::new(20.0, 20.0), InputSource::Touch).unwrap();
    state.extend_stroke(Point::new(80.0, 80.0), InputSource::Touch).unwrap();
    state.end_stroke().unwrap();

    sleep(Duration::from_millis(60_500)).await;
    assert!(state.doodle_status().unwrap().expired);

    let before = checksum(&state);
    let start = state
        .begin_stroke(Point::new(100.0, 100.0), InputSource::Pointer)
        .unwrap();
    assert_eq!(start, StrokeStart::Ignored);
    assert!(!state
        .extend_stroke(Point::new(150.0, 150.0), InputSource::Pointer)
        .unwrap());
    state.end_stroke().unwrap();
    assert_eq!(checksum(&state), before);
}

#[tokio::test(start_paused = true)]
async fn clearing_mid_countdown_abandons_the_old_ticks() {
    let state = session();
    state.begin_stroke(Point::new(10.0, 10.0), InputSource::Pointer).unwrap();
    sleep(Duration::from_millis(10_500)).await;
    assert_eq!(state.doodle_status().unwrap().remaining_seconds, 50);

    state.clear_doodle().unwrap();
    sleep(Duration::from_secs(5)).await;
    let status = state.doodle_status().unwrap();
    assert_eq!((status.remaining_seconds, status.running), (60, false));

    // A fresh session ticks once per second, not twice
    state.begin_stroke(Point::new(30.0, 30.0), InputSource::Pointer).unwrap();
    sleep(Duration::from_millis(1_500)).await;
    assert_eq!(state.doodle_status().unwrap().remaining_seconds, 59);
}

#[tokio::test(start_paused = true)]
async fn closing_the_overlay_keeps_the_session() {
    let state = session();
    state.open_overlay(Overlay::Doodle).unwrap();
    state.begin_stroke(Point::new(40.0, 40.0), InputSource::Pointer).unwrap();
    state.extend_stroke(Point::new(90.0, 60.0), InputSource::Pointer).unwrap();
    sleep(Duration::from_millis(3_500)).await;

    let drawn = checksum(&state);
    state.close_overlay().unwrap();
    assert!(!state.doodle_status().unwrap().pen_down, "leaving lifts the pen");

    sleep(Duration::from_secs(2)).await;
    state.open_overlay(Overlay::Doodle).unwrap();

    let status = state.doodle_status().unwrap();
    assert_eq!(checksum(&state), drawn);
    assert!(status.running);
    assert_eq!(status.remaining_seconds, 55);

    // Pen is up after reopening; moving alone paints nothing
    assert!(!state
        .extend_stroke(Point::new(10.0, 10.0), InputSource::Pointer)
        .unwrap());
    assert_eq!(checksum(&state), drawn);
}

#[tokio::test(start_paused = true)]
async fn mood_change_does_not_recolor_existing_strokes() {
    let state = session();
    state.begin_stroke(Point::new(10.0, 40.0), InputSource::Pointer).unwrap();
    state.extend_stroke(Point::new(90.0, 40.0), InputSource::Pointer).unwrap();
    state.end_stroke().unwrap();

    let before = checksum(&state);
    state.select_mood("Zen").unwrap();
    assert_eq!(checksum(&state), before);

    state.begin_stroke(Point::new(10.0, 80.0), InputSource::Pointer).unwrap();
    state.extend_stroke(Point::new(90.0, 80.0), InputSource::Pointer).unwrap();

    let doodle = state.doodle.lock().unwrap();
    let old = doodle.surface().pixel(50, 40).unwrap();
    let new = doodle.surface().pixel(50, 80).unwrap();
    // Cloudy #3D405B, then Zen #5F797B
    assert_eq!(old.red(), 0x3D);
    assert_eq!(new.red(), 0x5F);
}

#[tokio::test(start_paused = true)]
async fn dropping_the_state_cancels_the_countdown() {
    let state = session();
    let zone = std::sync::Arc::downgrade(&state.doodle);
    state.begin_stroke(Point::new(10.0, 10.0), InputSource::Pointer).unwrap();
    drop(state);

    sleep(Duration::from_secs(3)).await;
    assert!(zone.upgrade().is_none());
}
