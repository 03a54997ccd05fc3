//! Restart scenarios: each "process" is a fresh controller reading the same
//! store file, with a manual wall clock standing in for time passing.

use std::time::Duration;

use countdown_timer::{
    storage::{JsonFileStore, TimerPreferences},
    ui::{dispatch, ToggleLabel, UiEvent, UserAction},
    utils::ManualClock,
    TimerController,
};
use tempfile::TempDir;

const NAMESPACE: &str = "timer_shared_preferences";
const T0: i64 = 1_700_000_000_000;

fn open(dir: &TempDir) -> TimerPreferences<JsonFileStore> {
    TimerPreferences::new(JsonFileStore::open(dir.path(), NAMESPACE).unwrap())
}

/// Start a process: load whatever is stored and resume from it
fn launch(dir: &TempDir, clock: &ManualClock) -> (TimerController, TimerPreferences<JsonFileStore>) {
    let prefs = open(dir);
    let timer = TimerController::with_clock(clock.clone());
    timer.on_resume(prefs.load().unwrap());
    (timer, prefs)
}

/// Stop a process: suspend and persist
fn shut_down(timer: TimerController, mut prefs: TimerPreferences<JsonFileStore>) {
    let state = timer.on_suspend();
    prefs.save(&state).unwrap();
}

#[tokio::test(start_paused = true)]
async fn running_timer_keeps_its_deadline_across_restarts() {
    let dir = TempDir::new().unwrap();
    let clock = ManualClock::new(T0);

    let (timer, prefs) = launch(&dir, &clock);
    assert!(timer.snapshot().is_idle());
    assert!(dispatch(&timer, UserAction::Set("10".to_string())));
    assert!(dispatch(&timer, UserAction::Start));
    shut_down(timer, prefs);

    clock.advance(3 * 60_000);
    let (timer, prefs) = launch(&dir, &clock);
    let state = timer.snapshot();
    assert!(state.is_running);
    assert_eq!(state.remaining_ms, Some(7 * 60_000));
    assert_eq!(state.end_epoch_ms, Some(T0 + 10 * 60_000));
    assert_eq!(timer.display(), "07:00");

    tokio::time::sleep(Duration::from_millis(2_500)).await;
    assert_eq!(timer.snapshot().remaining_ms, Some(7 * 60_000 - 2_000));
    shut_down(timer, prefs);

    clock.advance(8 * 60_000);
    let (timer, _prefs) = launch(&dir, &clock);
    let state = timer.snapshot();
    assert_eq!(state.remaining_ms, Some(0));
    assert!(state.is_idle());
    assert_eq!(timer.display(), "00:00");
}

#[tokio::test(start_paused = true)]
async fn paused_timer_ignores_time_spent_away() {
    let dir = TempDir::new().unwrap();
    let clock = ManualClock::new(T0);

    let (timer, prefs) = launch(&dir, &clock);
    dispatch(&timer, UserAction::Set("90".to_string()));
    dispatch(&timer, UserAction::Start);
    tokio::time::sleep(Duration::from_millis(1_500)).await;
    dispatch(&timer, UserAction::Toggle);
    shut_down(timer, prefs);

    clock.advance(24 * 3_600_000);
    let prefs = open(&dir);
    let timer = TimerController::with_clock(clock.clone());
    let mut events = timer.subscribe();
    timer.on_resume(prefs.load().unwrap());

    let state = timer.snapshot();
    assert!(state.is_paused);
    assert_eq!(state.remaining_ms, Some(90 * 60_000 - 1_000));
    assert_eq!(
        events.try_recv().unwrap(),
        UiEvent::ShowControls { toggle: ToggleLabel::Resume }
    );
    assert_eq!(events.try_recv().unwrap(), UiEvent::Display("01:29:59".to_string()));
}

#[tokio::test]
async fn reset_is_persisted_as_fresh_state() {
    let dir = TempDir::new().unwrap();
    let clock = ManualClock::new(T0);

    let (timer, prefs) = launch(&dir, &clock);
    dispatch(&timer, UserAction::Set("5".to_string()));
    dispatch(&timer, UserAction::Reset);
    shut_down(timer, prefs);

    let raw = std::fs::read_to_string(dir.path().join(format!("{}.json", NAMESPACE))).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json["timer_time_remaining"], -1);
    assert_eq!(json["timer_end_time"], -1);
    assert_eq!(json["timer_timer_active"], false);
    assert_eq!(json["timer_timer_paused"], false);

    let (timer, _prefs) = launch(&dir, &clock);
    assert!(timer.snapshot().is_idle());
    assert_eq!(timer.snapshot().remaining_ms, None);
}
