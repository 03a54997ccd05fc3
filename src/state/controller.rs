//! Countdown controller
//!
//! Owns the [`TimerState`], enforces the allowed transitions, drives the
//! one-second tick source and reconciles wall-clock time across
//! suspend/resume.

use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError, Weak},
    time::Duration,
};
use tokio::sync::{broadcast, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::{
    error::{TimerError, TimerResult},
    tasks::spawn_countdown,
    ui::{ToggleLabel, UiEvent},
    utils::{format_remaining, Clock, SystemClock},
};
use super::timer_state::{TimerState, MAX_DURATION_MS};

const MS_PER_MINUTE: u64 = 60_000;
const DEFAULT_TICK_PERIOD: Duration = Duration::from_secs(1);
const EVENT_CAPACITY: usize = 64;

/// Parse a minutes entry from the input field into a capped duration in ms
pub fn parse_minutes(input: &str) -> TimerResult<u64> {
    if input.is_empty() {
        return Err(TimerError::Validation("Time cannot be empty".to_string()));
    }
    if !input.chars().all(|c| c.is_ascii_digit()) {
        return Err(TimerError::Validation("Invalid format".to_string()));
    }

    // All digits, so parsing can only fail on overflow, which caps anyway
    let minutes = input.parse::<u64>().unwrap_or(u64::MAX);
    let duration_ms = minutes.saturating_mul(MS_PER_MINUTE);
    if duration_ms == 0 {
        return Err(TimerError::Validation("Time cannot be empty".to_string()));
    }

    Ok(duration_ms.min(MAX_DURATION_MS))
}

struct Inner {
    state: TimerState,
    /// Bumped on every cancellation; ticks from an older generation are dropped
    generation: u64,
    ticker: Option<CancellationToken>,
}

impl Inner {
    fn cancel_ticker(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        if let Some(token) = self.ticker.take() {
            token.cancel();
        }
    }

    fn toggle_label(&self) -> Option<ToggleLabel> {
        if self.state.is_running {
            Some(ToggleLabel::Pause)
        } else if self.state.is_paused {
            Some(ToggleLabel::Resume)
        } else {
            None
        }
    }
}

struct Shared {
    inner: Mutex<Inner>,
    events: broadcast::Sender<UiEvent>,
    state_tx: watch::Sender<TimerState>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, event: UiEvent) {
        if let Err(e) = self.events.send(event) {
            debug!("No UI listener for event: {:?}", e.0);
        }
    }

    /// Push the latest state to watchers and redraw the countdown
    fn publish(&self, state: &TimerState) {
        self.state_tx.send_replace(state.clone());
        self.emit(UiEvent::Display(format_remaining(state.remaining_ms)));
    }
}

impl Drop for Shared {
    fn drop(&mut self) {
        let inner = self.inner.get_mut().unwrap_or_else(PoisonError::into_inner);
        inner.cancel_ticker();
    }
}

/// The single-screen countdown timer.
///
/// Cheap to clone; all clones drive the same timer. Every operation runs under
/// one lock and emits its UI events before releasing it, so a pause, reset or
/// suspend is never followed by an update from a stale tick. Dropping the last
/// handle cancels any running countdown.
///
/// [`start`](Self::start) and anything that may call it spawn a tokio task and
/// must run inside a tokio runtime.
#[derive(Clone)]
pub struct TimerController {
    shared: Arc<Shared>,
    clock: Arc<dyn Clock>,
    tick_period: Duration,
}

impl TimerController {
    /// Create a controller on the system clock with a one-second tick
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }

    /// Create a controller that reads wall-clock time from `clock`
    pub fn with_clock(clock: impl Clock) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let (state_tx, _) = watch::channel(TimerState::new());

        Self {
            shared: Arc::new(Shared {
                inner: Mutex::new(Inner {
                    state: TimerState::new(),
                    generation: 0,
                    ticker: None,
                }),
                events,
                state_tx,
            }),
            clock: Arc::new(clock),
            tick_period: DEFAULT_TICK_PERIOD,
        }
    }

    /// Override the tick period. Must be non-zero.
    pub fn with_tick_period(mut self, period: Duration) -> Self {
        self.tick_period = period;
        self
    }

    /// Subscribe to render events
    pub fn subscribe(&self) -> broadcast::Receiver<UiEvent> {
        self.shared.events.subscribe()
    }

    /// Watch the latest state
    pub fn watch_state(&self) -> watch::Receiver<TimerState> {
        self.shared.state_tx.subscribe()
    }

    /// Current state
    pub fn snapshot(&self) -> TimerState {
        self.shared.lock().state.clone()
    }

    /// Current countdown text
    pub fn display(&self) -> String {
        format_remaining(self.shared.lock().state.remaining_ms)
    }

    /// Show a short-lived message on the UI surface
    pub fn notify(&self, message: impl Into<String>) {
        self.shared.emit(UiEvent::Notify(message.into()));
    }

    /// Set the duration from the minutes typed by the user
    pub fn set_duration(&self, input: &str) -> TimerResult<()> {
        let duration_ms = parse_minutes(input)?;

        let mut inner = self.shared.lock();
        if !inner.state.is_idle() {
            return Err(TimerError::Precondition(
                "Reset the timer before setting a new time".to_string(),
            ));
        }

        inner.state.start_duration_ms = duration_ms;
        inner.state.remaining_ms = Some(duration_ms);
        info!("Duration set to {}ms", duration_ms);

        self.shared.publish(&inner.state);
        self.shared.emit(UiEvent::ReleaseInput);
        Ok(())
    }

    /// Start counting down from the remaining time
    pub fn start(&self) -> TimerResult<()> {
        let mut inner = self.shared.lock();
        self.start_locked(&mut inner)
    }

    /// Pause a running countdown; does nothing otherwise
    pub fn pause(&self) {
        let mut inner = self.shared.lock();
        self.pause_locked(&mut inner);
    }

    /// The pause/resume control: pause when running, start otherwise
    pub fn resume_or_start(&self) -> TimerResult<()> {
        let mut inner = self.shared.lock();
        if inner.state.is_running {
            self.pause_locked(&mut inner);
            Ok(())
        } else {
            self.start_locked(&mut inner)
        }
    }

    /// Stop everything and go back to the fresh state
    pub fn reset(&self) {
        let mut inner = self.shared.lock();
        inner.cancel_ticker();
        inner.state = TimerState::new();
        info!("Timer reset");

        self.shared.publish(&inner.state);
        self.shared.emit(UiEvent::ShowInput);
    }

    /// Stop ticking and hand back the state to persist.
    ///
    /// The running/paused flags are left as they are so that
    /// [`on_resume`](Self::on_resume) can tell a running timer apart.
    pub fn on_suspend(&self) -> TimerState {
        let mut inner = self.shared.lock();
        inner.cancel_ticker();
        info!(
            "Suspending: running={}, paused={}, remaining={:?}",
            inner.state.is_running, inner.state.is_paused, inner.state.remaining_ms
        );
        inner.state.clone()
    }

    /// Load persisted state and reconcile it with the wall clock
    pub fn on_resume(&self, persisted: TimerState) {
        let mut inner = self.shared.lock();
        inner.cancel_ticker();
        inner.state = persisted.normalized();

        let mut expired = false;
        if inner.state.is_running {
            let now = self.clock.now_epoch_ms();
            let left = inner.state.end_epoch_ms.unwrap_or(0).saturating_sub(now);

            if left < 0 {
                info!("Countdown expired {}ms before resume", -left);
                inner.state.remaining_ms = Some(0);
                inner.state.is_running = false;
                expired = true;
            } else {
                info!("Resuming countdown with {}ms left", left);
                inner.state.remaining_ms = Some(left.unsigned_abs());
                self.begin_countdown(&mut inner, left.unsigned_abs());
            }
        }

        match inner.toggle_label() {
            Some(toggle) => self.shared.emit(UiEvent::ShowControls { toggle }),
            None => self.shared.emit(UiEvent::ShowInput),
        }
        if expired {
            self.shared.emit(UiEvent::Finished);
        }
        self.shared.publish(&inner.state);
    }

    fn start_locked(&self, inner: &mut Inner) -> TimerResult<()> {
        let remaining = inner
            .state
            .remaining_ms
            .ok_or_else(|| TimerError::Precondition("Input a time first".to_string()))?;

        self.begin_countdown(inner, remaining);
        self.shared.emit(UiEvent::ShowControls { toggle: ToggleLabel::Pause });
        Ok(())
    }

    fn pause_locked(&self, inner: &mut Inner) {
        if !inner.state.is_running {
            debug!("Pause ignored, timer not running");
            return;
        }

        inner.cancel_ticker();
        inner.state.is_running = false;
        inner.state.is_paused = true;
        info!("Timer paused with {:?}ms left", inner.state.remaining_ms);

        self.shared.state_tx.send_replace(inner.state.clone());
        self.shared.emit(UiEvent::ShowControls { toggle: ToggleLabel::Resume });
    }

    /// Derive the end time from `remaining` and spawn a fresh tick source
    fn begin_countdown(&self, inner: &mut Inner, remaining: u64) {
        inner.cancel_ticker();

        let now = self.clock.now_epoch_ms();
        let remaining_i64 = i64::try_from(remaining).unwrap_or(i64::MAX);
        inner.state.end_epoch_ms = Some(now.saturating_add(remaining_i64));
        inner.state.is_running = true;
        inner.state.is_paused = false;
        self.shared.state_tx.send_replace(inner.state.clone());

        let generation = inner.generation;
        let on_tick = {
            let shared = Arc::downgrade(&self.shared);
            move |left: Duration| handle_tick(&shared, generation, left)
        };
        let on_complete = {
            let shared = Arc::downgrade(&self.shared);
            move || handle_complete(&shared, generation)
        };

        inner.ticker = Some(spawn_countdown(
            Duration::from_millis(remaining),
            self.tick_period,
            on_tick,
            on_complete,
        ));
        info!("Countdown started with {}ms left", remaining);
    }
}

impl Default for TimerController {
    fn default() -> Self {
        Self::new()
    }
}

fn handle_tick(shared: &Weak<Shared>, generation: u64, left: Duration) {
    let Some(shared) = shared.upgrade() else { return };
    let mut inner = shared.lock();
    if inner.generation != generation {
        return;
    }

    let left_ms = u64::try_from(left.as_millis()).unwrap_or(u64::MAX);
    inner.state.remaining_ms = Some(left_ms);
    debug!("Tick: {}ms left", left_ms);
    shared.publish(&inner.state);
}

fn handle_complete(shared: &Weak<Shared>, generation: u64) {
    let Some(shared) = shared.upgrade() else { return };
    let mut inner = shared.lock();
    if inner.generation != generation {
        return;
    }

    inner.ticker = None;
    inner.state.remaining_ms = Some(0);
    inner.state.is_running = false;
    inner.state.is_paused = false;
    info!("Countdown finished");

    shared.publish(&inner.state);
    shared.emit(UiEvent::Finished);
}
