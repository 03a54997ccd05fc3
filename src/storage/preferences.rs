//! Saving and loading [`TimerState`] through a key-value store

use tracing::{debug, info};

use super::store::KeyValueStore;
use crate::{error::StorageError, state::TimerState};

pub const DEFAULT_NAMESPACE: &str = "timer_shared_preferences";

pub const KEY_START_TIME: &str = "timer_start_time";
pub const KEY_END_TIME: &str = "timer_end_time";
pub const KEY_TIME_REMAINING: &str = "timer_time_remaining";
pub const KEY_TIMER_ACTIVE: &str = "timer_timer_active";
pub const KEY_TIMER_PAUSED: &str = "timer_timer_paused";

/// Stored in place of an unset time
pub const NO_TIME_SET: i64 = -1;

/// The save/load pair the host calls at suspend and resume
#[derive(Debug)]
pub struct TimerPreferences<S> {
    store: S,
}

impl<S: KeyValueStore> TimerPreferences<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Write every field and commit
    pub fn save(&mut self, state: &TimerState) -> Result<(), StorageError> {
        self.store
            .put_i64(KEY_START_TIME, to_stored(Some(state.start_duration_ms)));
        self.store
            .put_i64(KEY_END_TIME, state.end_epoch_ms.unwrap_or(NO_TIME_SET));
        self.store
            .put_i64(KEY_TIME_REMAINING, to_stored(state.remaining_ms));
        self.store.put_bool(KEY_TIMER_ACTIVE, state.is_running);
        self.store.put_bool(KEY_TIMER_PAUSED, state.is_paused);
        self.store.commit()?;

        info!(
            "Saved timer state: running={}, paused={}, remaining={:?}",
            state.is_running, state.is_paused, state.remaining_ms
        );
        Ok(())
    }

    /// Read the state back; missing keys fall back to a fresh timer
    pub fn load(&self) -> Result<TimerState, StorageError> {
        let start = self.store.get_i64(KEY_START_TIME)?.unwrap_or(0);
        let end = self.store.get_i64(KEY_END_TIME)?.unwrap_or(NO_TIME_SET);
        let remaining = self.store.get_i64(KEY_TIME_REMAINING)?.unwrap_or(NO_TIME_SET);

        let state = TimerState {
            start_duration_ms: from_stored(start).unwrap_or(0),
            end_epoch_ms: (end >= 0).then_some(end),
            remaining_ms: from_stored(remaining),
            is_running: self.store.get_bool(KEY_TIMER_ACTIVE)?.unwrap_or(false),
            is_paused: self.store.get_bool(KEY_TIMER_PAUSED)?.unwrap_or(false),
        }
        .normalized();

        debug!("Loaded timer state: {:?}", state);
        Ok(state)
    }

    #[cfg(test)]
    pub(crate) fn store(&self) -> &S {
        &self.store
    }
}

fn to_stored(ms: Option<u64>) -> i64 {
    ms.map_or(NO_TIME_SET, |ms| i64::try_from(ms).unwrap_or(i64::MAX))
}

fn from_stored(ms: i64) -> Option<u64> {
    u64::try_from(ms).ok()
}
