//! Timer state structure and management

use serde::{Deserialize, Serialize};

/// Longest duration that can be set: 100 hours
pub const MAX_DURATION_MS: u64 = 360_000_000;

/// Everything needed to redraw and resume the countdown
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    /// Duration originally set by the user
    pub start_duration_ms: u64,
    /// Wall-clock epoch time at which the countdown reaches zero.
    /// Only meaningful while running.
    pub end_epoch_ms: Option<i64>,
    /// Time left; `None` before a duration is set or after a reset
    pub remaining_ms: Option<u64>,
    pub is_running: bool,
    pub is_paused: bool,
}

impl TimerState {
    /// Create a fresh state with nothing set
    pub fn new() -> Self {
        Self::default()
    }

    /// A paused state holding `remaining_ms`, ready to be started
    pub fn paused(start_duration_ms: u64, remaining_ms: u64) -> Self {
        Self {
            start_duration_ms: start_duration_ms.min(MAX_DURATION_MS),
            end_epoch_ms: None,
            remaining_ms: Some(remaining_ms),
            is_running: false,
            is_paused: true,
        }
    }

    /// True when neither running nor paused: fresh, reset, or finished
    pub fn is_idle(&self) -> bool {
        !self.is_running && !self.is_paused
    }

    /// Restore the invariants on a state read back from storage
    pub fn normalized(mut self) -> Self {
        if self.is_running && self.is_paused {
            self.is_paused = false;
        }
        self.start_duration_ms = self.start_duration_ms.min(MAX_DURATION_MS);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_idle_and_unset() {
        let state = TimerState::new();
        assert!(state.is_idle());
        assert_eq!(state.remaining_ms, None);
        assert_eq!(state.end_epoch_ms, None);
    }

    #[test]
    fn test_normalized_prefers_running() {
        let state = TimerState {
            is_running: true,
            is_paused: true,
            start_duration_ms: MAX_DURATION_MS + 1,
            ..TimerState::default()
        }
        .normalized();

        assert!(state.is_running);
        assert!(!state.is_paused);
        assert_eq!(state.start_duration_ms, MAX_DURATION_MS);
    }

    #[test]
    fn test_json_shape() {
        let state = TimerState::paused(60_000, 42_000);
        let json = serde_json::to_value(&state).unwrap();

        assert_eq!(json["remaining_ms"], 42_000);
        assert_eq!(json["end_epoch_ms"], serde_json::Value::Null);
        assert_eq!(json["is_paused"], true);
    }
}
