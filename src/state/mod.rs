//! State management module
//!
//! The timer data model and the controller that owns it.

pub mod controller;
pub mod timer_state;

// Re-export main types
pub use controller::{parse_minutes, TimerController};
pub use timer_state::{TimerState, MAX_DURATION_MS};
