//! Countdown Timer - a single-screen countdown that survives interruptions
//!
//! The user sets a duration in minutes, then starts, pauses, resumes or resets
//! it while a formatted countdown updates once per second. State is handed to
//! a key-value store on suspend and reconciled against the wall clock on
//! resume, so a countdown keeps its deadline across restarts.

pub mod config;
pub mod error;
pub mod state;
pub mod storage;
pub mod tasks;
pub mod ui;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::{StorageError, TimerError};
pub use state::{TimerController, TimerState};
pub use storage::{JsonFileStore, KeyValueStore, MemoryStore, TimerPreferences};
pub use ui::{UiEvent, UserAction};
pub use utils::shutdown_signal;
