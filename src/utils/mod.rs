//! Utility functions module
//!
//! Display formatting, wall-clock sources and shutdown signal handling.

pub mod clock;
pub mod format;
pub mod signals;

// Re-export main functions
pub use clock::{Clock, ManualClock, SystemClock};
pub use format::{format_countdown, format_remaining};
pub use signals::shutdown_signal;
