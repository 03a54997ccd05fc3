//! Background tasks module
//!
//! This module contains the periodic tick source that drives the countdown.

pub mod ticker;

// Re-export main functions
pub use ticker::spawn_countdown;
