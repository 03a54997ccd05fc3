//! UI surface module
//!
//! Render events emitted by the controller, user actions flowing into it, and
//! a terminal host that plays the part of the screen.

pub mod actions;
pub mod events;
pub mod terminal;

// Re-export main types
pub use actions::{dispatch, UserAction};
pub use events::{ToggleLabel, UiEvent};
pub use terminal::{render_events, restore_at_startup, run_session, Command};
