//! Events the controller emits for the UI surface to render

use std::fmt;

use serde::{Deserialize, Serialize};

/// Label shown on the single pause/resume control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToggleLabel {
    Pause,
    Resume,
}

impl fmt::Display for ToggleLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pause => f.write_str("pause"),
            Self::Resume => f.write_str("resume"),
        }
    }
}

/// Render instructions for the UI surface
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// New countdown text
    Display(String),
    /// Show the input field with Set and Start; hide toggle and Reset; clear input
    ShowInput,
    /// Hide the input field; show the toggle (with this label) and Reset
    ShowControls { toggle: ToggleLabel },
    /// A duration was accepted; the input field should give up focus
    ReleaseInput,
    /// The countdown hit zero; hide the toggle control
    Finished,
    /// Short-lived message for the user
    Notify(String),
}
