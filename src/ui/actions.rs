//! User actions and the boundary that turns failures into notifications

use tracing::info;

use crate::state::TimerController;

/// Something the user did on the timer screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserAction {
    /// Set button, with the raw text of the minutes field
    Set(String),
    Start,
    /// The pause/resume control
    Toggle,
    Reset,
}

/// Run `action` against the timer.
///
/// Failures never escape: they are logged and shown to the user as a
/// [`UiEvent::Notify`](super::UiEvent::Notify). Returns whether the action
/// succeeded.
pub fn dispatch(timer: &TimerController, action: UserAction) -> bool {
    let result = match &action {
        UserAction::Set(input) => timer.set_duration(input),
        UserAction::Start => timer.start(),
        UserAction::Toggle => timer.resume_or_start(),
        UserAction::Reset => {
            timer.reset();
            Ok(())
        }
    };

    match result {
        Ok(()) => true,
        Err(e) => {
            info!("{:?} rejected: {}", action, e);
            timer.notify(e.to_string());
            false
        }
    }
}
