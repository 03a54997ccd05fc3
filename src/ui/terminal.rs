//! Line-oriented terminal host for the timer screen
//!
//! Stands in for the on-screen widgets: commands read from the input become
//! [`UserAction`]s and lifecycle calls, and [`UiEvent`]s are printed.

use std::{path::Path, str::FromStr};

use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt},
    sync::broadcast::{self, error::RecvError},
};
use tracing::{debug, info, warn};

use super::{dispatch, UiEvent, UserAction};
use crate::{
    error::StorageError,
    state::{TimerController, TimerState},
    storage::{JsonFileStore, KeyValueStore, TimerPreferences},
};

pub const HELP: &str = "\
Commands:
  set <minutes>   set the countdown length
  start           start counting down
  toggle          pause or resume (aliases: pause, resume)
  reset           clear the timer
  status          print the current state
  suspend         save state and stop ticking, as if the screen went away
  restore         reload saved state, as if the screen came back
  help            show this message
  quit            save and exit";

/// One line of terminal input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Action(UserAction),
    Status,
    Suspend,
    Restore,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word.to_lowercase().as_str() {
            "set" => Command::Action(UserAction::Set(rest.to_string())),
            "start" => Command::Action(UserAction::Start),
            "toggle" | "pause" | "resume" => Command::Action(UserAction::Toggle),
            "reset" => Command::Action(UserAction::Reset),
            "status" => Command::Status,
            "suspend" => Command::Suspend,
            "restore" => Command::Restore,
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            other => return Err(format!("Unknown command: {}", other)),
        };
        Ok(command)
    }
}

/// Text for one render event, if it shows anything
pub fn render(event: &UiEvent) -> Option<String> {
    match event {
        UiEvent::Display(text) => Some(format!("[ {} ]", text)),
        UiEvent::ShowInput => Some("Enter minutes with `set <minutes>`, then `start`".to_string()),
        UiEvent::ShowControls { toggle } => Some(format!("Controls: {} | reset", toggle)),
        UiEvent::ReleaseInput => None,
        UiEvent::Finished => Some("Time's up!".to_string()),
        UiEvent::Notify(message) => Some(format!("! {}", message)),
    }
}

/// Print render events until the controller goes away
pub async fn render_events(mut events: broadcast::Receiver<UiEvent>) {
    loop {
        match events.recv().await {
            Ok(event) => {
                if let Some(line) = render(&event) {
                    println!("{}", line);
                }
            }
            Err(RecvError::Lagged(skipped)) => {
                warn!("Renderer fell behind, skipped {} events", skipped);
            }
            Err(RecvError::Closed) => {
                debug!("Event channel closed, renderer exiting");
                break;
            }
        }
    }
}

/// Open the store under `dir` and hand whatever it holds to `timer`.
///
/// A store that cannot be parsed, or holds a key of the wrong type, is logged
/// and the timer starts fresh; the next save overwrites it. Only I/O failures
/// are returned.
pub fn restore_at_startup(
    dir: &Path,
    namespace: &str,
    timer: &TimerController,
) -> Result<TimerPreferences<JsonFileStore>, StorageError> {
    let store = JsonFileStore::open(dir, namespace)?;
    info!("Timer state stored at {}", store.path().display());
    let prefs = TimerPreferences::new(store);

    let persisted = prefs.load().unwrap_or_else(|e| {
        warn!("Discarding unreadable timer state: {}", e);
        TimerState::new()
    });
    timer.on_resume(persisted);

    Ok(prefs)
}

/// Read commands from `input` until `quit` or end of input.
///
/// `suspend` and `restore` go through `prefs` exactly like a real
/// interruption would. The caller is expected to suspend and save once more
/// on the way out.
pub async fn run_session<R, S>(
    input: R,
    timer: &TimerController,
    prefs: &mut TimerPreferences<S>,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    S: KeyValueStore,
{
    let mut lines = input.lines();
    let mut suspended = false;

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(e) => {
                timer.notify(e);
                continue;
            }
        };
        debug!("Command: {:?}", command);

        match command {
            Command::Quit => break,
            Command::Help => println!("{}", HELP),
            Command::Status => {
                println!("{}", serde_json::to_string_pretty(&timer.snapshot())?);
            }
            Command::Suspend if suspended => timer.notify("Already suspended"),
            Command::Suspend => {
                let state = timer.on_suspend();
                prefs.save(&state)?;
                suspended = true;
                info!("Session suspended");
            }
            Command::Restore if !suspended => timer.notify("Not suspended"),
            Command::Restore => {
                let state = prefs.load()?;
                timer.on_resume(state);
                suspended = false;
                info!("Session restored");
            }
            Command::Action(_) if suspended => {
                timer.notify("Suspended; use `restore` first");
            }
            Command::Action(action) => {
                dispatch(timer, action);
            }
        }
    }

    Ok(())
}
