//! Countdown Timer - a single-screen countdown that survives interruptions
//!
//! This is the terminal host: it restores the saved timer, runs commands from
//! stdin, and saves the timer again on the way out.

use tokio::io::{stdin, BufReader};
use tracing::{error, info};

use countdown_timer::{
    config::Config,
    state::TimerController,
    ui::{render_events, restore_at_startup, run_session, terminal::HELP},
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Logs go to stderr so they never interleave with the countdown display
    tracing_subscriber::fmt()
        .with_env_filter(format!("countdown_timer={}", config.log_level()))
        .with_writer(std::io::stderr)
        .init();

    info!("Starting countdown-timer v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: store_dir={}, namespace={}, tick={}ms",
          config.store_dir.display(), config.namespace, config.tick_ms);

    let timer = TimerController::new().with_tick_period(config.tick_period());
    tokio::spawn(render_events(timer.subscribe()));

    let mut prefs = restore_at_startup(&config.store_dir, &config.namespace, &timer)?;

    println!("{}", HELP);

    tokio::select! {
        result = run_session(BufReader::new(stdin()), &timer, &mut prefs) => {
            if let Err(e) = result {
                error!("Session error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    let state = timer.on_suspend();
    prefs.save(&state)?;

    info!("Timer state saved, shutdown complete");

    // A pending stdin read would otherwise hold the runtime open
    std::process::exit(0)
}
