//! Configuration and CLI argument handling

use std::{path::PathBuf, time::Duration};
use clap::Parser;

use crate::storage::DEFAULT_NAMESPACE;

/// CLI argument parsing structure
#[derive(Debug, Parser)]
#[command(name = "countdown-timer")]
#[command(about = "A single-screen countdown timer that survives restarts")]
#[command(version)]
pub struct Config {
    /// Directory holding the persisted timer state
    #[arg(long, default_value = ".")]
    pub store_dir: PathBuf,

    /// Store namespace, used as the file name
    #[arg(long, default_value = DEFAULT_NAMESPACE)]
    pub namespace: String,

    /// Tick period in milliseconds
    #[arg(long, default_value = "1000", value_parser = clap::value_parser!(u64).range(1..))]
    pub tick_ms: u64,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}
