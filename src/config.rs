//! Command line and runtime configuration.
//!
//! ```bash
//! # Use ./tasks.txt
//! taskclock
//!
//! # Use another task file
//! taskclock ~/todo/tasks.txt
//!
//! # Log to a file
//! RUST_LOG=taskclock=debug taskclock 2> taskclock.log
//! ```

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

pub const DEFAULT_TASKS_FILE: &str = "tasks.txt";

/// How often the countdown column is recomputed.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// To-do list with live countdowns to each due date
#[derive(Parser, Debug)]
#[command(name = "taskclock")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Task file, one `description|YYYY-MM-DD HH:MM:SS` entry per line
    #[arg(value_name = "FILE", default_value = DEFAULT_TASKS_FILE)]
    pub file: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub tasks_path: PathBuf,
    pub tick_interval: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tasks_path: PathBuf::from(DEFAULT_TASKS_FILE),
            tick_interval: TICK_INTERVAL,
        }
    }
}

impl From<Cli> for Config {
    fn from(cli: Cli) -> Self {
        Self {
            tasks_path: cli.file,
            ..Self::default()
        }
    }
}
