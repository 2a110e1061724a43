//! Command line interface.

pub mod command;

use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveDate;
use clap::{command, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};

#[derive(Parser)]
#[command(version, about, long_about = None)]
/// Contains the commands
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Mirror the hourly archive for a date range
    Download {
        /// First day of the range
        #[arg(long, default_value = "1998-01-01")]
        start: NaiveDate,
        /// Last day of the range, inclusive
        #[arg(long, default_value = "2000-12-31")]
        end: NaiveDate,
        /// Directory to mirror into
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
    /// Report missing or invalid files without downloading
    Verify {
        /// First day of the range
        #[arg(long, default_value = "1998-01-01")]
        start: NaiveDate,
        /// Last day of the range, inclusive
        #[arg(long, default_value = "2000-12-31")]
        end: NaiveDate,
        /// Directory holding the mirror
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
}

/// Creates a spinner.
pub fn create_spinner(message: String) -> ProgressBar {
    let bar = ProgressBar::new_spinner().with_message(message);
    bar.enable_steady_tick(Duration::from_millis(100));

    bar
}

/// Creates a progress bar.
pub fn create_progress_bar(size: u64, message: String) -> ProgressBar {
    ProgressBar::new(size).with_message(message).with_style(
        ProgressStyle::with_template("[{eta_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("##-"),
    )
}
