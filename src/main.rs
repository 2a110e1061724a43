mod cli;
mod config;
mod day;
mod fetcher;
mod logging;
mod report;
mod scan;
mod slot;

use anyhow::{bail, Error, Result};
use clap::Parser;
use cli::{command, Cli, Commands};
use config::DownloadConfig;

#[tokio::main]
async fn main() -> Result<(), Error> {
    let cli = Cli::parse();
    let mut config = DownloadConfig::default();
    logging::init(&config.log_file)?;

    match cli.command {
        Commands::Download {
            start,
            end,
            output_dir,
        } => {
            if end < start {
                bail!("end date {end} is before start date {start}");
            }
            if let Some(dir) = output_dir {
                config.output_dir = dir;
            }
            command::download(config, start, end).await?;
        }
        Commands::Verify {
            start,
            end,
            output_dir,
        } => {
            if end < start {
                bail!("end date {end} is before start date {start}");
            }
            if let Some(dir) = output_dir {
                config.output_dir = dir;
            }
            command::verify(config, start, end).await?;
        }
    }

    Ok(())
}
