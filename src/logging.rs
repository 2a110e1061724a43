//! Logging to stdout and a log file.

use std::path::Path;

use anyhow::Result;

/// Initialises a dispatcher mirroring every line to stdout and `log_file`.
pub fn init(log_file: &Path) -> Result<()> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{} - {} - {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                message
            ))
        })
        .level(log::LevelFilter::Info)
        .chain(std::io::stdout())
        .chain(fern::log_file(log_file)?)
        .apply()?;

    Ok(())
}
