//! Standalone completeness sweep.

use anyhow::Result;
use chrono::NaiveDate;
use log::info;

use crate::cli::create_spinner;
use crate::config::DownloadConfig;
use crate::fetcher::Fetcher;
use crate::scan;

pub async fn verify(config: DownloadConfig, start: NaiveDate, end: NaiveDate) -> Result<()> {
    let fetcher = Fetcher::new(config);

    let bar = create_spinner("Scanning for missing or invalid files...".to_string());
    let missing_data = scan::check_completeness(&fetcher, start, end, true).await;
    bar.finish_with_message("Scan complete");

    if missing_data.is_empty() {
        info!("All data present and valid.");
        return Ok(());
    }

    let total_missing: usize = missing_data
        .iter()
        .map(|day_report| day_report.missing_hours.len())
        .sum();

    for day_report in &missing_data {
        for missing_slot in &day_report.missing_hours {
            info!(
                "{} hour {:02}: {} ({})",
                day_report.date,
                missing_slot.hour,
                missing_slot.reason.as_str(),
                missing_slot.local_path
            );
        }
    }
    info!(
        "{total_missing} missing or invalid files across {} days",
        missing_data.len()
    );

    Ok(())
}
