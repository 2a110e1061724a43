//! The full mirror pipeline for a date range.
//!
//! One pass over every day, then a completeness sweep and a bounded
//! retry pass over whatever is still missing or invalid. A single file's
//! failure never aborts the run; it ends up in one of the JSON reports.

use std::fs;
use std::path::Path;

use anyhow::Result;
use chrono::NaiveDate;
use log::{error, info};

use crate::cli::create_progress_bar;
use crate::config::DownloadConfig;
use crate::day::{self, FailureRecord};
use crate::fetcher::Fetcher;
use crate::report;
use crate::scan::{self, MissingReason};
use crate::slot::HOURS_PER_DAY;

pub async fn download(config: DownloadConfig, start: NaiveDate, end: NaiveDate) -> Result<()> {
    fs::create_dir_all(&config.output_dir)?;

    let fetcher = Fetcher::new(config.clone());
    let day_count = (end - start).num_days() + 1;
    let total_files = day_count * i64::from(HOURS_PER_DAY);

    info!("Starting download of {total_files} CMORPH files from {start} to {end}");

    let bar = create_progress_bar(day_count as u64, "Downloading days".to_string());
    let mut successful = 0u64;
    let mut all_failed: Vec<FailureRecord> = Vec::new();

    for date in start.iter_days() {
        if date > end {
            break;
        }
        info!("Downloading data for {date}");
        let (success_count, failed) = day::download_day(&fetcher, date, true).await;
        successful += u64::from(success_count);
        all_failed.extend(failed);
        bar.inc(1);
    }
    bar.finish();

    report::save_failed(&config.failed_report, &all_failed)?;

    info!("Download pass finished: {successful} of {total_files} files");
    if !all_failed.is_empty() {
        info!(
            "{} files failed to download, see {}",
            all_failed.len(),
            config.failed_report.display()
        );
    }

    info!("Checking data completeness and file sizes...");
    let missing_data = scan::check_completeness(&fetcher, start, end, true).await;

    if missing_data.is_empty() {
        info!("All data present and valid.");
        return Ok(());
    }

    let total_missing: usize = missing_data
        .iter()
        .map(|day_report| day_report.missing_hours.len())
        .sum();
    info!(
        "Detected {total_missing} missing or invalid files across {} days",
        missing_data.len()
    );

    // Invalid files must go before the retry pass or the fetcher might
    // trust them on a later optimistic integrity check.
    let mut files_to_retry = Vec::new();
    for day_report in &missing_data {
        for missing_slot in &day_report.missing_hours {
            if missing_slot.reason == MissingReason::InvalidSize {
                let path = Path::new(&missing_slot.local_path);
                if path.exists() {
                    match fs::remove_file(path) {
                        Ok(()) => info!("Deleted invalid file: {}", missing_slot.local_path),
                        Err(e) => {
                            error!("Failed to delete {}: {e}", missing_slot.local_path)
                        }
                    }
                }
            }
            files_to_retry.push(FailureRecord {
                date: day_report.date.clone(),
                hour: missing_slot.hour,
                url: missing_slot.url.clone(),
                local_path: missing_slot.local_path.clone(),
            });
        }
    }

    info!("Retrying missing or invalid files...");
    let still_missing = retry_failed(&fetcher, files_to_retry).await;

    if still_missing.is_empty() {
        info!("All files downloaded after retry.");
    } else {
        report::save_still_missing(&config.missing_report, &still_missing)?;
        info!(
            "{} files could not be downloaded, see {}",
            still_missing.len(),
            config.missing_report.display()
        );
    }

    Ok(())
}

/// One more bounded fetch per record; returns whatever still failed.
async fn retry_failed(fetcher: &Fetcher, failed: Vec<FailureRecord>) -> Vec<FailureRecord> {
    if failed.is_empty() {
        info!("No files to retry");
        return Vec::new();
    }

    info!("Retrying {} failed downloads", failed.len());
    let bar = create_progress_bar(failed.len() as u64, "Retrying failed downloads".to_string());
    let mut still_failed = Vec::new();

    for record in failed {
        let outcome = fetcher
            .fetch(
                &record.url,
                Path::new(&record.local_path),
                fetcher.config().max_retries,
                true,
            )
            .await;

        if outcome.is_ok() {
            info!("Recovered {}", record.url);
        } else {
            still_failed.push(record);
        }
        bar.inc(1);
    }
    bar.finish();

    still_failed
}

// -- Tests -------------------------------------------------------------------
