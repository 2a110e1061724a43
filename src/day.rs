//! Downloads the 24 hourly files of one calendar day.

use std::fs;

use chrono::NaiveDate;
use log::{error, info};
use serde::{Deserialize, Serialize};

use crate::fetcher::Fetcher;
use crate::slot::Slot;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// One file that could not be downloaded.
pub struct FailureRecord {
    pub date: String,
    pub hour: u32,
    pub url: String,
    pub local_path: String,
}

/// Downloads every hourly file for `date`, in hour order.
///
/// With `check_latest` the day's most recently written files are
/// re-verified first: a run interrupted mid-transfer leaves a truncated
/// file in the highest downloaded hour slots, which would otherwise be
/// trusted on existence alone.
///
/// Returns the number of files present and valid afterwards, plus a
/// record for every file that failed.
pub async fn download_day(
    fetcher: &Fetcher,
    date: NaiveDate,
    check_latest: bool,
) -> (u32, Vec<FailureRecord>) {
    let config = fetcher.config();
    let slots = Slot::day_slots(date);

    if check_latest {
        recheck_trailing(fetcher, &slots).await;
    }

    let mut success_count = 0;
    let mut failed = Vec::new();

    for slot in &slots {
        let url = slot.url(config);
        let local_path = slot.local_path(config);
        let outcome = fetcher
            .fetch(&url, &local_path, config.max_retries, true)
            .await;

        if outcome.is_ok() {
            success_count += 1;
        } else {
            failed.push(FailureRecord {
                date: slot.date_string(),
                hour: slot.hour,
                url,
                local_path: local_path.display().to_string(),
            });
        }
    }

    (success_count, failed)
}

/// Re-verifies the day's trailing local files, deleting any that fail.
async fn recheck_trailing(fetcher: &Fetcher, slots: &[Slot]) {
    let config = fetcher.config();
    let existing: Vec<Slot> = slots
        .iter()
        .copied()
        .filter(|slot| slot.local_path(config).exists())
        .collect();

    for slot in trailing_slots(&existing, config.recheck_trailing) {
        let url = slot.url(config);
        let local_path = slot.local_path(config);

        if !fetcher.is_valid(&url, &local_path).await {
            info!(
                "Recent file {} has the wrong size, deleting for re-download",
                local_path.display()
            );
            if let Err(e) = fs::remove_file(&local_path) {
                error!("Failed to delete {}: {e}", local_path.display());
            }
        }
    }
}

/// The `count` slots with the highest hours, or none when fewer than
/// `count` exist.
fn trailing_slots(existing: &[Slot], count: usize) -> Vec<Slot> {
    if existing.len() < count {
        return Vec::new();
    }

    let mut sorted = existing.to_vec();
    sorted.sort_by(|a, b| b.hour.cmp(&a.hour));
    sorted.truncate(count);

    sorted
}

// -- Tests -------------------------------------------------------------------
