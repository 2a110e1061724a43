//! Completeness sweep over a date range.
//!
//! Re-derives the expected file set from the date range alone and reports
//! every slot that is absent or fails the size check. Never downloads and
//! never deletes; callers decide what to do with the report.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::fetcher::Fetcher;
use crate::slot::Slot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingReason {
    Missing,
    InvalidSize,
}

impl MissingReason {
    /// The reason as it appears in the JSON reports.
    pub fn as_str(self) -> &'static str {
        match self {
            MissingReason::Missing => "missing",
            MissingReason::InvalidSize => "invalid_size",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// One slot that needs attention.
pub struct MissingSlot {
    pub hour: u32,
    pub url: String,
    pub local_path: String,
    pub reason: MissingReason,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// All problem slots of one day. Days with nothing missing are omitted.
pub struct DayReport {
    pub date: String,
    pub missing_hours: Vec<MissingSlot>,
}

/// Checks every slot between `start` and `end` inclusive.
///
/// A slot is `missing` when the local file is absent and `invalid_size`
/// when it exists but fails the integrity check. With `verify_size` off
/// only existence is checked.
pub async fn check_completeness(
    fetcher: &Fetcher,
    start: NaiveDate,
    end: NaiveDate,
    verify_size: bool,
) -> Vec<DayReport> {
    let config = fetcher.config();
    let mut missing_data = Vec::new();

    for date in start.iter_days() {
        if date > end {
            break;
        }

        let mut missing_hours = Vec::new();

        for slot in Slot::day_slots(date) {
            let url = slot.url(config);
            let local_path = slot.local_path(config);

            let exists = local_path.exists();
            let valid = if exists && verify_size {
                fetcher.is_valid(&url, &local_path).await
            } else {
                true
            };

            if !exists || !valid {
                missing_hours.push(MissingSlot {
                    hour: slot.hour,
                    url,
                    local_path: local_path.display().to_string(),
                    reason: if exists {
                        MissingReason::InvalidSize
                    } else {
                        MissingReason::Missing
                    },
                });
            }
        }

        if !missing_hours.is_empty() {
            missing_data.push(DayReport {
                date: format!("{date}"),
                missing_hours,
            });
        }
    }

    missing_data
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;
    use crate::config::DownloadConfig;
    use crate::fetcher::test_support::{serve, test_config};

    fn unreachable_config(output_dir: &std::path::Path) -> DownloadConfig {
        DownloadConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            output_dir: output_dir.to_path_buf(),
            throttle_ms: (0, 0),
            backoff_ms: (0, 0),
            ..DownloadConfig::default()
        }
    }

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn should_name_reasons_like_the_json_reports() {
        assert_eq!(MissingReason::Missing.as_str(), "missing");
        assert_eq!(MissingReason::InvalidSize.as_str(), "invalid_size");

        // The log vocabulary and the serialized tags must not drift apart.
        assert_eq!(
            serde_json::to_string(&MissingReason::Missing).unwrap(),
            format!("\"{}\"", MissingReason::Missing.as_str())
        );
        assert_eq!(
            serde_json::to_string(&MissingReason::InvalidSize).unwrap(),
            format!("\"{}\"", MissingReason::InvalidSize.as_str())
        );
    }

    #[tokio::test]
    async fn should_report_every_absent_slot_as_missing() {
        let tmp_dir = TempDir::new().unwrap();
        let fetcher = Fetcher::new(unreachable_config(tmp_dir.path()));

        let report = check_completeness(&fetcher, date(1998, 1, 1), date(1998, 1, 2), true).await;

        assert_eq!(report.len(), 2);
        assert_eq!(report[0].date, "1998-01-01");
        assert_eq!(report[1].date, "1998-01-02");
        assert_eq!(report[0].missing_hours.len(), 24);
        assert!(report[0]
            .missing_hours
            .iter()
            .all(|slot| slot.reason == MissingReason::Missing));
    }

    #[tokio::test]
    async fn should_omit_present_slots() {
        let tmp_dir = TempDir::new().unwrap();
        let config = unreachable_config(tmp_dir.path());
        let day = date(1998, 1, 1);

        // Hours 0-11 present; the unreachable remote means the size check
        // assumes they are valid.
        for slot in Slot::day_slots(day).into_iter().take(12) {
            let path = slot.local_path(&config);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, b"data").unwrap();
        }

        let fetcher = Fetcher::new(config);
        let report = check_completeness(&fetcher, day, day, true).await;

        assert_eq!(report.len(), 1);
        assert_eq!(report[0].missing_hours.len(), 12);
        assert_eq!(report[0].missing_hours[0].hour, 12);
    }

    #[tokio::test]
    async fn should_tag_wrong_sized_files_as_invalid() {
        // Remote reports 10 bytes for every file.
        let (addr, _) = serve("200 OK", "0123456789", None).await;
        let tmp_dir = TempDir::new().unwrap();
        let config = test_config(addr, tmp_dir.path());
        let day = date(1998, 1, 1);
        let slots = Slot::day_slots(day);

        for slot in &slots[..23] {
            let path = slot.local_path(&config);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, b"0123456789").unwrap();
        }
        // Hour 22 is truncated, hour 23 is absent.
        fs::write(slots[22].local_path(&config), b"0123").unwrap();

        let fetcher = Fetcher::new(config);
        let report = check_completeness(&fetcher, day, day, true).await;

        assert_eq!(report.len(), 1);
        assert_eq!(report[0].missing_hours.len(), 2);
        assert_eq!(report[0].missing_hours[0].hour, 22);
        assert_eq!(report[0].missing_hours[0].reason, MissingReason::InvalidSize);
        assert_eq!(report[0].missing_hours[1].hour, 23);
        assert_eq!(report[0].missing_hours[1].reason, MissingReason::Missing);
    }

    #[tokio::test]
    async fn should_report_nothing_for_complete_day() {
        let tmp_dir = TempDir::new().unwrap();
        let config = unreachable_config(tmp_dir.path());
        let day = date(2000, 2, 29);

        for slot in Slot::day_slots(day) {
            let path = slot.local_path(&config);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, b"data").unwrap();
        }

        let fetcher = Fetcher::new(config);
        let report = check_completeness(&fetcher, day, day, true).await;

        assert!(report.is_empty());
    }
}
