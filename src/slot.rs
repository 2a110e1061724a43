//! Hourly file slots.
//!
//! The archive publishes one file per hour. A [`Slot`] is the
//! (year, month, day, hour) quadruple; its remote URL and local path are
//! pure functions of those four integers, so the expected file set can
//! always be recomputed from the date range alone.

use std::path::PathBuf;

use chrono::{Datelike, NaiveDate};

use crate::config::DownloadConfig;

/// Hours of data published per day.
pub const HOURS_PER_DAY: u32 = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// One expected hourly file.
pub struct Slot {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
}

impl Slot {
    pub fn new(year: i32, month: u32, day: u32, hour: u32) -> Self {
        Self {
            year,
            month,
            day,
            hour,
        }
    }

    /// The 24 slots of one calendar day, in ascending hour order.
    pub fn day_slots(date: NaiveDate) -> Vec<Slot> {
        (0..HOURS_PER_DAY)
            .map(|hour| Slot::new(date.year(), date.month(), date.day(), hour))
            .collect()
    }

    /// Remote file basename, e.g. `CMORPH_V1.0_ADJ_8km-30min_1998010100.nc`.
    pub fn file_name(&self) -> String {
        format!(
            "CMORPH_V1.0_ADJ_8km-30min_{:04}{:02}{:02}{:02}.nc",
            self.year, self.month, self.day, self.hour
        )
    }

    /// Remote URL under the archive's `{year}/{month}/{day}/` layout.
    pub fn url(&self, config: &DownloadConfig) -> String {
        format!(
            "{}/{:04}/{:02}/{:02}/{}",
            config.base_url,
            self.year,
            self.month,
            self.day,
            self.file_name()
        )
    }

    /// Local path under the mirror's `{year}/{month}/` layout.
    pub fn local_path(&self, config: &DownloadConfig) -> PathBuf {
        config
            .output_dir
            .join(format!("{:04}", self.year))
            .join(format!("{:02}", self.month))
            .join(self.file_name())
    }

    /// The slot's date as `YYYY-MM-DD`.
    pub fn date_string(&self) -> String {
        format!("{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

// -- Tests -------------------------------------------------------------------
