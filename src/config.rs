//! Download configuration.
//!
//! Everything the pipeline needs to know about the remote archive, the
//! local mirror and the retry policy lives here, threaded by reference
//! into each component.

use std::path::PathBuf;

/// Base URL of the NOAA CMORPH 30-minute 8km archive.
pub const CMORPH_BASE_URL: &str =
    "https://www.ncei.noaa.gov/data/cmorph-high-resolution-global-precipitation-estimates/access/30min/8km";

#[derive(Debug, Clone)]
/// Settings for one download run.
pub struct DownloadConfig {
    /// Remote archive root, without a trailing slash.
    pub base_url: String,
    /// Local mirror root. Year/month subdirectories are created beneath it.
    pub output_dir: PathBuf,
    /// Report of files that failed during the main pass.
    pub failed_report: PathBuf,
    /// Report of files still unresolved after the retry pass.
    pub missing_report: PathBuf,
    /// Log file, written in addition to stdout.
    pub log_file: PathBuf,
    /// Download attempts per file before giving up.
    pub max_retries: u32,
    /// Sleep band (min, max) in milliseconds after each successful download.
    pub throttle_ms: (u64, u64),
    /// Sleep band (min, max) in milliseconds between failed attempts.
    pub backoff_ms: (u64, u64),
    /// How many of a day's trailing files to re-verify before downloading.
    pub recheck_trailing: usize,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            base_url: CMORPH_BASE_URL.to_string(),
            output_dir: PathBuf::from("CMORPH_Data"),
            failed_report: PathBuf::from("failed_downloads.json"),
            missing_report: PathBuf::from("missing_files.json"),
            log_file: PathBuf::from("cmorph_download.log"),
            max_retries: 3,
            throttle_ms: (3_000, 8_000),
            backoff_ms: (5_000, 10_000),
            recheck_trailing: 2,
        }
    }
}

// -- Tests -------------------------------------------------------------------
