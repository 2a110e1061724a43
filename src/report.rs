//! Persists failure reports as JSON.

use std::fs;
use std::path::Path;

use anyhow::Result;
use log::info;

use crate::day::FailureRecord;

/// Writes the failure report, or deletes it when there is nothing to
/// report so no stale report survives a clean run.
pub fn save_failed(path: &Path, records: &[FailureRecord]) -> Result<()> {
    if records.is_empty() {
        if path.exists() {
            fs::remove_file(path)?;
            info!("No failed downloads, removed {}", path.display());
        }
        return Ok(());
    }

    fs::write(path, serde_json::to_string_pretty(records)?)?;
    info!("Failure report saved to {}", path.display());

    Ok(())
}

/// Writes the still-missing report. Only called with unresolved entries.
pub fn save_still_missing(path: &Path, records: &[FailureRecord]) -> Result<()> {
    fs::write(path, serde_json::to_string_pretty(records)?)?;

    Ok(())
}

// -- Tests -------------------------------------------------------------------
