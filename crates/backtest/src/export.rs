use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use csv::Writer;

use crate::outcome::OutcomeRecord;

/// Column order of the results artifact.
pub const RESULT_COLUMNS: [&str; 10] = [
    "date",
    "predicted_mean",
    "predicted_std",
    "prob_over",
    "line",
    "actual_value",
    "outcome",
    "bet_recommendation",
    "correct",
    "profit",
];

/// Writes one row per evaluated game to `path`.
///
/// # Errors
/// Returns error if the file cannot be created or writing fails
pub fn write_results_csv(path: &Path, records: &[OutcomeRecord]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    let file = File::create(path)
        .with_context(|| format!("Failed to create CSV file: {}", path.display()))?;
    write_results(file, records)
}

/// Writes the results artifact to any writer.
///
/// # Errors
/// Returns error if writing fails
pub fn write_results<W: Write>(out: W, records: &[OutcomeRecord]) -> Result<()> {
    let mut writer = Writer::from_writer(out);
    writer.write_record(RESULT_COLUMNS)?;

    for record in records {
        let p = &record.prediction;
        writer.write_record(&[
            p.date.format("%Y-%m-%d").to_string(),
            p.predicted_mean.to_string(),
            p.predicted_std.to_string(),
            p.prob_over.to_string(),
            p.line.to_string(),
            record.actual_value.to_string(),
            record.result.to_string(),
            record.bet.to_string(),
            record.correct.to_string(),
            record.profit.to_string(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}
