//! Per-player CSV game logs (`<dir>/<player_id>.csv`).
//!
//! Files may use canonical headers or the box-score provider's headers
//! (`GAME_DATE`, `PTS`, `AST`, `REB`, `MIN`). Provider exports write minutes
//! as `MM:SS` and dates either as `2024-10-22T00:00:00` or `OCT 22, 2024`;
//! all three forms are accepted.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use csv::Writer;

use nba_props_core::table::{normalize_headers, ASSISTS, GAME_DATE, MINUTES, POINTS, REBOUNDS};
use nba_props_core::{DataError, GameTable, PlayerId};

use crate::layered::GameLogTier;

const STAT_COLUMNS: [&str; 4] = [POINTS, ASSISTS, REBOUNDS, MINUTES];

/// Game-log tier backed by a directory of CSV files.
#[derive(Debug, Clone)]
pub struct CsvGameLogStore {
    dir: PathBuf,
}

impl CsvGameLogStore {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn path_for(&self, player: PlayerId) -> PathBuf {
        self.dir.join(format!("{player}.csv"))
    }

    /// Reads one game-log CSV.
    ///
    /// # Errors
    /// Returns `DataError::MissingColumn` without a date column,
    /// `DataError::InvalidValue` for unparseable cells, and
    /// `DataError::Csv` for malformed files.
    pub fn read_file(path: &Path) -> Result<GameTable, DataError> {
        let mut reader = csv::Reader::from_path(path)
            .map_err(|e| DataError::Csv(format!("{}: {e}", path.display())))?;

        let raw_headers: Vec<String> = reader
            .headers()
            .map_err(|e| DataError::Csv(e.to_string()))?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();
        let headers = normalize_headers(&raw_headers);

        let date_idx = headers
            .iter()
            .position(|h| h == GAME_DATE)
            .ok_or_else(|| DataError::MissingColumn(GAME_DATE.to_string()))?;
        let stat_idx: Vec<(usize, &str)> = STAT_COLUMNS
            .iter()
            .filter_map(|stat| headers.iter().position(|h| h == stat).map(|idx| (idx, *stat)))
            .collect();

        let mut dates = Vec::new();
        let mut values: Vec<Vec<Option<f64>>> = vec![Vec::new(); stat_idx.len()];

        for (row, record) in reader.records().enumerate() {
            let record = record.map_err(|e| DataError::Csv(e.to_string()))?;
            let raw_date = record.get(date_idx).unwrap_or_default();
            dates.push(parse_game_date(raw_date).ok_or_else(|| DataError::InvalidValue {
                column: GAME_DATE.to_string(),
                row,
                reason: format!("unrecognized date '{raw_date}'"),
            })?);

            for (slot, (idx, stat)) in stat_idx.iter().enumerate() {
                let cell = record.get(*idx).unwrap_or_default().trim();
                let value = if *stat == MINUTES {
                    Some(parse_minutes(cell))
                } else if cell.is_empty() {
                    None
                } else {
                    Some(cell.parse::<f64>().map_err(|e| DataError::InvalidValue {
                        column: (*stat).to_string(),
                        row,
                        reason: e.to_string(),
                    })?)
                };
                values[slot].push(value);
            }
        }

        let columns = stat_idx
            .iter()
            .map(|(_, stat)| (*stat).to_string())
            .zip(values)
            .collect();
        GameTable::from_columns(dates, columns)
    }

    /// Writes a table as a canonical-header CSV.
    ///
    /// # Errors
    /// Returns a `DataError` if the file cannot be written.
    pub fn write_file(path: &Path, games: &GameTable) -> Result<(), DataError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = File::create(path)?;
        let mut writer = Writer::from_writer(file);
        let csv_err = |e: csv::Error| DataError::Csv(e.to_string());

        writer
            .write_record([GAME_DATE, POINTS, ASSISTS, REBOUNDS, MINUTES])
            .map_err(csv_err)?;

        for record in games.to_records()? {
            writer
                .write_record(&[
                    record.game_date.format("%Y-%m-%d").to_string(),
                    record.points.to_string(),
                    record.assists.to_string(),
                    record.rebounds.to_string(),
                    record.minutes.to_string(),
                ])
                .map_err(csv_err)?;
        }

        writer.flush()?;
        Ok(())
    }
}

impl GameLogTier for CsvGameLogStore {
    fn name(&self) -> &str {
        "csv"
    }

    fn load(&self, player: PlayerId) -> Result<Option<GameTable>, DataError> {
        let path = self.path_for(player);
        if !path.exists() {
            return Ok(None);
        }
        Self::read_file(&path).map(Some)
    }

    fn store(&mut self, player: PlayerId, games: &GameTable) -> Result<(), DataError> {
        Self::write_file(&self.path_for(player), games)
    }

    fn is_writable(&self) -> bool {
        true
    }
}

/// Parses canonical (`2024-10-22`), timestamped (`2024-10-22T00:00:00`), or
/// provider (`OCT 22, 2024`) dates.
#[must_use]
pub fn parse_game_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
        .or_else(|| NaiveDate::parse_from_str(raw, "%b %d, %Y").ok())
}

/// Converts decimal or `MM:SS` minutes to decimal minutes.
///
/// Empty or unparseable values count as `0.0` minutes.
#[must_use]
pub fn parse_minutes(raw: &str) -> f64 {
    let raw = raw.trim();
    if let Some((mins, secs)) = raw.split_once(':') {
        return match (mins.parse::<f64>(), secs.parse::<f64>()) {
            (Ok(m), Ok(s)) => m + s / 60.0,
            _ => 0.0,
        };
    }
    raw.parse::<f64>().unwrap_or(0.0)
}
