//! Column-oriented game-log table with provider alias normalization.
//!
//! Upstream box-score feeds name their columns `PTS`, `AST`, `REB`, `MIN`,
//! and `GAME_DATE`. Everything downstream works on the canonical lowercase
//! names. Normalization happens once, when a table is built, and renames a
//! provider column only when its canonical counterpart is absent, so a table
//! carrying both keeps the canonical one. Normalizing twice is a no-op.

use std::collections::BTreeMap;
use std::ops::Range;

use chrono::NaiveDate;

use crate::error::DataError;
use crate::game::GameRecord;

pub const GAME_DATE: &str = "game_date";
pub const POINTS: &str = "points";
pub const ASSISTS: &str = "assists";
pub const REBOUNDS: &str = "rebounds";
pub const MINUTES: &str = "minutes";

/// Provider column name -> canonical column name.
pub const COLUMN_ALIASES: [(&str, &str); 5] = [
    ("GAME_DATE", GAME_DATE),
    ("PTS", POINTS),
    ("AST", ASSISTS),
    ("REB", REBOUNDS),
    ("MIN", MINUTES),
];

/// Maps provider header names onto canonical names.
///
/// A provider name is renamed only if the canonical name is not already in
/// `headers`.
#[must_use]
pub fn normalize_headers(headers: &[String]) -> Vec<String> {
    headers
        .iter()
        .map(|header| match canonical_for(header) {
            Some(canonical) if !headers.iter().any(|h| h == canonical) => canonical.to_string(),
            _ => header.clone(),
        })
        .collect()
}

fn canonical_for(name: &str) -> Option<&'static str> {
    COLUMN_ALIASES
        .iter()
        .find(|(alias, _)| *alias == name)
        .map(|(_, canonical)| *canonical)
}

/// A dated table of per-game numeric columns. Cells may be missing.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GameTable {
    dates: Vec<NaiveDate>,
    columns: BTreeMap<String, Vec<Option<f64>>>,
}

impl GameTable {
    /// Builds a table from dates and named columns, normalizing aliases.
    ///
    /// # Errors
    /// Returns `DataError::InvalidValue` if a column's length differs from
    /// the number of dates.
    pub fn from_columns(
        dates: Vec<NaiveDate>,
        columns: Vec<(String, Vec<Option<f64>>)>,
    ) -> Result<Self, DataError> {
        let mut table = Self {
            dates,
            columns: BTreeMap::new(),
        };
        for (name, values) in columns {
            if values.len() != table.dates.len() {
                return Err(DataError::InvalidValue {
                    column: name,
                    row: values.len().min(table.dates.len()),
                    reason: format!(
                        "column has {} values but table has {} rows",
                        values.len(),
                        table.dates.len()
                    ),
                });
            }
            table.columns.insert(name, values);
        }
        Ok(table.normalized())
    }

    /// Builds a fully populated table from typed records.
    #[must_use]
    pub fn from_records(records: &[GameRecord]) -> Self {
        let column = |f: fn(&GameRecord) -> f64| -> Vec<Option<f64>> {
            records.iter().map(|r| Some(f(r))).collect()
        };

        let mut columns = BTreeMap::new();
        columns.insert(POINTS.to_string(), column(|r| r.points));
        columns.insert(ASSISTS.to_string(), column(|r| r.assists));
        columns.insert(REBOUNDS.to_string(), column(|r| r.rebounds));
        columns.insert(MINUTES.to_string(), column(|r| r.minutes));

        Self {
            dates: records.iter().map(|r| r.game_date).collect(),
            columns,
        }
    }

    /// Renames provider columns to canonical names where the canonical
    /// column is absent.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        for (alias, canonical) in COLUMN_ALIASES {
            if self.columns.contains_key(canonical) {
                continue;
            }
            if let Some(values) = self.columns.remove(alias) {
                self.columns.insert(canonical.to_string(), values);
            }
        }
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    #[must_use]
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    #[must_use]
    pub fn column(&self, name: &str) -> Option<&[Option<f64>]> {
        self.columns.get(name).map(Vec::as_slice)
    }

    /// Returns a column or `DataError::MissingColumn`.
    ///
    /// # Errors
    /// Returns `DataError::MissingColumn` if the column is absent.
    pub fn require(&self, name: &str) -> Result<&[Option<f64>], DataError> {
        self.column(name)
            .ok_or_else(|| DataError::MissingColumn(name.to_string()))
    }

    /// Copies the rows in `range` into a new table.
    ///
    /// # Panics
    /// Panics if `range` is out of bounds.
    #[must_use]
    pub fn slice(&self, range: Range<usize>) -> Self {
        Self {
            dates: self.dates[range.clone()].to_vec(),
            columns: self
                .columns
                .iter()
                .map(|(name, values)| (name.clone(), values[range.clone()].to_vec()))
                .collect(),
        }
    }

    /// The last `n` rows (or all rows if there are fewer).
    #[must_use]
    pub fn tail(&self, n: usize) -> Self {
        let start = self.len().saturating_sub(n);
        self.slice(start..self.len())
    }

    /// Returns a copy with rows ordered by ascending date (stable).
    #[must_use]
    pub fn sorted_by_date(&self) -> Self {
        let mut order: Vec<usize> = (0..self.len()).collect();
        order.sort_by_key(|&i| self.dates[i]);

        Self {
            dates: order.iter().map(|&i| self.dates[i]).collect(),
            columns: self
                .columns
                .iter()
                .map(|(name, values)| (name.clone(), order.iter().map(|&i| values[i]).collect()))
                .collect(),
        }
    }

    /// Converts rows into typed records.
    ///
    /// # Errors
    /// Returns `DataError::MissingColumn` if a stat column is absent and
    /// `DataError::InvalidValue` if a cell is empty.
    pub fn to_records(&self) -> Result<Vec<GameRecord>, DataError> {
        let points = self.require(POINTS)?;
        let assists = self.require(ASSISTS)?;
        let rebounds = self.require(REBOUNDS)?;
        let minutes = self.require(MINUTES)?;

        let cell = |column: &str, values: &[Option<f64>], row: usize| {
            values[row].ok_or_else(|| DataError::InvalidValue {
                column: column.to_string(),
                row,
                reason: "missing value".to_string(),
            })
        };

        (0..self.len())
            .map(|row| {
                Ok(GameRecord {
                    game_date: self.dates[row],
                    points: cell(POINTS, points, row)?,
                    assists: cell(ASSISTS, assists, row)?,
                    rebounds: cell(REBOUNDS, rebounds, row)?,
                    minutes: cell(MINUTES, minutes, row)?,
                })
            })
            .collect()
    }
}
