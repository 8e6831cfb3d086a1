//! Rolling per-game features over a chronological game table.
//!
//! Every feature at row `i` is computed from rows `[i - window + 1, i]` only,
//! so a value never depends on later games. Rows with fewer than `window`
//! games behind them (or with a missing value inside the window) have no
//! feature.

use std::collections::HashMap;

use nba_props_core::stats::{mean, sample_std};
use nba_props_core::table::{MINUTES, POINTS};
use nba_props_core::{GameTable, StatType};

use crate::error::FeatureError;

/// Mean and standard deviation of a stat at one row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatEstimate {
    pub row: usize,
    pub mean: f64,
    pub std_dev: f64,
}

/// Rolling features for every row of a table.
#[derive(Debug, Clone, PartialEq)]
pub struct RollingFeatures {
    window: usize,
    rows: usize,
    stat_means: HashMap<StatType, Vec<Option<f64>>>,
    stat_stds: HashMap<StatType, Vec<Option<f64>>>,
    points_per_minute: Vec<Option<f64>>,
    mean_points_per_minute: Vec<Option<f64>>,
    mean_minutes: Vec<Option<f64>>,
    std_minutes: Vec<Option<f64>>,
}

impl RollingFeatures {
    /// Computes rolling features over `table`.
    ///
    /// Stats missing from the table are skipped; `points` and `minutes` are
    /// required.
    ///
    /// # Errors
    /// Returns `FeatureError::InvalidWindow` if `window < 2` and
    /// `FeatureError::MissingColumn` if `points` or `minutes` is absent.
    pub fn compute(table: &GameTable, window: usize) -> Result<Self, FeatureError> {
        if window < 2 {
            return Err(FeatureError::InvalidWindow(window));
        }
        let points = table
            .column(POINTS)
            .ok_or_else(|| FeatureError::MissingColumn(POINTS.to_string()))?;
        let minutes = table
            .column(MINUTES)
            .ok_or_else(|| FeatureError::MissingColumn(MINUTES.to_string()))?;

        let mut stat_means = HashMap::new();
        let mut stat_stds = HashMap::new();
        for stat in StatType::ALL {
            if let Some(values) = table.column(stat.column()) {
                stat_means.insert(stat, rolling(values, window, mean));
                stat_stds.insert(stat, rolling(values, window, sample_std));
            }
        }

        let points_per_minute: Vec<Option<f64>> = points
            .iter()
            .zip(minutes)
            .map(|(pts, mins)| match (pts, mins) {
                (Some(p), Some(m)) if *m != 0.0 => Some(p / m),
                _ => None,
            })
            .collect();

        Ok(Self {
            window,
            rows: table.len(),
            stat_means,
            stat_stds,
            mean_points_per_minute: rolling(&points_per_minute, window, mean),
            points_per_minute,
            mean_minutes: rolling(minutes, window, mean),
            std_minutes: rolling(minutes, window, sample_std),
        })
    }

    #[must_use]
    pub fn window(&self) -> usize {
        self.window
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Rolling mean of `stat`, or `None` if the table had no such column.
    #[must_use]
    pub fn mean(&self, stat: StatType) -> Option<&[Option<f64>]> {
        self.stat_means.get(&stat).map(Vec::as_slice)
    }

    /// Rolling sample standard deviation of `stat`.
    #[must_use]
    pub fn std_dev(&self, stat: StatType) -> Option<&[Option<f64>]> {
        self.stat_stds.get(&stat).map(Vec::as_slice)
    }

    #[must_use]
    pub fn points_per_minute(&self) -> &[Option<f64>] {
        &self.points_per_minute
    }

    #[must_use]
    pub fn mean_points_per_minute(&self) -> &[Option<f64>] {
        &self.mean_points_per_minute
    }

    #[must_use]
    pub fn mean_minutes(&self) -> &[Option<f64>] {
        &self.mean_minutes
    }

    #[must_use]
    pub fn std_minutes(&self) -> &[Option<f64>] {
        &self.std_minutes
    }

    /// The last row where both mean and std of `stat` are defined.
    #[must_use]
    pub fn latest_complete(&self, stat: StatType) -> Option<StatEstimate> {
        let means = self.mean(stat)?;
        let stds = self.std_dev(stat)?;

        (0..self.rows).rev().find_map(|row| match (means[row], stds[row]) {
            (Some(mean), Some(std_dev)) => Some(StatEstimate { row, mean, std_dev }),
            _ => None,
        })
    }
}

/// Applies `f` to each complete trailing window of `values`.
fn rolling(values: &[Option<f64>], window: usize, f: fn(&[f64]) -> Option<f64>) -> Vec<Option<f64>> {
    let mut buffer = Vec::with_capacity(window);
    (0..values.len())
        .map(|i| {
            if i + 1 < window {
                return None;
            }
            buffer.clear();
            for value in &values[i + 1 - window..=i] {
                buffer.push((*value)?);
            }
            f(&buffer)
        })
        .collect()
}
