use chrono::NaiveDate;
use thiserror::Error;

use nba_props_core::{ConfigError, DataError};

/// Failures computing rolling features.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FeatureError {
    #[error("rolling window must be >= 2, got {0}")]
    InvalidWindow(usize),

    #[error("missing required column '{0}'")]
    MissingColumn(String),

    #[error("no complete {0}-game window in the player's history")]
    NoCompleteWindow(usize),
}

/// Fatal errors from a backtest run. Carries enough context to diagnose.
#[derive(Error, Debug)]
pub enum BacktestError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("data error for player '{player}': {source}")]
    Data {
        player: String,
        #[source]
        source: DataError,
    },

    #[error("feature error for player '{player}' on {date}: {source}")]
    Feature {
        player: String,
        date: NaiveDate,
        #[source]
        source: FeatureError,
    },
}

impl BacktestError {
    pub(crate) fn data(player: &str, source: DataError) -> Self {
        Self::Data {
            player: player.to_string(),
            source,
        }
    }
}
