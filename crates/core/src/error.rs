//! Error taxonomy shared by the data, backtest, and CLI crates.
//!
//! Configuration and data errors are fatal for a run and surface before any
//! replay starts. Sink errors are reported to the caller of
//! [`PredictionSink::record`](crate::traits::PredictionSink::record) but the
//! backtest engine only logs them.

use chrono::NaiveDate;
use thiserror::Error;

/// Invalid run configuration. Raised at construction, never retried.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("start date {start} must be before end date {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("start date {start} cannot be in the future (today is {today})")]
    StartInFuture { start: NaiveDate, today: NaiveDate },

    #[error("unknown stat type '{0}' (expected one of: assists, points, rebounds)")]
    UnknownStat(String),

    #[error("rolling window must be >= 2, got {0}")]
    InvalidWindow(usize),

    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error("failed to load configuration: {0}")]
    Load(String),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Load(err.to_string())
    }
}

/// Problems with game-log data. Fatal for the run.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("missing required column '{0}'")]
    MissingColumn(String),

    #[error("player '{0}' not found")]
    PlayerNotFound(String),

    #[error("no game logs available for player {0}")]
    NoGameLogs(u64),

    #[error("duplicate game date {0} in player history")]
    DuplicateGameDate(NaiveDate),

    #[error("column '{column}' row {row}: {reason}")]
    InvalidValue {
        column: String,
        row: usize,
        reason: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(String),

    #[error("JSON error: {0}")]
    Json(String),
}

/// Failure to persist a prediction. Non-fatal inside the backtest engine.
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(String),

    #[error("prediction rejected: {0}")]
    Rejected(String),
}
