//! Chronological replay engine for player-prop predictions.
//!
//! For each game in the backtest period the engine rebuilds the model from
//! games played strictly before that date, predicts the stat distribution,
//! applies the betting policy and settles against the real result.
//!
//! # Example
//!
//! ```ignore
//! let config = BacktestConfig::new(start, end, StatType::Points).with_line(25.5);
//! let mut engine = BacktestEngine::new(config, Box::new(source), Box::new(NullPredictionSink))?;
//! let run = engine.run_backtest("LeBron James", 10)?;
//! println!("{}", format_text_report(&run));
//! ```

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use nba_props_core::odds::{self, STANDARD_ODDS};
use nba_props_core::stats::{mean, sample_std};
use nba_props_core::table::{MINUTES, POINTS};
use nba_props_core::{
    prob_over, BacktestDefaults, ConfigError, GameLogSource, PlayerHistory, PlayerId,
    PredictionRecord, PredictionSink, StatType,
};

use crate::error::{BacktestError, FeatureError};
use crate::features::RollingFeatures;
use crate::metrics::BacktestSummary;
use crate::outcome::{BetRecommendation, OutcomeRecord, PredictionPoint};

/// Games requested from the source per run.
pub const DEFAULT_HISTORY_GAMES: usize = 200;

/// Most recent prior games used to train each prediction.
pub const DEFAULT_LOOKBACK_GAMES: usize = 50;

/// Configuration for a single-player backtest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestConfig {
    /// First game date evaluated (inclusive).
    pub start: NaiveDate,
    /// Last game date evaluated (inclusive).
    pub end: NaiveDate,
    pub stat_type: StatType,
    /// Fixed sportsbook line. `None` uses the model's own expected value.
    pub line: Option<f64>,
    pub history_games: usize,
    pub lookback_games: usize,
}

impl BacktestConfig {
    #[must_use]
    pub fn new(start: NaiveDate, end: NaiveDate, stat_type: StatType) -> Self {
        Self {
            start,
            end,
            stat_type,
            line: None,
            history_games: DEFAULT_HISTORY_GAMES,
            lookback_games: DEFAULT_LOOKBACK_GAMES,
        }
    }

    /// Builds a config for `[start, end]` from loaded defaults.
    #[must_use]
    pub fn from_defaults(start: NaiveDate, end: NaiveDate, defaults: &BacktestDefaults) -> Self {
        Self {
            start,
            end,
            stat_type: defaults.stat_type,
            line: defaults.line,
            history_games: defaults.history_games,
            lookback_games: defaults.lookback_games,
        }
    }

    #[must_use]
    pub fn with_line(mut self, line: f64) -> Self {
        self.line = Some(line);
        self
    }

    #[must_use]
    pub fn with_history_games(mut self, games: usize) -> Self {
        self.history_games = games;
        self
    }

    #[must_use]
    pub fn with_lookback_games(mut self, games: usize) -> Self {
        self.lookback_games = games;
        self
    }

    /// Validates against `today`, clamping a future end date.
    ///
    /// # Errors
    /// Returns `ConfigError::StartInFuture` if `start > today`,
    /// `ConfigError::InvalidDateRange` if `start >= end` after clamping, and
    /// `ConfigError::Invalid` for zero game counts or a non-finite line.
    pub fn validate(mut self, today: NaiveDate) -> Result<Self, ConfigError> {
        if self.end > today {
            warn!(requested_end = %self.end, %today, "End date is in the future, clamping to today");
            self.end = today;
        }
        if self.start > today {
            return Err(ConfigError::StartInFuture {
                start: self.start,
                today,
            });
        }
        if self.start >= self.end {
            return Err(ConfigError::InvalidDateRange {
                start: self.start,
                end: self.end,
            });
        }
        if self.history_games == 0 || self.lookback_games == 0 {
            return Err(ConfigError::Invalid(
                "history_games and lookback_games must be positive".to_string(),
            ));
        }
        if let Some(line) = self.line {
            if !line.is_finite() {
                return Err(ConfigError::Invalid(format!("line must be finite, got {line}")));
            }
        }
        Ok(self)
    }
}

/// Everything a backtest produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestRun {
    pub run_id: Uuid,
    pub player_name: String,
    pub player_id: PlayerId,
    pub config: BacktestConfig,
    pub window: usize,
    /// Games dated inside `[start, end]`.
    pub games_in_period: usize,
    /// Games skipped for insufficient history or a missing result.
    pub skipped_games: usize,
    /// Predictions the sink failed to record.
    pub sink_failures: usize,
    pub records: Vec<OutcomeRecord>,
    pub summary: BacktestSummary,
}

/// Replays one player's season game by game.
pub struct BacktestEngine {
    config: BacktestConfig,
    source: Box<dyn GameLogSource>,
    sink: Box<dyn PredictionSink>,
}

impl BacktestEngine {
    /// Creates an engine, validating the config against the local date.
    ///
    /// # Errors
    /// Returns a `ConfigError` if the config is invalid.
    pub fn new(
        config: BacktestConfig,
        source: Box<dyn GameLogSource>,
        sink: Box<dyn PredictionSink>,
    ) -> Result<Self, ConfigError> {
        Self::with_today(config, source, sink, Local::now().date_naive())
    }

    /// Creates an engine, validating the config against `today`.
    ///
    /// # Errors
    /// Returns a `ConfigError` if the config is invalid.
    pub fn with_today(
        config: BacktestConfig,
        source: Box<dyn GameLogSource>,
        sink: Box<dyn PredictionSink>,
        today: NaiveDate,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            config: config.validate(today)?,
            source,
            sink,
        })
    }

    /// Returns the validated configuration.
    #[must_use]
    pub fn config(&self) -> &BacktestConfig {
        &self.config
    }

    /// Runs the backtest for `player_name` with a rolling `window`.
    ///
    /// # Errors
    /// Fails before replay on an invalid window, an unknown player, or game
    /// logs lacking a required column. Per-game problems are logged and
    /// skipped; sink failures are counted.
    pub fn run_backtest(
        &mut self,
        player_name: &str,
        window: usize,
    ) -> Result<BacktestRun, BacktestError> {
        let config = self.config.clone();
        if window < 2 {
            return Err(ConfigError::InvalidWindow(window).into());
        }
        if window > config.lookback_games {
            return Err(ConfigError::Invalid(format!(
                "window {window} exceeds lookback of {} games",
                config.lookback_games
            ))
            .into());
        }

        info!(
            player = player_name,
            start = %config.start,
            end = %config.end,
            stat = %config.stat_type,
            window,
            "Running backtest"
        );

        let player_id = self
            .source
            .player_id(player_name)
            .map_err(|e| BacktestError::data(player_name, e))?;
        let table = self
            .source
            .load_history(player_id, config.history_games)
            .map_err(|e| BacktestError::data(player_name, e))?;
        let history =
            PlayerHistory::new(player_id, table).map_err(|e| BacktestError::data(player_name, e))?;

        for column in [config.stat_type.column(), POINTS, MINUTES] {
            history
                .table()
                .require(column)
                .map_err(|e| BacktestError::data(player_name, e))?;
        }

        let period = history.rows_between(config.start, config.end);
        let games_in_period = period.len();
        info!(player = player_name, games = games_in_period, "Found games in backtest period");

        let mut records = Vec::with_capacity(games_in_period);
        let mut skipped_games = 0;
        let mut sink_failures = 0;

        for row in period {
            let date = history.dates()[row];

            let Some(actual) = history.value(config.stat_type.column(), row) else {
                warn!(player = player_name, %date, "Skipping game - no recorded result");
                skipped_games += 1;
                continue;
            };

            let prediction = self.predict_game(&history, date, window).map_err(|source| {
                BacktestError::Feature {
                    player: player_name.to_string(),
                    date,
                    source,
                }
            })?;
            let Some(prediction) = prediction else {
                warn!(
                    player = player_name,
                    %date,
                    prior_games = history.count_before(date),
                    window,
                    "Skipping game - insufficient history"
                );
                skipped_games += 1;
                continue;
            };

            let record = OutcomeRecord::settle(prediction, actual);
            debug!(
                %date,
                predicted = record.prediction.predicted_mean,
                prob_over = record.prediction.prob_over,
                actual,
                bet = %record.bet,
                "Evaluated game"
            );

            let prediction_record = to_prediction_record(player_id, config.stat_type, &record);
            if let Err(err) = self.sink.record(&prediction_record) {
                warn!(player = player_name, %date, error = %err, "Failed to record prediction");
                sink_failures += 1;
            }

            records.push(record);
        }

        let summary = BacktestSummary::from_records(&records);
        info!(
            player = player_name,
            evaluated = summary.total_games,
            skipped = skipped_games,
            bets = summary.bets_made,
            "Backtest complete"
        );

        Ok(BacktestRun {
            run_id: Uuid::new_v4(),
            player_name: player_name.to_string(),
            player_id,
            config,
            window,
            games_in_period,
            skipped_games,
            sink_failures,
            records,
            summary,
        })
    }

    /// Predicts the game on `date` from games strictly before it.
    ///
    /// Returns `Ok(None)` when fewer than `window` prior games are available.
    ///
    /// # Errors
    /// Returns a `FeatureError` if the history lacks a required column.
    pub fn predict_game(
        &self,
        history: &PlayerHistory,
        date: NaiveDate,
        window: usize,
    ) -> Result<Option<PredictionPoint>, FeatureError> {
        let stat = self.config.stat_type;
        let training = history.prior_games(date, self.config.lookback_games);
        if training.len() < window {
            return Ok(None);
        }

        let features = RollingFeatures::compute(&training, window)?;
        let (predicted_mean, predicted_std) = match features.latest_complete(stat) {
            Some(estimate) => (estimate.mean, estimate.std_dev),
            None => {
                // Gaps in every window: fall back to the whole slice.
                let values: Vec<f64> = training
                    .column(stat.column())
                    .ok_or_else(|| FeatureError::MissingColumn(stat.column().to_string()))?
                    .iter()
                    .flatten()
                    .copied()
                    .collect();
                (mean(&values).unwrap_or(0.0), sample_std(&values).unwrap_or(0.0))
            }
        };

        let line = self.config.line.unwrap_or(predicted_mean);
        Ok(Some(PredictionPoint {
            date,
            predicted_mean,
            predicted_std,
            prob_over: prob_over(line, predicted_mean, predicted_std),
            line,
        }))
    }
}

fn to_prediction_record(
    player_id: PlayerId,
    stat_type: StatType,
    record: &OutcomeRecord,
) -> PredictionRecord {
    let p = &record.prediction;
    let expected_value = match record.bet {
        BetRecommendation::Over => Some(odds::expected_value(p.prob_over, STANDARD_ODDS, 1.0)),
        BetRecommendation::Under => {
            Some(odds::expected_value(1.0 - p.prob_over, STANDARD_ODDS, 1.0))
        }
        BetRecommendation::NoBet => None,
    };

    PredictionRecord {
        player_id,
        game_date: p.date,
        stat_type,
        predicted_mean: p.predicted_mean,
        predicted_std: p.predicted_std,
        prob_over: p.prob_over,
        line_value: p.line,
        book_odds: STANDARD_ODDS,
        expected_value,
    }
}
