use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{DataError, SinkError};
use crate::game::{PlayerId, StatType};
use crate::table::GameTable;

/// Supplies chronological game logs for players.
///
/// Implementations own their caching and throttling policy; callers only ask
/// for "at least `min_games` games for this player".
pub trait GameLogSource {
    /// Resolves a full player name to an identity.
    ///
    /// # Errors
    /// Returns `DataError::PlayerNotFound` if the name is unknown.
    fn player_id(&self, name: &str) -> Result<PlayerId, DataError>;

    /// Loads up to `min_games` of the player's most recent games.
    ///
    /// Row order is not guaranteed; callers sort.
    ///
    /// # Errors
    /// Returns a `DataError` if no games can be loaded.
    fn load_history(&mut self, player: PlayerId, min_games: usize) -> Result<GameTable, DataError>;
}

/// Receives every prediction the backtest engine makes.
pub trait PredictionSink {
    /// Persists one prediction.
    ///
    /// # Errors
    /// Returns a `SinkError` if the prediction could not be stored.
    fn record(&mut self, prediction: &PredictionRecord) -> Result<(), SinkError>;
}

/// A prediction as handed to a [`PredictionSink`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRecord {
    pub player_id: PlayerId,
    pub game_date: NaiveDate,
    pub stat_type: StatType,
    pub predicted_mean: f64,
    pub predicted_std: f64,
    pub prob_over: f64,
    pub line_value: f64,
    pub book_odds: i32,
    /// EV per unit stake of the recommended side, `None` without a bet.
    pub expected_value: Option<f64>,
}
