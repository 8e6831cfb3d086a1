use serde::{Deserialize, Serialize};

use crate::game::StatType;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub backtest: BacktestDefaults,
}

/// Where game logs, caches, and prediction output live.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Directory of `<player_id>.csv` game logs.
    pub games_dir: String,
    /// Directory for the JSON game-log cache.
    pub cache_dir: String,
    /// CSV with `player_id,full_name` columns.
    pub players_file: String,
    /// Predictions CSV appended to during backtests. Empty disables it.
    pub predictions_file: String,
}

/// Defaults applied when the CLI does not override them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BacktestDefaults {
    pub stat_type: StatType,
    pub window: usize,
    /// Games requested from the source per run.
    pub history_games: usize,
    /// Most recent prior games considered per prediction.
    pub lookback_games: usize,
    /// Fixed line; `None` uses the model's own estimate.
    pub line: Option<f64>,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            games_dir: "data/raw".to_string(),
            cache_dir: "data/cache".to_string(),
            players_file: "data/players.csv".to_string(),
            predictions_file: String::new(),
        }
    }
}

impl Default for BacktestDefaults {
    fn default() -> Self {
        Self {
            stat_type: StatType::Points,
            window: 10,
            history_games: 200,
            lookback_games: 50,
            line: None,
        }
    }
}
