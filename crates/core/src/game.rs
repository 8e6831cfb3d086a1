//! Game-level domain types: stat selection, player identity, and box-score rows.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Statistic a prop line is written on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatType {
    Points,
    Assists,
    Rebounds,
}

impl StatType {
    /// All supported stats, in the order features are computed.
    pub const ALL: [StatType; 3] = [StatType::Points, StatType::Assists, StatType::Rebounds];

    /// Canonical lowercase column name for this stat.
    #[must_use]
    pub fn column(self) -> &'static str {
        match self {
            StatType::Points => "points",
            StatType::Assists => "assists",
            StatType::Rebounds => "rebounds",
        }
    }
}

impl fmt::Display for StatType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

impl FromStr for StatType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "points" => Ok(StatType::Points),
            "assists" => Ok(StatType::Assists),
            "rebounds" => Ok(StatType::Rebounds),
            _ => Err(ConfigError::UnknownStat(s.to_string())),
        }
    }
}

/// Opaque player identity issued by a game-log source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One played game for one player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub game_date: NaiveDate,
    pub points: f64,
    pub assists: f64,
    pub rebounds: f64,
    pub minutes: f64,
}

impl GameRecord {
    #[must_use]
    pub fn new(game_date: NaiveDate, points: f64, assists: f64, rebounds: f64, minutes: f64) -> Self {
        Self {
            game_date,
            points,
            assists,
            rebounds,
            minutes,
        }
    }
}
